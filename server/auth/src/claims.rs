// Logic to parse user claims from the authentication header

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::{password_hash::SaltString, Argon2, PasswordHasher, PasswordVerifier};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::IntoResponse,
};
use axum_extra::headers::{authorization::InvalidBearerToken, Authorization};
use bolao_server_dtos::{
    errors::{ErrorCode, ErrorResponse, ServerError},
    user::token::{AuthHeaderRejection, UserToken},
};
use bolao_server_entities::user::{PasswordHash, UserId};
use chrono::{DateTime, FixedOffset, Local};
use derive_more::derive::From;
use jwt::{claims::SecondsSinceEpoch, SignWithKey as _, VerifyWithKey as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{auth_key::AuthKey, Autenticated};

#[derive(Debug, Error)]
#[error("The token was received at {received_at}, but it expired at {expiration}")]
pub struct ExpiredToken {
    pub expiration: DateTime<FixedOffset>,
    pub received_at: DateTime<FixedOffset>,
}

#[derive(Debug, Error, From)]
pub enum InvalidTokenError {
    #[error(transparent)]
    Expired(ExpiredToken),
    #[error("The token is malformed")]
    Malformed,
}

impl ServerError for InvalidTokenError {
    fn error_code(&self) -> ErrorCode {
        match self {
            InvalidTokenError::Expired(_) => ErrorCode::ExpiredToken,
            InvalidTokenError::Malformed => ErrorCode::MalformedToken,
        }
    }
}

/// Claims for a user token
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserClaims {
    #[serde(rename = "sub")]
    pub subject: UserId,
    #[serde(rename = "exp")]
    pub expiration: SecondsSinceEpoch,
    #[serde(rename = "iat")]
    pub issued_at: SecondsSinceEpoch,
}

#[derive(Debug, Error, From)]
pub enum UserClaimsRejection {
    #[error(transparent)]
    TokenRejection(AuthHeaderRejection),
    #[error(transparent)]
    InvalidToken(InvalidTokenError),
}

impl ServerError for UserClaimsRejection {
    fn error_code(&self) -> ErrorCode {
        match self {
            UserClaimsRejection::TokenRejection(rejection) => rejection.error_code(),
            UserClaimsRejection::InvalidToken(invalid) => invalid.error_code(),
        }
    }
}

impl IntoResponse for UserClaimsRejection {
    fn into_response(self) -> axum::response::Response {
        ErrorResponse(self).into_response()
    }
}

impl<S> FromRequestParts<S> for UserClaims
where
    S: Send + Sync,
    AuthKey: FromRef<S>,
{
    type Rejection = UserClaimsRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = UserToken::from_request_parts(parts, state)
            .await
            .map_err(|ErrorResponse(rejection)| UserClaimsRejection::TokenRejection(rejection))?;
        let auth_key = AuthKey::from_ref(state);
        parse_token(auth_header.token(), &auth_key).map_err(UserClaimsRejection::InvalidToken)
    }
}

fn parse_token(token: &str, auth_key: &AuthKey) -> Result<UserClaims, InvalidTokenError> {
    let received_at = SystemTime::now();
    match token.verify_with_key(auth_key) {
        Ok(UserClaims { expiration, .. })
            if UNIX_EPOCH + Duration::from_secs(expiration) < received_at =>
        {
            Err(InvalidTokenError::Expired(ExpiredToken {
                expiration: DateTime::<Local>::from(UNIX_EPOCH + Duration::from_secs(expiration))
                    .into(),
                received_at: DateTime::<Local>::from(received_at).into(),
            }))
        }
        Err(err) => Err({
            tracing::debug!("Token {token} was refused: {err}");
            InvalidTokenError::Malformed
        }),
        Ok(claims) => Ok(claims),
    }
}

pub use argon2::password_hash::Error as PasswordError;

/// Create a password hash to store safely passwords in the database
///
/// The user id is used as salt, so it must be already decided.
pub fn hash_password(
    id: UserId,
    password: &str,
) -> Result<(Autenticated<UserId>, PasswordHash), PasswordError> {
    let salt = SaltString::encode_b64(id.as_bytes())?;
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    // the caller just chose the password, so it is authenticated
    Ok((Autenticated(id), hash.to_string().into()))
}

#[derive(Debug, Error)]
pub enum NewTokenError {
    #[error("Cannot sign the claims")]
    Sign(#[source] jwt::Error),
    #[error("The signed token is not a valid bearer token")]
    Bearer(#[source] InvalidBearerToken),
}

fn seconds_since_epoch(time: SystemTime) -> SecondsSinceEpoch {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

pub fn new_token(id: Autenticated<UserId>, auth_key: &AuthKey) -> Result<UserToken, NewTokenError> {
    let now = SystemTime::now();
    let claims = UserClaims {
        subject: id.into_inner(),
        expiration: seconds_since_epoch(now + auth_key.token_validity()),
        issued_at: seconds_since_epoch(now),
    };

    let token = claims.sign_with_key(auth_key).map_err(NewTokenError::Sign)?;

    Authorization::bearer(&token)
        .map(UserToken)
        .map_err(NewTokenError::Bearer)
}

pub fn check_password(
    id: UserId,
    hash: &PasswordHash,
    provided: &str,
) -> Result<Autenticated<UserId>, PasswordError> {
    Argon2::default()
        .verify_password(
            provided.as_bytes(),
            &argon2::PasswordHash::new(hash.as_str())?,
        )
        .map(|()| Autenticated(id))
}
