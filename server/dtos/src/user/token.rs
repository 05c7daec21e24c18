use std::{borrow::Cow, fmt::Display};

use axum::extract::FromRequestParts;
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::{TypedHeaderRejection, TypedHeaderRejectionReason},
    TypedHeader,
};
use derive_more::derive::From;
use http::request::Parts;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::{ErrorCode, ErrorResponse, ServerError};

/// A bearer token, as found in the `Authorization` header
#[derive(Clone, Debug, From)]
pub struct UserToken(pub Authorization<Bearer>);

impl UserToken {
    pub fn token(&self) -> &str {
        self.0.token()
    }
}

impl Serialize for UserToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.token().serialize(serializer)
    }
}
impl<'de> Deserialize<'de> for UserToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(UserToken(
            Authorization::bearer(&<Cow<str>>::deserialize(deserializer)?).map_err(|err| {
                <D::Error as serde::de::Error>::custom(format!("invalid bearer token {err}"))
            })?,
        ))
    }
}

impl Display for UserToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.token().fmt(f)
    }
}

impl PartialEq for UserToken {
    fn eq(&self, other: &Self) -> bool {
        self.token() == other.token()
    }
}
impl Eq for UserToken {}

#[derive(Debug, Error, From)]
#[error("Cannot parse authorization header")]
pub struct AuthHeaderRejection(#[source] TypedHeaderRejection);

impl ServerError for AuthHeaderRejection {
    fn error_code(&self) -> ErrorCode {
        match self.0.reason() {
            TypedHeaderRejectionReason::Missing => ErrorCode::MissingAuthHeader,
            _ => ErrorCode::InvalidAuthHeader,
        }
    }
}

impl<S> FromRequestParts<S> for UserToken
where
    S: Send + Sync,
{
    type Rejection = ErrorResponse<AuthHeaderRejection>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(header) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(AuthHeaderRejection)?;
        Ok(UserToken(header))
    }
}
