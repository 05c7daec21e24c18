use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    response::IntoResponse,
    Json,
};
use bolao_server_entities::user::{self, UserId};
use chrono::{DateTime, FixedOffset};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoResponses, OpenApi, ToSchema};

use crate::errors::{ErrorCode, ErrorResponse, ServerError};

pub mod token;

use token::UserToken;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, FromRequest, ToSchema)]
#[from_request(via(axum::Json), rejection(ErrorResponse<JsonRejection>))]
/// Credentials of a user
pub struct UserSigninDto {
    /// Name of the user
    pub name: String,
    /// Password of the user
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, FromRequest, ToSchema)]
#[from_request(via(axum::Json), rejection(ErrorResponse<JsonRejection>))]
/// Data needed to register a new user
pub struct UserSignupDto {
    /// Name of the user
    ///
    /// Must be unique, and cannot contain whitespaces
    pub name: String,
    /// Password of the user
    pub password: String,
    /// Picture shown to the other participants of the user's pools
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = OK)]
/// Public info about a user
pub struct UserQueryDto {
    pub id: UserId,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<user::Model> for UserQueryDto {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.user_id(),
            name: model.name,
            avatar_url: model.avatar_url,
            created_at: model.created_at,
        }
    }
}

impl IntoResponse for UserQueryDto {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema, IntoResponses)]
#[response(status = OK)]
/// A valid token, and the user it belongs to
pub struct UserSigninResponseDto {
    /// Bearer token to authenticate the following requests
    #[schema(value_type = String)]
    pub token: UserToken,
    #[serde(flatten)]
    pub user: UserQueryDto,
}

impl IntoResponse for UserSigninResponseDto {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema, IntoResponses)]
#[response(status = CREATED)]
/// The newly registered user, already signed in
pub struct UserSignupResponseDto(pub UserSigninResponseDto);

impl IntoResponse for UserSignupResponseDto {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum SignupError {
    #[error("The user name cannot contain whitespaces")]
    #[response(status = BAD_REQUEST)]
    /// The user name contains whitespaces
    WhitespacesInUsername,
    #[error("The user name cannot be empty")]
    #[response(status = BAD_REQUEST)]
    /// The user name is empty
    BlankUsername,
    #[error("A user with this name already exists")]
    #[response(status = CONFLICT)]
    /// The user name is taken
    UserAlreadyExist,
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for SignupError {
    fn error_code(&self) -> ErrorCode {
        match self {
            SignupError::WhitespacesInUsername => ErrorCode::WhitespacesInUsername,
            SignupError::BlankUsername => ErrorCode::BlankUsername,
            SignupError::UserAlreadyExist => ErrorCode::UserAlreadyExists,
            SignupError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(SignupError);

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum SigninError {
    #[error("The user does not exist")]
    #[response(status = UNAUTHORIZED)]
    /// No user has this name
    UserDoNotExist,
    #[error("Wrong password")]
    #[response(status = UNAUTHORIZED)]
    /// The password is wrong
    WrongPassword,
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for SigninError {
    fn error_code(&self) -> ErrorCode {
        match self {
            SigninError::UserDoNotExist => ErrorCode::UserDoNotExist,
            SigninError::WrongPassword => ErrorCode::WrongPassword,
            SigninError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(SigninError);

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum UserGetError {
    #[error("The user was deleted")]
    #[response(status = GONE)]
    /// The user of the token no longer exists
    Deleted,
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for UserGetError {
    fn error_code(&self) -> ErrorCode {
        match self {
            UserGetError::Deleted => ErrorCode::UserDeleted,
            UserGetError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(UserGetError);

#[derive(OpenApi)]
#[openapi(components(schemas(
    UserSigninDto,
    UserSignupDto,
    UserQueryDto,
    UserSigninResponseDto,
    crate::errors::ErrorResponseDto,
    crate::errors::ErrorCode,
)))]
pub struct ApiComponents;
