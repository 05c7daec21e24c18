use std::error::Error;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, FixedOffset, Local};
use derive_more::derive::From;
use http::StatusCode;
use serde::Serialize;
use serde_repr::Serialize_repr;
use utoipa::ToSchema;

/// Error code of the `bolao` server
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize_repr, ToSchema)]
#[repr(u16)]
pub enum ErrorCode {
    // -- GENERAL --
    /// Internal server error
    InternalServerError = 0,
    /// A JSON sent was found to be invalid
    InvalidJson = 1,
    /// A path could not be parsed
    InvalidPath = 2,
    /// The query parameters could not be parsed
    InvalidQuery = 3,

    // -- AUTHENTICATION --
    /// The authentication header is missing
    MissingAuthHeader = 100,
    /// The authentication header cannot be parsed
    InvalidAuthHeader = 101,
    /// The token is expired
    ExpiredToken = 102,
    /// The token is not well formed, or has a wrong signature
    MalformedToken = 103,

    // -- USERS --
    /// This user already exists
    UserAlreadyExists = 110,
    /// The user name cannot contain whitespaces
    WhitespacesInUsername = 111,
    /// The user name cannot be empty
    BlankUsername = 112,
    /// The user do not exist
    UserDoNotExist = 113,
    /// The password provided is wrong
    WrongPassword = 114,
    /// The user was deleted
    UserDeleted = 115,

    // -- POOLS --
    /// The pool title cannot be empty
    BlankPoolTitle = 200,
    /// The pool requested does not exist
    PoolNotFound = 201,
    /// No pool has the code given
    UnknownPoolCode = 202,
    /// The user is already a participant of this pool
    AlreadyJoined = 203,

    // -- GAMES --
    /// A team name cannot be empty
    BlankTeamName = 300,
    /// A team cannot play against itself
    SameTeams = 301,

    // -- GUESSES --
    /// Only participants of a pool can send guesses in it
    NotAParticipant = 400,
    /// The participant already sent a guess for this game
    AlreadyGuessed = 401,
    /// The game guessed does not exist
    GameNotFound = 402,
    /// The game already started
    GameAlreadyStarted = 403,
}
impl ErrorCode {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InvalidJson | ErrorCode::InvalidQuery => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidPath | ErrorCode::PoolNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidAuthHeader
            | ErrorCode::MissingAuthHeader
            | ErrorCode::ExpiredToken
            | ErrorCode::UserDoNotExist
            | ErrorCode::WrongPassword => StatusCode::UNAUTHORIZED,
            ErrorCode::MalformedToken
            | ErrorCode::WhitespacesInUsername
            | ErrorCode::BlankUsername
            | ErrorCode::BlankPoolTitle
            | ErrorCode::UnknownPoolCode
            | ErrorCode::AlreadyJoined
            | ErrorCode::BlankTeamName
            | ErrorCode::SameTeams
            | ErrorCode::NotAParticipant
            | ErrorCode::AlreadyGuessed
            | ErrorCode::GameNotFound
            | ErrorCode::GameAlreadyStarted => StatusCode::BAD_REQUEST,
            ErrorCode::UserAlreadyExists => StatusCode::CONFLICT,
            ErrorCode::UserDeleted => StatusCode::GONE,
        }
    }
}

/// An error that can be sent back to the client
pub trait ServerError: Error {
    fn error_code(&self) -> ErrorCode;
}

impl ServerError for JsonRejection {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidJson
    }
}

impl ServerError for PathRejection {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidPath
    }
}

impl ServerError for QueryRejection {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidQuery
    }
}

/// Body of every error response
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponseDto {
    /// Machine readable code of the error
    pub code: ErrorCode,
    /// Human readable message
    pub message: String,
    /// Time the error happened
    pub time: DateTime<FixedOffset>,
}

/// Wrapper turning a [`ServerError`] into a json response
#[derive(Debug, PartialEq, Eq, Clone, Copy, From)]
pub struct ErrorResponse<T>(pub T);

impl<T: ServerError> ErrorResponse<T> {
    pub fn dto(&self) -> ErrorResponseDto {
        let Self(inner) = self;
        let code = inner.error_code();
        // internal details never reach the client
        let message = if code == ErrorCode::InternalServerError {
            String::from("Internal server error")
        } else {
            inner.to_string()
        };
        ErrorResponseDto {
            code,
            message,
            time: Local::now().fixed_offset(),
        }
    }
}

impl<T: ServerError> Serialize for ErrorResponse<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.dto().serialize(serializer)
    }
}

impl<T: ServerError> IntoResponse for ErrorResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (self.0.error_code().status_code(), Json(self)).into_response()
    }
}
