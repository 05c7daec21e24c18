//! Row counters, shown on the landing page

use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoResponses, ToSchema};

use crate::errors::{ErrorCode, ServerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = OK)]
/// Number of items of some kind
pub struct CountDto {
    pub count: u64,
}

impl IntoResponse for CountDto {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum CountGetError {
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for CountGetError {
    fn error_code(&self) -> ErrorCode {
        match self {
            CountGetError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(CountGetError);
