use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    response::IntoResponse,
    Json,
};
use bolao_server_entities::{
    participant::ParticipantId,
    pool::{self, PoolId},
    user::{self, UserId},
};
use chrono::{DateTime, FixedOffset};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, IntoResponses, OpenApi, ToSchema};

use crate::{
    errors::{ErrorCode, ErrorResponse, ServerError},
    paginated::{PageInfo, PaginatedDto},
};

/// Number of participants shown in a pool preview
pub const PARTICIPANTS_PREVIEW_LEN: u64 = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, FromRequest, ToSchema)]
#[from_request(via(axum::Json), rejection(ErrorResponse<JsonRejection>))]
pub struct PoolCreateDto {
    /// Title of the pool
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = CREATED)]
/// The newly created pool
pub struct PoolCreateResponseDto {
    /// Id of the pool
    pub id: PoolId,
    /// Code to share so others can join
    pub code: String,
}

impl IntoResponse for PoolCreateResponseDto {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum PoolCreateError {
    #[error("The pool title cannot be empty")]
    #[response(status = BAD_REQUEST)]
    /// The title is empty
    BlankTitle,
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for PoolCreateError {
    fn error_code(&self) -> ErrorCode {
        match self {
            PoolCreateError::BlankTitle => ErrorCode::BlankPoolTitle,
            PoolCreateError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(PoolCreateError);

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, FromRequest, ToSchema)]
#[from_request(via(axum::Json), rejection(ErrorResponse<JsonRejection>))]
pub struct PoolJoinDto {
    /// Code of the pool to join
    ///
    /// Case insensitive
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum PoolJoinError {
    #[error("Pool not found")]
    #[response(status = BAD_REQUEST)]
    /// No pool has the given code
    UnknownCode,
    #[error("You already joined this pool")]
    #[response(status = BAD_REQUEST)]
    /// The user is already a participant
    AlreadyJoined,
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for PoolJoinError {
    fn error_code(&self) -> ErrorCode {
        match self {
            PoolJoinError::UnknownCode => ErrorCode::UnknownPoolCode,
            PoolJoinError::AlreadyJoined => ErrorCode::AlreadyJoined,
            PoolJoinError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(PoolJoinError);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, FromRequestParts, IntoParams)]
#[from_request(via(axum::extract::Path), rejection(ErrorResponse<PathRejection>))]
#[into_params(parameter_in = Path)]
pub struct PoolPathData {
    /// Id of the pool
    #[serde(rename = "pool")]
    #[param(value_type = String, format = Uuid)]
    pub id: PoolId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
/// Owner of a pool
pub struct OwnerDto {
    pub id: UserId,
    pub name: String,
}

impl From<user::Model> for OwnerDto {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.user_id(),
            name: model.name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
/// Short info about a participant, enough to show a preview
pub struct ParticipantPreviewDto {
    pub id: ParticipantId,
    pub user_id: UserId,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = OK)]
/// Details about a pool
pub struct PoolQueryDto {
    pub id: PoolId,
    pub title: String,
    /// Code to share so others can join
    pub code: String,
    pub created_at: DateTime<FixedOffset>,
    /// The owner of the pool, if any
    pub owner: Option<OwnerDto>,
    /// Total number of participants
    pub participants_count: u64,
    /// The first participants that joined the pool
    pub participants: Vec<ParticipantPreviewDto>,
}

impl PoolQueryDto {
    pub fn new(
        pool: pool::Model,
        owner: Option<user::Model>,
        participants_count: u64,
        participants: Vec<ParticipantPreviewDto>,
    ) -> Self {
        Self {
            id: pool.pool_id(),
            title: pool.title,
            code: pool.code,
            created_at: pool.created_at,
            owner: owner.map(OwnerDto::from),
            participants_count,
            participants,
        }
    }
}

impl IntoResponse for PoolQueryDto {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum PoolGetError {
    #[error("Pool not found")]
    #[response(status = NOT_FOUND)]
    /// The pool does not exist
    NotFound,
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for PoolGetError {
    fn error_code(&self) -> ErrorCode {
        match self {
            PoolGetError::NotFound => ErrorCode::PoolNotFound,
            PoolGetError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(PoolGetError);

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum PoolListGetError {
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for PoolListGetError {
    fn error_code(&self) -> ErrorCode {
        match self {
            PoolListGetError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(PoolListGetError);

#[derive(OpenApi)]
#[openapi(components(schemas(
    PoolCreateDto,
    PoolCreateResponseDto,
    PoolJoinDto,
    OwnerDto,
    ParticipantPreviewDto,
    PoolQueryDto,
    PageInfo,
    PaginatedDto<PoolQueryDto>,
    crate::errors::ErrorResponseDto,
    crate::errors::ErrorCode,
)))]
pub struct ApiComponents;
