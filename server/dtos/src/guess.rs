//! Guesses sent by the participants of a pool

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    response::IntoResponse,
    Json,
};
use bolao_server_entities::{
    game::GameId,
    guess::{self, GuessId},
    participant::ParticipantId,
    pool::PoolId,
};
use chrono::{DateTime, FixedOffset};
use sea_orm::prelude::Uuid;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, IntoResponses, OpenApi, ToSchema};

use crate::errors::{ErrorCode, ErrorResponse, ServerError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, FromRequest, ToSchema)]
#[from_request(via(axum::Json), rejection(ErrorResponse<JsonRejection>))]
pub struct GuessCreateDto {
    /// Points the first team will score
    #[serde(alias = "firstTeamPoints")]
    pub first_team_points: u16,
    /// Points the second team will score
    #[serde(alias = "secondTeamPoints")]
    pub second_team_points: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, FromRequestParts, IntoParams)]
#[from_request(via(axum::extract::Path), rejection(ErrorResponse<PathRejection>))]
#[into_params(parameter_in = Path)]
pub struct GuessPathData {
    /// Id of the pool
    #[param(value_type = String, format = Uuid)]
    pub pool: PoolId,
    /// Id of the game
    #[param(value_type = String, format = Uuid)]
    pub game: GameId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
/// A guess on the result of a game
pub struct GuessQueryDto {
    pub id: GuessId,
    pub participant_id: ParticipantId,
    pub game_id: GameId,
    pub first_team_points: u16,
    pub second_team_points: u16,
    pub created_at: DateTime<FixedOffset>,
}

impl From<guess::Model> for GuessQueryDto {
    fn from(
        guess::Model {
            id,
            participant_id,
            game_id,
            first_team_points,
            second_team_points,
            created_at,
        }: guess::Model,
    ) -> Self {
        Self {
            first_team_points: stored_points(id, first_team_points),
            second_team_points: stored_points(id, second_team_points),
            id: id.into(),
            participant_id: participant_id.into(),
            game_id: game_id.into(),
            created_at,
        }
    }
}

/// Convert the stored points, clamping them to the range exposed by the api
///
/// The database refuses negative points, so clamping is only a fallback.
fn stored_points(guess: Uuid, points: i32) -> u16 {
    u16::try_from(points).unwrap_or_else(|_| {
        tracing::error!(%guess, points, "Stored guess points are out of range");
        if points < 0 {
            0
        } else {
            u16::MAX
        }
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = CREATED)]
/// The guess just sent
pub struct GuessCreateResponseDto(pub GuessQueryDto);

impl IntoResponse for GuessCreateResponseDto {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum GuessCreateError {
    #[error("You are not allowed to create a guess inside this pool")]
    #[response(status = BAD_REQUEST)]
    /// The requester is not a participant of the pool
    NotAParticipant,
    #[error("You have already sent a guess to this game on this pool")]
    #[response(status = BAD_REQUEST)]
    /// A guess was already sent
    AlreadyGuessed,
    #[error("Game not found")]
    #[response(status = BAD_REQUEST)]
    /// The game does not exist
    GameNotFound,
    #[error("You cannot send guesses after the match")]
    #[response(status = BAD_REQUEST)]
    /// The game already started
    GameAlreadyStarted,
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for GuessCreateError {
    fn error_code(&self) -> ErrorCode {
        match self {
            GuessCreateError::NotAParticipant => ErrorCode::NotAParticipant,
            GuessCreateError::AlreadyGuessed => ErrorCode::AlreadyGuessed,
            GuessCreateError::GameNotFound => ErrorCode::GameNotFound,
            GuessCreateError::GameAlreadyStarted => ErrorCode::GameAlreadyStarted,
            GuessCreateError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(GuessCreateError);

#[derive(OpenApi)]
#[openapi(components(schemas(GuessCreateDto, GuessQueryDto)))]
pub struct ApiComponents;
