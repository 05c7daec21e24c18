//! Games that can be guessed

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    response::IntoResponse,
    Json,
};
use bolao_server_entities::game::{self, GameId};
use chrono::{DateTime, FixedOffset};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoResponses, OpenApi, ToSchema};

use crate::{
    errors::{ErrorCode, ErrorResponse, ServerError},
    guess::GuessQueryDto,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRequest, ToSchema)]
#[from_request(via(axum::Json), rejection(ErrorResponse<JsonRejection>))]
pub struct GameCreateDto {
    /// When the match is played
    pub date: DateTime<FixedOffset>,
    #[serde(alias = "firstTeamCountryCode", alias = "firstTeam")]
    pub first_team: String,
    #[serde(alias = "secondTeamCountryCode", alias = "secondTeam")]
    pub second_team: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = OK)]
/// A game on the calendar
pub struct GameQueryDto {
    pub id: GameId,
    pub date: DateTime<FixedOffset>,
    pub first_team: String,
    pub second_team: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<game::Model> for GameQueryDto {
    fn from(
        game::Model {
            id,
            date,
            first_team,
            second_team,
            created_at,
        }: game::Model,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            first_team,
            second_team,
            created_at,
        }
    }
}

impl IntoResponse for GameQueryDto {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = CREATED)]
/// The newly created game
pub struct GameCreateResponseDto(pub GameQueryDto);

impl IntoResponse for GameCreateResponseDto {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum GameCreateError {
    #[error("The team names cannot be empty")]
    #[response(status = BAD_REQUEST)]
    /// One of the teams has an empty name
    BlankTeamName,
    #[error("A team cannot play against itself")]
    #[response(status = BAD_REQUEST)]
    /// The two teams are the same
    SameTeams,
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for GameCreateError {
    fn error_code(&self) -> ErrorCode {
        match self {
            GameCreateError::BlankTeamName => ErrorCode::BlankTeamName,
            GameCreateError::SameTeams => ErrorCode::SameTeams,
            GameCreateError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(GameCreateError);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = OK)]
/// All the games, ordered by date
pub struct GameListDto {
    pub games: Vec<GameQueryDto>,
}

impl IntoResponse for GameListDto {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum GameListGetError {
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for GameListGetError {
    fn error_code(&self) -> ErrorCode {
        match self {
            GameListGetError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(GameListGetError);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
/// A game, seen from inside a pool
pub struct PoolGameQueryDto {
    #[serde(flatten)]
    pub game: GameQueryDto,
    /// The guess the requester sent in this pool, if any
    pub guess: Option<GuessQueryDto>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = OK)]
/// The games, with the guesses sent in a pool
pub struct PoolGamesDto {
    pub games: Vec<PoolGameQueryDto>,
}

impl IntoResponse for PoolGamesDto {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoResponses)]
pub enum PoolGamesGetError {
    #[error("Pool not found")]
    #[response(status = NOT_FOUND)]
    /// The pool does not exist
    PoolNotFound,
    #[error("Internal server error")]
    #[response(status = INTERNAL_SERVER_ERROR)]
    /// Internal server error
    InternalServerError,
}

impl ServerError for PoolGamesGetError {
    fn error_code(&self) -> ErrorCode {
        match self {
            PoolGamesGetError::PoolNotFound => ErrorCode::PoolNotFound,
            PoolGamesGetError::InternalServerError => ErrorCode::InternalServerError,
        }
    }
}

crate::endpoint_error!(PoolGamesGetError);

#[derive(OpenApi)]
#[openapi(components(schemas(
    GameCreateDto,
    GameQueryDto,
    GameListDto,
    PoolGameQueryDto,
    PoolGamesDto,
)))]
pub struct ApiComponents;
