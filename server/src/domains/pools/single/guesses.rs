//! # `/pools/{pool}/games/{game}/guesses`: Guesses of a participant

use axum::{
    debug_handler,
    extract::{FromRef, State},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::NotSet, ColumnTrait as _, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter as _, Set,
    TransactionTrait as _,
};
use utoipa_axum::{router::OpenApiRouter, routes};

use bolao_server_auth::{Autenticated, AuthKey};
use bolao_server_dtos::guess::{
    GuessCreateDto, GuessCreateError, GuessCreateResponseDto, GuessPathData,
};
use bolao_server_entities::{
    game::GameId,
    guess::{self, GuessId},
    participant::ParticipantId,
    prelude::*,
    user::UserId,
};

async fn already_guessed(
    db: &impl ConnectionTrait,
    participant: ParticipantId,
    game: GameId,
) -> Result<bool, DbErr> {
    Ok(Guess::find()
        .filter(guess::Column::ParticipantId.eq(participant))
        .filter(guess::Column::GameId.eq(game))
        .count(db)
        .await?
        > 0)
}

#[utoipa::path(
    post,
    path = "/",
    request_body = GuessCreateDto,
    responses(GuessCreateResponseDto, GuessCreateError),
    params(GuessPathData)
)]
#[debug_handler(state = crate::app::AppState)]
/// Send a guess
///
/// Guess the result of a game. Only participants of the pool can guess, once
/// per game, and only before the game starts.
async fn guesses_post(
    State(db): State<DatabaseConnection>,
    user_id: Autenticated<UserId>,
    GuessPathData { pool, game }: GuessPathData,
    GuessCreateDto {
        first_team_points,
        second_team_points,
    }: GuessCreateDto,
) -> Result<GuessCreateResponseDto, GuessCreateError> {
    let user_id = user_id.into_inner();

    let created = db
        .transaction::<_, Result<guess::Model, GuessCreateError>, DbErr>(move |txn| {
            Box::pin(async move {
                let Some(participant) = super::super::find_participant(txn, pool, user_id).await?
                else {
                    return Ok(Err(GuessCreateError::NotAParticipant));
                };
                if already_guessed(txn, participant.participant_id(), game).await? {
                    return Ok(Err(GuessCreateError::AlreadyGuessed));
                }
                let Some(game) = Game::find_by_id(game).one(txn).await? else {
                    return Ok(Err(GuessCreateError::GameNotFound));
                };
                if game.started_before(Utc::now().fixed_offset()) {
                    return Ok(Err(GuessCreateError::GameAlreadyStarted));
                }

                guess::ActiveModel {
                    id: Set(GuessId::gen().into()),
                    participant_id: Set(participant.id),
                    game_id: Set(game.id),
                    first_team_points: Set(first_team_points.into()),
                    second_team_points: Set(second_team_points.into()),
                    created_at: NotSet,
                }
                .insert(txn)
                .await
                .map(Ok)
            })
        })
        .await
        .map_err(super::super::super::transaction_error);

    match created {
        Ok(Ok(guess)) => Ok(GuessCreateResponseDto(guess.into())),
        Ok(Err(err)) => Err(err),
        Err(err) => {
            // the unique index refused a guess that raced this one
            if let Some(participant) =
                super::super::find_participant(&db, pool, user_id).await?
            {
                if already_guessed(&db, participant.participant_id(), game).await? {
                    return Err(GuessCreateError::AlreadyGuessed);
                }
            }
            Err(err.into())
        }
    }
}

pub(super) fn router<S: Clone + Send + Sync + 'static>() -> OpenApiRouter<S>
where
    DatabaseConnection: FromRef<S>,
    AuthKey: FromRef<S>,
{
    OpenApiRouter::default().routes(routes!(guesses_post))
}
