//! # `/pools/{pool}`: A single pool

use std::collections::HashMap;

use axum::{
    debug_handler,
    extract::{FromRef, State},
};
use sea_orm::{
    ColumnTrait as _, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter as _,
    QueryOrder as _,
};
use utoipa::Modify as _;
use utoipa_axum::{router::OpenApiRouter, routes};

use bolao_server_auth::{Autenticated, AuthKey, RequireUserToken};
use bolao_server_dtos::{
    game::{PoolGameQueryDto, PoolGamesDto, PoolGamesGetError},
    pool::{PoolGetError, PoolPathData, PoolQueryDto},
};
use bolao_server_entities::{game, guess, prelude::*, user::UserId};

mod guesses;

#[utoipa::path(
    get,
    path = "/",
    responses(PoolQueryDto, PoolGetError),
    params(PoolPathData)
)]
#[debug_handler(state = crate::app::AppState)]
/// Get info about the pool
///
/// Get the owner, the number of participants and a preview of the first
/// participants of the pool.
async fn pool_get(
    State(db): State<DatabaseConnection>,
    _: Autenticated<UserId>,
    PoolPathData { id }: PoolPathData,
) -> Result<PoolQueryDto, PoolGetError> {
    let Some((pool, owner)) = Pool::find_by_id(id)
        .find_also_related(User)
        .one(&db)
        .await?
    else {
        return Err(PoolGetError::NotFound);
    };
    Ok(super::pool_summary(&db, pool, owner).await?)
}

#[utoipa::path(
    get,
    path = "/games",
    responses(PoolGamesDto, PoolGamesGetError),
    params(PoolPathData)
)]
#[debug_handler(state = crate::app::AppState)]
/// List the games of the pool
///
/// All the games, ordered by date, each with the guess the current user sent
/// in this pool.
async fn pool_games_get(
    State(db): State<DatabaseConnection>,
    user_id: Autenticated<UserId>,
    PoolPathData { id }: PoolPathData,
) -> Result<PoolGamesDto, PoolGamesGetError> {
    if Pool::find_by_id(id).count(&db).await? == 0 {
        return Err(PoolGamesGetError::PoolNotFound);
    }

    let games = Game::find()
        .order_by_asc(game::Column::Date)
        .all(&db)
        .await?;
    let participant = super::find_participant(&db, id, user_id.into_inner()).await?;
    let mut guesses: HashMap<_, _> = match participant {
        Some(participant) => Guess::find()
            .filter(guess::Column::ParticipantId.eq(participant.id))
            .all(&db)
            .await?
            .into_iter()
            .map(|guess| (guess.game_id, guess))
            .collect(),
        None => HashMap::new(),
    };

    Ok(PoolGamesDto {
        games: games
            .into_iter()
            .map(|game| PoolGameQueryDto {
                guess: guesses.remove(&game.id).map(Into::into),
                game: game.into(),
            })
            .collect(),
    })
}

pub(super) fn router<S: Clone + Send + Sync + 'static>() -> OpenApiRouter<S>
where
    DatabaseConnection: FromRef<S>,
    AuthKey: FromRef<S>,
{
    let mut router = OpenApiRouter::default()
        .routes(routes!(pool_get))
        .routes(routes!(pool_games_get))
        .nest("/games/{game}/guesses", guesses::router());
    RequireUserToken.modify(router.get_openapi_mut());
    router
}
