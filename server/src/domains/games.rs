//! # `/games`: The calendar of games

use axum::{
    debug_handler,
    extract::{FromRef, State},
};
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::NotSet, DatabaseConnection, EntityTrait, QueryOrder as _,
    Set,
};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use bolao_server_auth::{Autenticated, AuthKey};
use bolao_server_dtos::game::{
    GameCreateDto, GameCreateError, GameCreateResponseDto, GameListDto, GameListGetError,
};
use bolao_server_entities::{
    game::{self, GameId},
    prelude::*,
    user::UserId,
};

#[utoipa::path(get, path = "/", responses(GameListDto, GameListGetError))]
#[debug_handler(state = crate::app::AppState)]
/// List the games
///
/// All the games known to the server, ordered by date.
async fn games_get(State(db): State<DatabaseConnection>) -> Result<GameListDto, GameListGetError> {
    let games = Game::find()
        .order_by_asc(game::Column::Date)
        .all(&db)
        .await?;
    Ok(GameListDto {
        games: games.into_iter().map(Into::into).collect(),
    })
}

#[utoipa::path(
    post, path = "/",
    request_body = GameCreateDto,
    responses(GameCreateResponseDto, GameCreateError),
    security(("user_token" = []))
)]
#[debug_handler(state = crate::app::AppState)]
/// Add a game
///
/// Add a game to the calendar, so participants can start guessing it.
async fn games_post(
    State(db): State<DatabaseConnection>,
    _: Autenticated<UserId>,
    GameCreateDto {
        date,
        first_team,
        second_team,
    }: GameCreateDto,
) -> Result<GameCreateResponseDto, GameCreateError> {
    let first_team = first_team.trim();
    let second_team = second_team.trim();
    if first_team.is_empty() || second_team.is_empty() {
        return Err(GameCreateError::BlankTeamName);
    }
    if first_team.eq_ignore_ascii_case(second_team) {
        return Err(GameCreateError::SameTeams);
    }

    let game = game::ActiveModel {
        id: Set(GameId::gen().into()),
        date: Set(date),
        first_team: Set(first_team.to_owned()),
        second_team: Set(second_team.to_owned()),
        created_at: NotSet,
    }
    .insert(&db)
    .await?;

    Ok(GameCreateResponseDto(game.into()))
}

pub(super) fn router<S: Clone + Send + Sync + 'static>() -> OpenApiRouter<S>
where
    DatabaseConnection: FromRef<S>,
    AuthKey: FromRef<S>,
{
    let mut router =
        OpenApiRouter::with_openapi(bolao_server_dtos::game::ApiComponents::openapi())
            .routes(routes!(games_get, games_post));
    super::tag_api(router.get_openapi_mut(), "Games");
    router
}
