//! # `/users`: Registered users

use axum::{
    debug_handler,
    extract::{FromRef, State},
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use bolao_server_auth::{Autenticated, AuthKey};
use bolao_server_dtos::{
    count::{CountDto, CountGetError},
    user::{UserGetError, UserQueryDto},
};
use bolao_server_entities::{prelude::*, user::UserId};

#[utoipa::path(get, path = "/count", responses(CountDto, CountGetError))]
#[debug_handler(state = crate::app::AppState)]
/// Number of users
///
/// Count the users registered on the server.
async fn users_count(State(db): State<DatabaseConnection>) -> Result<CountDto, CountGetError> {
    let count = User::find().count(&db).await?;
    Ok(CountDto { count })
}

#[utoipa::path(
    get, path = "/me",
    responses(UserQueryDto, UserGetError),
    security(("user_token" = []))
)]
#[debug_handler(state = crate::app::AppState)]
/// Info about the current user
///
/// Get the basic info about the user owning the token.
async fn users_me(
    State(db): State<DatabaseConnection>,
    id: Autenticated<UserId>,
) -> Result<UserQueryDto, UserGetError> {
    match User::find_by_id(id.into_inner()).one(&db).await? {
        Some(found) => Ok(found.into()),
        None => Err(UserGetError::Deleted),
    }
}

pub(super) fn router<S: Clone + Send + Sync + 'static>() -> OpenApiRouter<S>
where
    DatabaseConnection: FromRef<S>,
    AuthKey: FromRef<S>,
{
    let mut router =
        OpenApiRouter::with_openapi(bolao_server_dtos::user::ApiComponents::openapi())
            .routes(routes!(users_count))
            .routes(routes!(users_me));
    super::tag_api(router.get_openapi_mut(), "Users");
    router
}
