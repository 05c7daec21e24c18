//! # `/guesses`: Guesses sent on all the pools
//!
//! Sending a guess happens inside a pool, at
//! `/pools/{pool}/games/{game}/guesses`.

use axum::{
    debug_handler,
    extract::{FromRef, State},
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

use bolao_server_dtos::count::{CountDto, CountGetError};
use bolao_server_entities::prelude::*;

#[utoipa::path(get, path = "/count", responses(CountDto, CountGetError))]
#[debug_handler(state = crate::app::AppState)]
/// Number of guesses
///
/// Count the guesses sent on all the pools.
async fn guesses_count(State(db): State<DatabaseConnection>) -> Result<CountDto, CountGetError> {
    let count = Guess::find().count(&db).await?;
    Ok(CountDto { count })
}

pub(super) fn router<S: Clone + Send + Sync + 'static>() -> OpenApiRouter<S>
where
    DatabaseConnection: FromRef<S>,
{
    let mut router =
        OpenApiRouter::with_openapi(bolao_server_dtos::guess::ApiComponents::openapi())
            .routes(routes!(guesses_count));
    super::tag_api(router.get_openapi_mut(), "Guesses");
    router
}
