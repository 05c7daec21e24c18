use axum::extract::FromRef;
use bolao_server_auth::{AuthKey, SecurityAddon};
use sea_orm::{DatabaseConnection, DbErr, TransactionError};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

mod auth;
mod games;
mod guesses;
mod pools;
mod users;
mod version;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bolão Server",
        description = "Pools where friends compete guessing the results of football matches",
        license(name = "MIT")
    ),
    modifiers(&SecurityAddon)
)]
struct Api;

pub(super) fn router<S: Clone + Send + Sync + 'static>() -> OpenApiRouter<S>
where
    DatabaseConnection: FromRef<S>,
    AuthKey: FromRef<S>,
{
    OpenApiRouter::with_openapi(Api::openapi())
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/games", games::router())
        .nest("/pools", pools::router())
        .nest("/guesses", guesses::router())
        .nest("/version", version::router())
}

/// Tag all the paths of an api
fn tag_api(openapi: &mut utoipa::openapi::OpenApi, tag: &str) {
    for path in openapi.paths.paths.values_mut() {
        for op in [
            &mut path.get,
            &mut path.head,
            &mut path.trace,
            &mut path.put,
            &mut path.post,
            &mut path.patch,
            &mut path.delete,
        ]
        .into_iter()
        .flatten()
        {
            op.tags.get_or_insert_default().push(tag.to_string());
        }
    }
}

/// Collapse the connection errors of a transaction into the endpoint error
fn transaction_error<E: From<DbErr>>(err: TransactionError<E>) -> E {
    match err {
        TransactionError::Connection(db_err) => db_err.into(),
        TransactionError::Transaction(err) => err,
    }
}
