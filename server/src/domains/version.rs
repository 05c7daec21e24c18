use axum::{debug_handler, Json};

use bolao_version::Version;
use utoipa_axum::{router::OpenApiRouter, routes};

#[utoipa::path(
    get, path = "/",
    responses(
        (status = OK, body = Version, description = "The version of the server")
    )
)]
#[debug_handler]
/// Version of the server
///
/// The version of the server package.
async fn version() -> Json<Version> {
    Json(crate::VERSION)
}

pub fn router<S: Clone + Send + Sync + 'static>() -> OpenApiRouter<S> {
    let mut router = OpenApiRouter::default().routes(routes!(version));
    super::tag_api(router.get_openapi_mut(), "Version");
    router
}
