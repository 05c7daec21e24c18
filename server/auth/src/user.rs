use axum::{extract::FromRequestParts, http::request::Parts};
use bolao_server_entities::user::UserId;
use utoipa::{openapi::SecurityRequirement, Modify};

use crate::{
    claims::{UserClaims, UserClaimsRejection},
    Autenticated,
};

impl<S> FromRequestParts<S> for Autenticated<UserId>
where
    S: Send + Sync,
    UserClaims: FromRequestParts<S, Rejection = UserClaimsRejection>,
{
    type Rejection = UserClaimsRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        UserClaims::from_request_parts(parts, state)
            .await
            .map(|claims| Autenticated(claims.subject))
    }
}

/// Mark all the paths of an api as needing a user token
pub struct RequireUserToken;

impl Modify for RequireUserToken {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
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
                op.security
                    .get_or_insert_default()
                    .push(SecurityRequirement::new::<_, _, &str>("user_token", []));
            }
        }
    }
}
