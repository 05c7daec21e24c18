//! Authentication of the `bolao` users
//!
//! Users authenticate with a signed jwt, sent as a bearer token. The handlers
//! receive the id of the user as an [`Autenticated<UserId>`](Autenticated).

use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify,
};

mod auth_key;
mod claims;
mod user;

pub use auth_key::{AuthConfig, AuthKey, InvalidSecret};
pub use claims::{
    check_password, hash_password, new_token, InvalidTokenError, NewTokenError, PasswordError,
    UserClaimsRejection,
};
pub use user::RequireUserToken;

/// An object that was requested by an autenticated user
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Autenticated<T>(T);

impl<T> std::ops::Deref for Autenticated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.inner()
    }
}

impl<T> Autenticated<T> {
    pub fn inner(&self) -> &T {
        &self.0
    }
    pub fn into_inner(self) -> T {
        self.0
    }
}

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut http = Http::new(HttpAuthScheme::Bearer);
        http.bearer_format = Some("JWT".to_owned());
        http.description = Some(
            "A jwt token obtained either from the `/auth/signin` or `/auth/signup` endpoint"
                .to_owned(),
        );
        components.add_security_scheme("user_token", SecurityScheme::Http(http))
    }
}
