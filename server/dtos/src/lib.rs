use std::{error::Error, fmt::Write as _};

pub mod count;
pub mod errors;
pub mod game;
pub mod guess;
pub mod paginated;
pub mod pool;
pub mod user;

/// Log an error that will be hidden from the client
fn internal_server_error<E: Error>(error: &E) {
    let mut report = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(report, "\n  caused by: {cause}");
        source = cause.source();
    }
    tracing::error!("Internal server error: {report}");
}

/// Implement the conversions common to all the endpoint errors
///
/// The error must have an `InternalServerError` variant, where database errors are
/// collapsed after being logged.
macro_rules! endpoint_error {
    ($error:ty) => {
        impl ::axum::response::IntoResponse for $error {
            fn into_response(self) -> ::axum::response::Response {
                ::axum::response::IntoResponse::into_response($crate::errors::ErrorResponse(self))
            }
        }

        impl From<::sea_orm::DbErr> for $error {
            fn from(value: ::sea_orm::DbErr) -> Self {
                $crate::internal_server_error(&value);
                Self::InternalServerError
            }
        }
    };
}
pub(crate) use endpoint_error;
