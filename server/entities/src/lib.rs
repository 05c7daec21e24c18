//! Database entities of the `bolao` server
//!
//! Each module mirrors a table created by `bolao-server-migration`, and exposes
//! a strongly typed id to pass around outside of the database layer.

pub mod game;
pub mod guess;
pub mod participant;
pub mod pool;
pub mod prelude;
pub mod user;

/// Define a typed wrapper around an uuid
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::derive_more::derive::From,
            ::derive_more::derive::Into,
            ::derive_more::derive::Display,
            ::utoipa::ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Generate a new random id
            #[must_use]
            pub fn gen() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }

            pub const fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }
        }

        impl From<$name> for ::sea_orm::Value {
            fn from($name(uuid): $name) -> Self {
                uuid.into()
            }
        }
    };
}
pub(crate) use id_type;
