use std::fmt::Display;

pub use konst::{primitive::parse_u16, unwrap_ctx};

/// Version of a `bolao` component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}
impl Version {
    /// Parse a version from its components
    ///
    /// Meant to be fed the `CARGO_PKG_VERSION_*` variables at compile time.
    #[must_use]
    pub const fn new(major: &str, minor: &str, patch: &str) -> Self {
        Self {
            major: unwrap_ctx!(parse_u16(major)),
            minor: unwrap_ctx!(parse_u16(minor)),
            patch: unwrap_ctx!(parse_u16(patch)),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            major,
            minor,
            patch,
        } = self;
        write!(f, "{major}.{minor}.{patch}")
    }
}
