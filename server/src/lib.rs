//! Server of `bolao`, a pool where friends compete guessing the results of
//! football matches.

pub mod app;
mod boot;
mod config;
mod domains;
mod logging;

pub use app::{App, AppConfig, BuildError, FatalError};
pub use boot::{main, Cli, MainError};
pub use clap::Parser as ClapParser;

use bolao_version::Version;
pub const VERSION: Version = Version::new(
    env!("CARGO_PKG_VERSION_MAJOR"),
    env!("CARGO_PKG_VERSION_MINOR"),
    env!("CARGO_PKG_VERSION_PATCH"),
);
