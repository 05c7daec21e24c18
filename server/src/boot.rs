use clap::Parser;
use derive_more::derive::{Display, Error, From};
use tracing::Instrument as _;

use crate::{
    app::{App, BuildError, FatalError},
    config::{configure, Config, ConfigArgs},
    logging::{self, LoggingSetupError},
};

/// Serve the `bolao` pools
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    #[clap(flatten)]
    config: ConfigArgs,
}

#[derive(Debug, Display, Error, From)]
pub enum MainError {
    #[display("Error while reading the configuration")]
    Config(figment::Error),
    #[display("Error while setting up logging")]
    Logging(LoggingSetupError),
    #[display("Cannot start the async runtime")]
    Runtime(std::io::Error),
    #[display("Error while building the server")]
    Build(BuildError),
    #[display("Fatal error while serving")]
    Fatal(FatalError),
}

pub fn main(Cli { config }: Cli) -> Result<(), MainError> {
    let Config { app, logging } = configure(config)?;
    // kept alive until the end, so buffered logs are flushed
    let _guard = logging::init(logging)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(MainError::Runtime)?
        .block_on(
            async move {
                let app = App::build(app).await?;
                app.serve().await?;
                Ok::<_, MainError>(())
            }
            .instrument(tracing::info_span!("bolao-server")),
        )
}
