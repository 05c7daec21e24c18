use std::future::Future;

use axum::{extract::FromRef, Router};
use bolao_server_auth::{AuthConfig, AuthKey, InvalidSecret};
use bolao_server_migration::MigratorTrait;
use derive_more::derive::{Display, Error, From};
use sea_orm::{Database, DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{instrument, Instrument};
use utoipa_swagger_ui::SwaggerUi;

use crate::domains;

mod connection;

pub use connection::{ConnectOptions, DatabaseAddress, DetailedConnectOptions};

/// Config of the server
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// The address to listen to
    pub address: String,
    /// The database to connect to
    pub db: ConnectOptions,
    /// The authentication setups
    pub auth: AuthConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            address: String::from("0.0.0.0:3333"),
            db: ConnectOptions::default(),
            auth: AuthConfig::default(),
        }
    }
}

/// An unrecoverable error while building the server
#[derive(Debug, Display, Error, From)]
pub enum BuildError {
    #[display("Cannot prepare the database")]
    Database(DbErr),
    #[display("Cannot create the authentication key")]
    AuthKey(InvalidSecret),
}

/// An unrecoverable server error
#[derive(Debug, Display, Error, From)]
pub enum FatalError {
    #[display("Cannot bind to the address `{addr}`")]
    BindAddress {
        source: std::io::Error,
        addr: String,
    },
    #[display("Fatal io error while serving")]
    IOError(std::io::Error),
}

/// Global state of the app
#[derive(Debug, Clone, FromRef)]
pub(crate) struct AppState {
    database: DatabaseConnection,
    auth_key: AuthKey,
}
impl AppState {
    #[instrument(name = "initialize-appstate", skip_all)]
    async fn init(db: ConnectOptions, auth: AuthConfig) -> Result<Self, BuildError> {
        tracing::info!("Connecting to the database");
        let database = Database::connect(sea_orm::ConnectOptions::from(db))
            .instrument(tracing::info_span!("initial-db-connection"))
            .await?;
        tracing::info!("Applying eventual migrations to the database");
        bolao_server_migration::Migrator::up(&database, None)
            .instrument(tracing::info_span!("apply-pending-migrations"))
            .await?;
        let auth_key = AuthKey::new(auth)?;
        Ok(Self { database, auth_key })
    }
}

/// The server, ready to serve
pub struct App {
    address: String,
    router: Router,
}

impl App {
    /// Connect to the database and prepare the routes
    #[instrument(skip_all)]
    pub async fn build(
        AppConfig { address, db, auth }: AppConfig,
    ) -> Result<Self, BuildError> {
        #[cfg(debug_assertions)]
        tracing::warn!("This is a debug build. As such, it is slower and unsecure. Use a release build in production");

        tracing::debug!("Creating global app state");
        let state = AppState::init(db, auth).await?;

        let (router, api) = domains::router().split_for_parts();
        let router = router
            .layer(TraceLayer::new_for_http())
            .with_state(state)
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api));

        Ok(Self { address, router })
    }

    /// The service, without binding it to any address
    pub fn service(self) -> Router {
        self.router
    }

    /// Serve the app until a shutdown signal is received
    pub async fn serve(self) -> Result<(), FatalError> {
        self.serve_with_shutdown(shutdown_signal()).await
    }

    #[instrument(skip(self, shutdown), fields(addr = %self.address))]
    pub async fn serve_with_shutdown<S: Future<Output = ()> + Send + 'static>(
        self,
        shutdown: S,
    ) -> Result<(), FatalError> {
        let Self { address, router } = self;
        tracing::debug!("Creating the listener");
        let listener =
            TcpListener::bind(&address)
                .await
                .map_err(|source| FatalError::BindAddress {
                    source,
                    addr: address.clone(),
                })?;
        tracing::info!("Start serving the app");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("Server stopped");
        Ok(())
    }
}

#[instrument]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Cannot listen for Ctrl+C: {err}");
            std::future::pending::<()>().await
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(err) => {
                tracing::error!("Cannot listen for SIGTERM: {err}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    };
    tracing::info!("Received shutdown signal")
}
