use std::borrow::Borrow;
use std::future::Future;
use std::panic::{resume_unwind, AssertUnwindSafe};
use std::pin::Pin;

use axum_test::TestServer;
use bolao_server_dtos::user::token::UserToken;
use bolao_server_entities::{game::GameId, pool::PoolId, user::UserId};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use futures::FutureExt;
use serde_json::json;
use testcontainers_modules::{
    postgres::Postgres,
    testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt},
};
use tracing::instrument;

use bolao_server::app::ConnectOptions;
use bolao_server::{App, AppConfig};

pub struct Infrastructure {
    db: ContainerAsync<Postgres>,
    server: TestServer,
}
#[allow(unused)]
impl Infrastructure {
    /// Run a piece of code with the infrastructure running
    ///
    /// This is in a callback so the teardown code runs automatically at the end
    pub async fn with<F, T>(callback: F) -> T
    where
        F: for<'c> FnOnce(&'c Self) -> Pin<Box<dyn Future<Output = T> + 'c>>,
    {
        let infrastructure = Self::up().await;

        let res = AssertUnwindSafe(callback(&infrastructure))
            .catch_unwind()
            .await;

        Self::down(infrastructure).await;

        match res {
            Ok(t) => t,
            Err(e) => resume_unwind(e),
        }
    }

    /// Pull up the infrastructure
    async fn up() -> Self {
        let db = db().await;
        let connection_string = format!(
            "postgres://bolao_server_test:bolao_server_test@{}:{}/bolao_server_test",
            db.get_host().await.unwrap(),
            db.get_host_port_ipv4(5432).await.unwrap()
        );
        let server = server(connection_string).await;
        Self { db, server }
    }

    /// Close the infrastructure
    async fn down(infrastructure: Infrastructure) {
        let Self { db, server } = infrastructure;
        // drop the server
        drop(server);
        // stop the database
        db.stop().await.expect("Error in stopping postgres");
        // remove the database container
        db.rm().await.expect("Error in removing the test container");
    }

    pub const fn server(&self) -> &TestServer {
        &self.server
    }

    /// Signup a user
    pub async fn signup(
        &self,
        name: impl AsRef<str>,
        password: impl AsRef<str>,
    ) -> (UserId, UserToken) {
        let mut response: serde_json::Value = self
            .server()
            .post("/auth/signup")
            .json(&json!({
                "name": name.as_ref(),
                "password": password.as_ref()
            }))
            .expect_success()
            .await
            .json();
        (
            serde_json::from_value(response["id"].take()).unwrap(),
            serde_json::from_value(response["token"].take()).unwrap(),
        )
    }

    /// Create a pool, returning its id and code
    ///
    /// Without a token the pool has no owner.
    pub async fn new_pool(
        &self,
        token: Option<&UserToken>,
        title: impl AsRef<str>,
    ) -> (PoolId, String) {
        let mut request = self
            .server()
            .post("/pools")
            .json(&json!({ "title": title.as_ref() }));
        if let Some(token) = token {
            request = request.authorization_bearer(token);
        }
        let mut response: serde_json::Value = request.expect_success().await.json();
        (
            serde_json::from_value(response["id"].take()).unwrap(),
            serde_json::from_value(response["code"].take()).unwrap(),
        )
    }

    /// Join a pool
    pub async fn join(&self, token: impl Borrow<UserToken>, code: impl AsRef<str>) {
        self.server()
            .post("/pools/join")
            .authorization_bearer(token.borrow())
            .json(&json!({ "code": code.as_ref() }))
            .expect_success()
            .await;
    }

    /// Add a game to the calendar
    pub async fn new_game(
        &self,
        token: impl Borrow<UserToken>,
        date: DateTime<FixedOffset>,
        first_team: impl AsRef<str>,
        second_team: impl AsRef<str>,
    ) -> GameId {
        let mut response: serde_json::Value = self
            .server()
            .post("/games")
            .authorization_bearer(token.borrow())
            .json(&json!({
                "date": date,
                "first_team": first_team.as_ref(),
                "second_team": second_team.as_ref(),
            }))
            .expect_success()
            .await
            .json();
        serde_json::from_value(response["id"].take()).unwrap()
    }

    /// Add a game that will be played in a week
    pub async fn future_game(&self, token: impl Borrow<UserToken>) -> GameId {
        self.new_game(
            token,
            (Utc::now() + Duration::days(7)).fixed_offset(),
            "BR",
            "AR",
        )
        .await
    }

    /// Add a game that was played yesterday
    pub async fn past_game(&self, token: impl Borrow<UserToken>) -> GameId {
        self.new_game(
            token,
            (Utc::now() - Duration::days(1)).fixed_offset(),
            "DE",
            "IT",
        )
        .await
    }
}

#[instrument]
async fn db() -> ContainerAsync<Postgres> {
    tracing::info!("Creating test database");
    Postgres::default()
        .with_db_name("bolao_server_test")
        .with_user("bolao_server_test")
        .with_password("bolao_server_test")
        .with_tag("17.0-alpine3.20")
        .start()
        .await
        .expect("Cannot start postgred db")
}

#[instrument]
async fn server(connection_string: String) -> TestServer {
    tracing::info!("Creating test app");

    let app = App::build(AppConfig {
        db: ConnectOptions::Url(connection_string),
        ..Default::default()
    })
    .await
    .expect("The app should be buildable")
    .service();

    TestServer::new(app).expect("Cannot create the test server")
}
