use axum::http::StatusCode;
use serde_json::{json, Value};
use test_log::test;

use crate::infrastructure::Infrastructure;

#[test(tokio::test)]
async fn registered_user_should_be_able_to_signin() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (id, _) = infrastructure.signup("user", "password").await;

            let response = infrastructure
                .server()
                .post("/auth/signin")
                .json(&json!({
                    "name": "user",
                    "password": "password"
                }))
                .expect_success()
                .await;

            response.assert_status_ok();
            response.assert_json_contains(&json!({
                "id": id,
                "name": "user"
            }));
            let response: Value = response.json();
            assert!(response["token"].is_string());
        })
    })
    .await;
}

#[test(tokio::test)]
async fn wrong_password_should_be_refused() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            infrastructure.signup("user", "password").await;

            let response = infrastructure
                .server()
                .post("/auth/signin")
                .json(&json!({
                    "name": "user",
                    "password": "not the password"
                }))
                .expect_failure()
                .await;

            response.assert_status(StatusCode::UNAUTHORIZED);
            response.assert_json_contains(&json!({ "code": 114 }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn unknown_user_should_be_refused() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let response = infrastructure
                .server()
                .post("/auth/signin")
                .json(&json!({
                    "name": "nobody",
                    "password": "password"
                }))
                .expect_failure()
                .await;

            response.assert_status(StatusCode::UNAUTHORIZED);
            response.assert_json_contains(&json!({ "code": 113 }));
        })
    })
    .await;
}
