use axum::http::StatusCode;
use bolao_server_entities::pool::PoolId;
use serde_json::{json, Value};
use test_log::test;

use crate::infrastructure::Infrastructure;

#[test(tokio::test)]
async fn preview_shows_the_first_four_participants() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, owner) = infrastructure.signup("owner", "password").await;
            let (pool_id, code) = infrastructure.new_pool(Some(&owner), "Big pool").await;
            for n in 0..5 {
                let (_, token) = infrastructure
                    .signup(format!("guest_{n}"), "password")
                    .await;
                infrastructure.join(&token, &code).await;
            }

            let response: Value = infrastructure
                .server()
                .get(&format!("/pools/{pool_id}"))
                .authorization_bearer(&owner)
                .expect_success()
                .await
                .json();

            assert_eq!(response["participants_count"], json!(6));
            let participants = response["participants"]
                .as_array()
                .expect("Participants should be a list");
            assert_eq!(participants.len(), 4);
            assert_eq!(participants[0]["name"], json!("owner"));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn missing_pools_are_not_found() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, token) = infrastructure.signup("user", "password").await;

            let response = infrastructure
                .server()
                .get(&format!("/pools/{}", PoolId::gen()))
                .authorization_bearer(&token)
                .expect_failure()
                .await;
            response.assert_status(StatusCode::NOT_FOUND);
            response.assert_json_contains(&json!({ "code": 201 }));

            let response = infrastructure
                .server()
                .get("/pools/not-an-id")
                .authorization_bearer(&token)
                .expect_failure()
                .await;
            response.assert_status(StatusCode::NOT_FOUND);
            response.assert_json_contains(&json!({ "code": 2 }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn pool_info_requires_a_token() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (pool_id, _) = infrastructure.new_pool(None, "Pool").await;

            infrastructure
                .server()
                .get(&format!("/pools/{pool_id}"))
                .expect_failure()
                .await
                .assert_status(StatusCode::UNAUTHORIZED);
        })
    })
    .await;
}
