use axum::http::StatusCode;
use fnv::FnvHashSet;
use serde_json::{json, Value};
use test_log::test;

use crate::infrastructure::Infrastructure;

fn is_valid_code(code: &str) -> bool {
    code.len() == 6
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

#[test(tokio::test)]
async fn anyone_can_create_a_pool() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let response = infrastructure
                .server()
                .post("/pools")
                .json(&json!({ "title": "Office pool" }))
                .expect_success()
                .await;

            response.assert_status(StatusCode::CREATED);
            let response: Value = response.json();
            assert!(response["id"].is_string());
            let code = response["code"].as_str().expect("The code must be a string");
            assert!(is_valid_code(code), "Invalid code {code}");
        })
    })
    .await;
}

#[test(tokio::test)]
async fn creator_becomes_owner_and_participant() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (user_id, token) = infrastructure.signup("owner", "password").await;
            let (pool_id, _) = infrastructure.new_pool(Some(&token), "Family pool").await;

            let response = infrastructure
                .server()
                .get(&format!("/pools/{pool_id}"))
                .authorization_bearer(&token)
                .expect_success()
                .await;

            response.assert_json_contains(&json!({
                "id": pool_id,
                "title": "Family pool",
                "owner": { "id": user_id, "name": "owner" },
                "participants_count": 1,
            }));
            let response: Value = response.json();
            assert_eq!(response["participants"][0]["user_id"], json!(user_id));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn invalid_tokens_create_anonymous_pools() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, token) = infrastructure.signup("user", "password").await;

            let mut response: Value = infrastructure
                .server()
                .post("/pools")
                .authorization_bearer("not-a-token")
                .json(&json!({ "title": "Anonymous pool" }))
                .expect_success()
                .await
                .json();
            let pool_id = response["id"].take();

            let response = infrastructure
                .server()
                .get(&format!("/pools/{}", pool_id.as_str().unwrap()))
                .authorization_bearer(&token)
                .expect_success()
                .await;
            response.assert_json_contains(&json!({
                "owner": null,
                "participants_count": 0,
                "participants": [],
            }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn codes_are_unique() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let pools = futures_util::future::join_all(
                (0..20).map(|n| infrastructure.new_pool(None, format!("pool_{n}"))),
            )
            .await;

            let codes: FnvHashSet<_> = pools.iter().map(|(_, code)| code.clone()).collect();
            assert_eq!(codes.len(), pools.len());
            assert!(codes.iter().all(|code| is_valid_code(code)));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn blank_titles_are_refused() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let response = infrastructure
                .server()
                .post("/pools")
                .json(&json!({ "title": "   " }))
                .expect_failure()
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json_contains(&json!({ "code": 200 }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn count_follows_creation() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            for n in 0..3 {
                infrastructure.new_pool(None, format!("pool_{n}")).await;
            }

            infrastructure
                .server()
                .get("/pools/count")
                .expect_success()
                .await
                .assert_json(&json!({ "count": 3 }));
        })
    })
    .await;
}
