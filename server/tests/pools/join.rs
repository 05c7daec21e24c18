use std::future::IntoFuture as _;

use axum::http::StatusCode;
use futures_util::future::join_all;
use serde_json::json;
use test_log::test;

use crate::infrastructure::Infrastructure;

#[test(tokio::test)]
async fn users_can_join_with_the_code() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, owner) = infrastructure.signup("owner", "password").await;
            let (_, guest) = infrastructure.signup("guest", "password").await;
            let (pool_id, code) = infrastructure.new_pool(Some(&owner), "Pool").await;

            let response = infrastructure
                .server()
                .post("/pools/join")
                .authorization_bearer(&guest)
                .json(&json!({ "code": format!("  {}  ", code.to_lowercase()) }))
                .expect_success()
                .await;
            response.assert_status(StatusCode::CREATED);

            infrastructure
                .server()
                .get(&format!("/pools/{pool_id}"))
                .authorization_bearer(&guest)
                .expect_success()
                .await
                .assert_json_contains(&json!({
                    "owner": { "name": "owner" },
                    "participants_count": 2
                }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn joining_twice_is_refused() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, token) = infrastructure.signup("user", "password").await;
            let (_, code) = infrastructure.new_pool(Some(&token), "Pool").await;

            let response = infrastructure
                .server()
                .post("/pools/join")
                .authorization_bearer(&token)
                .json(&json!({ "code": code }))
                .expect_failure()
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json_contains(&json!({
                "code": 203,
                "message": "You already joined this pool"
            }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn unknown_codes_are_refused() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, token) = infrastructure.signup("user", "password").await;

            let response = infrastructure
                .server()
                .post("/pools/join")
                .authorization_bearer(&token)
                .json(&json!({ "code": "NOPE00" }))
                .expect_failure()
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json_contains(&json!({
                "code": 202,
                "message": "Pool not found"
            }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn first_to_join_an_ownerless_pool_owns_it() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (first_id, first) = infrastructure.signup("first", "password").await;
            let (_, second) = infrastructure.signup("second", "password").await;
            let (pool_id, code) = infrastructure.new_pool(None, "Pool").await;

            infrastructure.join(&first, &code).await;
            infrastructure.join(&second, &code).await;

            infrastructure
                .server()
                .get(&format!("/pools/{pool_id}"))
                .authorization_bearer(&second)
                .expect_success()
                .await
                .assert_json_contains(&json!({
                    "owner": { "id": first_id, "name": "first" },
                    "participants_count": 2
                }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn joining_requires_a_token() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, code) = infrastructure.new_pool(None, "Pool").await;

            infrastructure
                .server()
                .post("/pools/join")
                .json(&json!({ "code": code }))
                .expect_failure()
                .await
                .assert_status(StatusCode::UNAUTHORIZED);
        })
    })
    .await;
}

#[test(tokio::test)]
async fn concurrent_joins_are_refused_but_one() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, owner) = infrastructure.signup("owner", "password").await;
            let (_, guest) = infrastructure.signup("guest", "password").await;
            let (pool_id, code) = infrastructure.new_pool(Some(&owner), "Pool").await;

            let responses = join_all((0..5).map(|_| {
                infrastructure
                    .server()
                    .post("/pools/join")
                    .authorization_bearer(&guest)
                    .json(&json!({ "code": code }))
                    .into_future()
            }))
            .await;

            let mut joined = 0;
            for response in responses {
                if response.status_code() == StatusCode::CREATED {
                    joined += 1;
                } else {
                    response.assert_status(StatusCode::BAD_REQUEST);
                    response.assert_json_contains(&json!({ "code": 203 }));
                }
            }
            assert_eq!(joined, 1);

            infrastructure
                .server()
                .get(&format!("/pools/{pool_id}"))
                .authorization_bearer(&guest)
                .expect_success()
                .await
                .assert_json_contains(&json!({ "participants_count": 2 }));
        })
    })
    .await;
}
