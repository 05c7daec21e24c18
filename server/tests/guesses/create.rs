use std::future::IntoFuture as _;

use axum::http::StatusCode;
use bolao_server_entities::game::GameId;
use futures_util::future::join_all;
use rand::Rng as _;
use serde_json::{json, Value};
use test_log::test;

use crate::infrastructure::Infrastructure;

#[test(tokio::test)]
async fn participants_can_guess() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, token) = infrastructure.signup("user", "password").await;
            let (pool_id, _) = infrastructure.new_pool(Some(&token), "Pool").await;
            let game_id = infrastructure.future_game(&token).await;

            let response = infrastructure
                .server()
                .post(&format!("/pools/{pool_id}/games/{game_id}/guesses"))
                .authorization_bearer(&token)
                .json(&json!({
                    "first_team_points": 2,
                    "second_team_points": 1
                }))
                .expect_success()
                .await;

            response.assert_status(StatusCode::CREATED);
            response.assert_json_contains(&json!({
                "game_id": game_id,
                "first_team_points": 2,
                "second_team_points": 1
            }));

            infrastructure
                .server()
                .get("/guesses/count")
                .expect_success()
                .await
                .assert_json(&json!({ "count": 1 }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn a_game_can_be_guessed_once_per_pool() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, token) = infrastructure.signup("user", "password").await;
            let (pool_id, _) = infrastructure.new_pool(Some(&token), "Pool").await;
            let (other_pool_id, _) = infrastructure.new_pool(Some(&token), "Other").await;
            let game_id = infrastructure.future_game(&token).await;

            let guess = |pool| {
                infrastructure
                    .server()
                    .post(&format!("/pools/{pool}/games/{game_id}/guesses"))
                    .authorization_bearer(&token)
                    .json(&json!({
                        "firstTeamPoints": 0,
                        "secondTeamPoints": 0
                    }))
            };

            guess(pool_id).expect_success().await;
            // another pool is another guess
            guess(other_pool_id).expect_success().await;

            let response = guess(pool_id).expect_failure().await;
            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json_contains(&json!({
                "code": 401,
                "message": "You have already sent a guess to this game on this pool"
            }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn only_participants_can_guess() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, owner) = infrastructure.signup("owner", "password").await;
            let (_, stranger) = infrastructure.signup("stranger", "password").await;
            let (pool_id, _) = infrastructure.new_pool(Some(&owner), "Pool").await;
            let game_id = infrastructure.future_game(&owner).await;

            let response = infrastructure
                .server()
                .post(&format!("/pools/{pool_id}/games/{game_id}/guesses"))
                .authorization_bearer(&stranger)
                .json(&json!({
                    "first_team_points": 1,
                    "second_team_points": 1
                }))
                .expect_failure()
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json_contains(&json!({
                "code": 400,
                "message": "You are not allowed to create a guess inside this pool"
            }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn unknown_games_cannot_be_guessed() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, token) = infrastructure.signup("user", "password").await;
            let (pool_id, _) = infrastructure.new_pool(Some(&token), "Pool").await;

            let response = infrastructure
                .server()
                .post(&format!("/pools/{pool_id}/games/{}/guesses", GameId::gen()))
                .authorization_bearer(&token)
                .json(&json!({
                    "first_team_points": 1,
                    "second_team_points": 1
                }))
                .expect_failure()
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json_contains(&json!({
                "code": 402,
                "message": "Game not found"
            }));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn started_games_cannot_be_guessed() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, token) = infrastructure.signup("user", "password").await;
            let (pool_id, _) = infrastructure.new_pool(Some(&token), "Pool").await;
            let game_id = infrastructure.past_game(&token).await;

            let response = infrastructure
                .server()
                .post(&format!("/pools/{pool_id}/games/{game_id}/guesses"))
                .authorization_bearer(&token)
                .json(&json!({
                    "first_team_points": 3,
                    "second_team_points": 0
                }))
                .expect_failure()
                .await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json_contains(&json!({
                "code": 403,
                "message": "You cannot send guesses after the match"
            }));

            let count: Value = infrastructure
                .server()
                .get("/guesses/count")
                .expect_success()
                .await
                .json();
            assert_eq!(count["count"], json!(0));
        })
    })
    .await;
}

#[test(tokio::test)]
async fn negative_points_are_refused() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, token) = infrastructure.signup("user", "password").await;
            let (pool_id, _) = infrastructure.new_pool(Some(&token), "Pool").await;
            let game_id = infrastructure.future_game(&token).await;

            infrastructure
                .server()
                .post(&format!("/pools/{pool_id}/games/{game_id}/guesses"))
                .authorization_bearer(&token)
                .json(&json!({
                    "first_team_points": -1,
                    "second_team_points": 0
                }))
                .expect_failure()
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        })
    })
    .await;
}

#[test(tokio::test)]
async fn guessing_requires_a_token() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, token) = infrastructure.signup("user", "password").await;
            let (pool_id, _) = infrastructure.new_pool(Some(&token), "Pool").await;
            let game_id = infrastructure.future_game(&token).await;

            infrastructure
                .server()
                .post(&format!("/pools/{pool_id}/games/{game_id}/guesses"))
                .json(&json!({
                    "first_team_points": 1,
                    "second_team_points": 0
                }))
                .expect_failure()
                .await
                .assert_status(StatusCode::UNAUTHORIZED);
        })
    })
    .await;
}

#[test(tokio::test)]
async fn concurrent_guesses_are_refused_but_one() {
    Infrastructure::with(|infrastructure| {
        Box::pin(async move {
            let (_, token) = infrastructure.signup("user", "password").await;
            let (pool_id, _) = infrastructure.new_pool(Some(&token), "Pool").await;
            let game_id = infrastructure.future_game(&token).await;

            let mut rng = rand::thread_rng();
            let guesses: Vec<(u16, u16)> = (0..5)
                .map(|_| (rng.gen_range(0..10), rng.gen_range(0..10)))
                .collect();

            let responses = join_all(guesses.iter().map(|(first, second)| {
                infrastructure
                    .server()
                    .post(&format!("/pools/{pool_id}/games/{game_id}/guesses"))
                    .authorization_bearer(&token)
                    .json(&json!({
                        "first_team_points": first,
                        "second_team_points": second
                    }))
                    .into_future()
            }))
            .await;

            let mut accepted = 0;
            for response in responses {
                if response.status_code() == StatusCode::CREATED {
                    accepted += 1;
                } else {
                    response.assert_status(StatusCode::BAD_REQUEST);
                    response.assert_json_contains(&json!({ "code": 401 }));
                }
            }
            assert_eq!(accepted, 1);

            infrastructure
                .server()
                .get("/guesses/count")
                .expect_success()
                .await
                .assert_json(&json!({ "count": 1 }));
        })
    })
    .await;
}
