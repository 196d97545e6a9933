//! End-to-end tests. These drive the real router over an in-memory SQLite
//! database, one server per test.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use crate::config::{build_pool, create_app, prepare_database};

fn server() -> TestServer {
    let pool = build_pool(":memory:");
    prepare_database(&pool);
    TestServer::new(create_app(pool)).unwrap()
}

async fn create_team(server: &TestServer, name: &str) -> String {
    let res = server.post("/teams").json(&json!({ "name": name })).await;
    res.assert_status_ok();
    res.json::<Value>()["id"].as_str().unwrap().to_string()
}

async fn create_judge(server: &TestServer, name: &str, email: &str) -> String {
    let res = server
        .post("/judges")
        .json(&json!({ "name": name, "email": email }))
        .await;
    res.assert_status_ok();
    res.json::<Value>()["id"].as_str().unwrap().to_string()
}

/// A full ballot: one vote per seeded criterion ("1".."7"), the first `yes`
/// of them scored 1.
fn full_ballot(yes: usize) -> Vec<Value> {
    (0..7)
        .map(|i| {
            json!({
                "criteria_id": (i + 1).to_string(),
                "score": if i < yes { 1 } else { 0 },
            })
        })
        .collect()
}

async fn submit_ballot(
    server: &TestServer,
    judge_id: &str,
    team_id: &str,
    yes: usize,
    overwrite: bool,
) -> axum_test::TestResponse {
    server
        .post("/submit-votes")
        .json(&json!({
            "judge_id": judge_id,
            "team_id": team_id,
            "votes": full_ballot(yes),
            "overwrite_existing": overwrite,
        }))
        .await
}

#[tokio::test]
async fn default_criteria_are_seeded_once() {
    let server = server();

    let criteria = server.get("/criteria").await.json::<Vec<Value>>();
    assert_eq!(criteria.len(), 7);

    let total_weight: f64 = criteria
        .iter()
        .map(|c| c["weight"].as_f64().unwrap())
        .sum();
    assert_eq!(total_weight, 100.0);
    assert!(criteria.iter().all(|c| c["max_score"] == 1));
}

#[tokio::test]
async fn api_prefix_is_an_alias() {
    let server = server();

    let direct = server.get("/criteria").await.json::<Vec<Value>>();
    let prefixed = server.get("/api/criteria").await.json::<Vec<Value>>();
    assert_eq!(direct.len(), prefixed.len());
}

#[tokio::test]
async fn team_creation_requires_a_name() {
    let server = server();

    let res = server.post("/teams").json(&json!({})).await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["error"], "Team name is required");

    create_team(&server, "Rustaceans").await;
    let teams = server.get("/teams").await.json::<Vec<Value>>();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0]["name"], "Rustaceans");
}

#[tokio::test]
async fn judge_creation_validates_email() {
    let server = server();

    let res = server.post("/judges").json(&json!({ "name": "Sam" })).await;
    res.assert_status(StatusCode::BAD_REQUEST);

    let res = server
        .post("/judges")
        .json(&json!({ "name": "Sam", "email": "not-an-email" }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["error"], "Invalid email address");

    create_judge(&server, "Sam", "sam@example.com").await;
    let judges = server.get("/judges").await.json::<Vec<Value>>();
    assert_eq!(judges.len(), 1);
}

#[tokio::test]
async fn single_vote_score_must_be_binary() {
    let server = server();
    let team_id = create_team(&server, "Rustaceans").await;
    let judge_id = create_judge(&server, "Sam", "sam@example.com").await;

    let res = server
        .post("/vote")
        .json(&json!({
            "judge_id": judge_id,
            "team_id": team_id,
            "criteria_id": "1",
            "score": 3,
        }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);

    let res = server
        .post("/vote")
        .json(&json!({
            "judge_id": judge_id,
            "team_id": team_id,
            "criteria_id": "1",
            "score": 1,
        }))
        .await;
    res.assert_status_ok();

    let votes = server.get("/votes").await.json::<Vec<Value>>();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0]["team_name"], "Rustaceans");
    assert_eq!(votes[0]["judge_name"], "Sam");
    assert_eq!(votes[0]["criteria_name"], "Problem Understanding");
}

#[tokio::test]
async fn vote_listing_degrades_to_unknown_names() {
    let server = server();

    let res = server
        .post("/vote")
        .json(&json!({
            "judge_id": "ghost-judge",
            "team_id": "ghost-team",
            "criteria_id": "ghost-criterion",
            "score": 1,
        }))
        .await;
    res.assert_status_ok();

    let votes = server.get("/votes").await.json::<Vec<Value>>();
    assert_eq!(votes[0]["team_name"], "Unknown Team");
    assert_eq!(votes[0]["judge_name"], "Unknown Judge");
    assert_eq!(votes[0]["criteria_name"], "Unknown Criteria");
    assert_eq!(votes[0]["max_score"], 1);
}

#[tokio::test]
async fn duplicate_submission_requires_confirmation() {
    let server = server();
    let team_id = create_team(&server, "Rustaceans").await;
    let judge_id = create_judge(&server, "Sam", "sam@example.com").await;

    let res = submit_ballot(&server, &judge_id, &team_id, 5, false).await;
    res.assert_status_ok();
    let body = res.json::<Value>();
    assert_eq!(body["votes_count"], 7);
    assert_eq!(body["action"], "new");
    assert_eq!(body["email_sent"], true);
    assert_eq!(body["judge_email"], "sam@example.com");
    assert!(body.get("overwritten_votes").is_none());

    // Same pair again, no confirmation: conflict.
    let res = submit_ballot(&server, &judge_id, &team_id, 6, false).await;
    res.assert_status(StatusCode::CONFLICT);
    let body = res.json::<Value>();
    assert_eq!(body["error"], "duplicate_votes");
    assert_eq!(body["existing_votes_count"], 7);
    assert_eq!(body["requires_confirmation"], true);
    assert!(body["existing_votes_date"].is_string());

    // Confirmed: old batch fully replaced, not appended to.
    let res = submit_ballot(&server, &judge_id, &team_id, 6, true).await;
    res.assert_status_ok();
    let body = res.json::<Value>();
    assert_eq!(body["action"], "overwrite");
    assert_eq!(body["overwritten_votes"], 7);

    let votes = server.get("/votes").await.json::<Vec<Value>>();
    assert_eq!(votes.len(), 7);
}

#[tokio::test]
async fn batch_submission_requires_known_judge_and_team() {
    let server = server();
    let team_id = create_team(&server, "Rustaceans").await;

    let res = submit_ballot(&server, "no-such-judge", &team_id, 3, false).await;
    res.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>()["error"], "Judge or team not found");
}

#[tokio::test]
async fn batch_submission_requires_votes() {
    let server = server();

    let res = server
        .post("/submit-votes")
        .json(&json!({ "judge_id": "j", "team_id": "t", "votes": [] }))
        .await;
    res.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn leaderboard_ranks_by_yes_percentage() {
    let server = server();
    let team_a = create_team(&server, "Alpha").await;
    let team_b = create_team(&server, "Beta").await;

    for (name, email, yes) in [
        ("J1", "j1@example.com", 6),
        ("J2", "j2@example.com", 5),
        ("J3", "j3@example.com", 7),
    ] {
        let judge_id = create_judge(&server, name, email).await;
        submit_ballot(&server, &judge_id, &team_a, yes, false)
            .await
            .assert_status_ok();
    }

    let board = server.get("/leaderboard").await.json::<Vec<Value>>();
    assert_eq!(board.len(), 2);

    let top = &board[0];
    assert_eq!(top["id"].as_str().unwrap(), team_a);
    assert_eq!(top["total_yes_votes"], 18);
    assert_eq!(top["total_possible_yes"], 21);
    assert_eq!(top["vote_count"], 21);
    assert_eq!(top["judge_count"], 3);
    let pct = top["final_percentage"].as_f64().unwrap();
    assert!((pct - 85.71).abs() < 1e-9);

    // The unvoted team is present with all-zero metrics, not omitted.
    let bottom = &board[1];
    assert_eq!(bottom["id"].as_str().unwrap(), team_b);
    assert_eq!(bottom["final_percentage"], 0.0);
    assert_eq!(bottom["vote_count"], 0);
    assert_eq!(bottom["judge_count"], 0);
}

#[tokio::test]
async fn deleting_a_criterion_cascades_to_its_votes() {
    let server = server();
    let team_id = create_team(&server, "Rustaceans").await;
    let j1 = create_judge(&server, "J1", "j1@example.com").await;
    let j2 = create_judge(&server, "J2", "j2@example.com").await;

    for judge_id in [&j1, &j2] {
        server
            .post("/vote")
            .json(&json!({
                "judge_id": judge_id,
                "team_id": team_id,
                "criteria_id": "3",
                "score": 1,
            }))
            .await
            .assert_status_ok();
    }
    server
        .post("/vote")
        .json(&json!({
            "judge_id": j1,
            "team_id": team_id,
            "criteria_id": "2",
            "score": 0,
        }))
        .await
        .assert_status_ok();

    let res = server.delete("/criteria/3").await;
    res.assert_status_ok();
    let body = res.json::<Value>();
    assert_eq!(body["deleted_votes"], 2);
    assert_eq!(body["criteria_id"], "3");

    let criteria = server.get("/criteria").await.json::<Vec<Value>>();
    assert_eq!(criteria.len(), 6);
    assert!(criteria.iter().all(|c| c["id"] != "3"));

    let votes = server.get("/votes").await.json::<Vec<Value>>();
    assert_eq!(votes.len(), 1);

    // Already gone.
    server
        .delete("/criteria/3")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn created_criteria_get_the_next_numeric_id() {
    let server = server();

    let res = server
        .post("/criteria")
        .json(&json!({ "name": "Bonus Round", "weight": 5 }))
        .await;
    res.assert_status_ok();
    assert_eq!(res.json::<Value>()["id"], "8");

    let res = server.post("/criteria").json(&json!({ "name": "Nameless" })).await;
    res.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clear_sample_data_resets_everything() {
    let server = server();
    let team_id = create_team(&server, "Rustaceans").await;
    let judge_id = create_judge(&server, "Sam", "sam@example.com").await;
    submit_ballot(&server, &judge_id, &team_id, 4, false)
        .await
        .assert_status_ok();

    let res = server.post("/clear-sample-data").await;
    res.assert_status_ok();
    let body = res.json::<Value>();
    assert_eq!(body["deleted_teams"], 1);
    assert_eq!(body["deleted_judges"], 1);
    assert_eq!(body["deleted_votes"], 7);
    assert_eq!(body["reset_counters"], true);

    let dump = server.get("/debug-db").await.json::<Value>();
    assert_eq!(dump["counts"]["teams"], 0);
    assert_eq!(dump["counts"]["judges"], 0);
    assert_eq!(dump["counts"]["votes"], 0);
    // Criteria come straight back with the default weights.
    assert_eq!(dump["counts"]["criteria"], 7);
    assert!(
        dump["database_state"]["settings"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s["key"] == "sample_data_cleared")
    );
}
