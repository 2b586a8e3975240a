use fanflow::Message;
use fanflow_core::SportType;
use hyper::StatusCode;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;

use crate::helpers::{go_now, tv_timeout, MockOracleClient, TestApp};

#[tokio::test]
async fn health_check_is_ok_while_running() {
    let test_app = TestApp::new(MockOracleClient::new());
    let (status, _) = test_app.get("/api/v1/health_check", false).await;
    assert_eq!(status, StatusCode::OK);

    test_app.cancel_token.cancel();
    let (status, body) = test_app.get("/api/v1/health_check", false).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("internal server error"));
}

#[tokio::test]
async fn dashboard_starts_from_seeded_session() {
    let test_app = TestApp::new(MockOracleClient::new());
    let (status, body) = test_app.get_json("/api/v1/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sport"], "Football");
    assert_eq!(body["tab"], "map");
    assert_eq!(body["auto_sync"], true);
    assert_eq!(body["game"]["current_period"], "1st Quarter");
    assert_eq!(body["prediction"], serde_json::Value::Null);
    assert_eq!(body["vendors"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["rewards"]["points"], 1250);
    assert_eq!(body["rewards"]["level"], "All-Star");
}

#[tokio::test]
async fn report_updates_vendor_and_credits_points() {
    let test_app = TestApp::new(MockOracleClient::new());

    let (status, body) = test_app
        .post_json("/api/v1/vendors/2/reports", json!({ "wait_minutes": 10 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"], true);
    assert_eq!(body["points"], 50);
    assert_eq!(body["vendor"]["name"], "Craft Brews Alley");
    assert_eq!(body["vendor"]["current_wait_minutes"], 10);
    assert_eq!(body["vendor"]["reports_count"], 23);
    assert_eq!(body["rewards"]["points"], 1300);

    let history = body["rewards"]["history"].as_array().expect("history");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["points"], 50);

    let (_, vendors) = test_app.get_json("/api/v1/vendors").await;
    assert_eq!(vendors[1]["current_wait_minutes"], 10);

    let (_, dashboard) = test_app.get_json("/api/v1/dashboard").await;
    assert_eq!(dashboard["notification"]["message"], "+50 Points Awarded!");
}

#[tokio::test]
async fn report_for_unknown_vendor_is_not_applied() {
    let test_app = TestApp::new(MockOracleClient::new());

    let (status, body) = test_app
        .post_json("/api/v1/vendors/999/reports", json!({ "wait_minutes": 10 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"], false);
    assert_eq!(body["points"], 0);
    assert_eq!(body["rewards"]["points"], 1250);

    let (_, rewards) = test_app.get_json("/api/v1/rewards").await;
    assert_eq!(rewards["history"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn report_wait_is_clamped() {
    let test_app = TestApp::new(MockOracleClient::new());

    let (_, body) = test_app
        .post_json("/api/v1/vendors/1/reports", json!({ "wait_minutes": 90 }))
        .await;
    assert_eq!(body["vendor"]["current_wait_minutes"], 45);

    let (_, body) = test_app
        .post_json("/api/v1/vendors/1/reports", json!({ "wait_minutes": -5 }))
        .await;
    assert_eq!(body["vendor"]["current_wait_minutes"], 0);
    assert_eq!(body["rewards"]["points"], 1350);
}

#[tokio::test]
async fn report_wait_snaps_to_slider_step() {
    let test_app = TestApp::new(MockOracleClient::new());

    let (_, body) = test_app
        .post_json("/api/v1/vendors/2/reports", json!({ "wait_minutes": 7 }))
        .await;
    assert_eq!(body["applied"], true);
    assert_eq!(body["vendor"]["current_wait_minutes"], 5);

    let (_, body) = test_app
        .post_json("/api/v1/vendors/2/reports", json!({ "wait_minutes": 13 }))
        .await;
    assert_eq!(body["vendor"]["current_wait_minutes"], 15);
}

#[tokio::test]
async fn commercial_break_produces_prediction() {
    let mut oracle = MockOracleClient::new();
    oracle
        .expect_predict()
        .times(1)
        .returning(|_| Ok(go_now()));
    let test_app = TestApp::new(oracle);

    let transition = test_app
        .dashboard
        .dispatch(Message::FeedTick(tv_timeout(SportType::Football)));
    assert_eq!(transition.effects.len(), 1);
    assert!(test_app.dashboard.snapshot().is_analyzing);

    sleep(Duration::from_millis(100)).await;

    let (status, body) = test_app.get_json("/api/v1/prediction").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"]["recommendation"], "GO_NOW");
    assert_eq!(body["prediction"]["estimatedWindow"], "2:30 minutes");
    assert_eq!(body["is_analyzing"], false);
    assert_eq!(body["trigger"]["state"], "idle");
}

#[tokio::test]
async fn sport_switch_resets_game_and_prediction() {
    let mut oracle = MockOracleClient::new();
    oracle.expect_predict().returning(|_| Ok(go_now()));
    let test_app = TestApp::new(oracle);

    test_app
        .dashboard
        .dispatch(Message::FeedTick(tv_timeout(SportType::Football)));
    sleep(Duration::from_millis(100)).await;
    let (_, before) = test_app.get_json("/api/v1/prediction").await;
    assert_eq!(before["prediction"]["recommendation"], "GO_NOW");

    let (status, body) = test_app
        .post_json("/api/v1/sport", json!({ "sport": "baseball" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sport"], "Baseball");
    assert_eq!(body["game"]["current_period"], "Top 1st");
    assert_eq!(body["game"]["score"]["home"], 0);
    assert_eq!(body["prediction"], serde_json::Value::Null);

    let (_, game) = test_app.get_json("/api/v1/game").await;
    assert_eq!(game["sport"], "Baseball");
}

#[tokio::test]
async fn unknown_sport_is_rejected() {
    let test_app = TestApp::new(MockOracleClient::new());

    let (status, body) = test_app
        .post_json("/api/v1/sport", json!({ "sport": "cricket" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .is_some_and(|error| error.contains("cricket")));

    let (_, dashboard) = test_app.get_json("/api/v1/dashboard").await;
    assert_eq!(dashboard["sport"], "Football");
}

#[tokio::test]
async fn paused_feed_ignores_ticks() {
    let test_app = TestApp::new(MockOracleClient::new());

    let (status, body) = test_app
        .post_json("/api/v1/feed/sync", json!({ "enabled": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["auto_sync"], false);

    let transition = test_app
        .dashboard
        .dispatch(Message::FeedTick(tv_timeout(SportType::Football)));
    assert!(transition.effects.is_empty());

    let (_, game) = test_app.get_json("/api/v1/game").await;
    assert_eq!(game["is_commercial_break"], false);

    let (_, body) = test_app
        .post_json("/api/v1/feed/sync", json!({ "enabled": true }))
        .await;
    assert_eq!(body["auto_sync"], true);
}
