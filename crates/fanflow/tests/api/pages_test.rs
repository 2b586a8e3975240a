use hyper::StatusCode;
use serde_json::json;

use crate::helpers::{MockOracleClient, TestApp};

#[tokio::test]
async fn direct_navigation_renders_full_page() {
    let test_app = TestApp::new(MockOracleClient::new());
    let (status, body) = test_app.get("/flow", false).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("FANFLOW"));
    assert!(body.contains("theme-football"));
    assert!(body.contains("Pit Stop Predictor"));
    assert!(body.contains(r#"id="modal-root""#));
    // The layout already carries the tab bar, no out of band copy
    assert!(!body.contains("hx-swap-oob"));
}

#[tokio::test]
async fn htmx_navigation_renders_fragment_and_tab_bar() {
    let test_app = TestApp::new(MockOracleClient::new());
    let (status, body) = test_app.get("/earn", true).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("<!DOCTYPE html>"));
    assert!(body.contains("Fan Rewards"));
    assert!(body.contains("1,250"));
    assert!(body.contains(r#"id="tab-nav""#));
    assert!(body.contains(r#"hx-swap-oob="true""#));

    let (_, dashboard) = test_app.get_json("/api/v1/dashboard").await;
    assert_eq!(dashboard["tab"], "earn");
}

#[tokio::test]
async fn map_lists_busiest_lines_and_restroom_tip() {
    let test_app = TestApp::new(MockOracleClient::new());
    let (status, body) = test_app.get("/map", true).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Stadium View"));
    assert!(body.contains("Busiest Lines"));
    assert!(body.contains("Main Concourse Restroom"));
    assert!(body.contains("shortest restroom wait"));
    assert!(body.contains("Football Layout"));
}

#[tokio::test]
async fn report_modal_for_known_vendor() {
    let test_app = TestApp::new(MockOracleClient::new());

    let (status, body) = test_app.get("/vendors/2/report", true).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Craft Brews Alley"));
    assert!(body.contains(r#"name="wait_minutes""#));

    let (status, _) = test_app.get("/vendors/999/report", true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn htmx_report_closes_modal_and_shows_banner() {
    let test_app = TestApp::new(MockOracleClient::new());
    test_app.get("/earn", true).await;

    let (status, _, body) = test_app
        .post_form("/vendors/2/report", "wait_minutes=10", true)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("1,300"));
    assert!(body.contains("Reported 10m at Craft Brews Alley"));
    assert!(body.contains(r#"<div id="modal-root" hx-swap-oob="true"></div>"#));
    assert!(body.contains("+50 Points Awarded!"));

    let (_, banner) = test_app.get("/notifications", true).await;
    assert!(banner.contains("+50 Points Awarded!"));
}

#[tokio::test]
async fn plain_report_post_redirects_to_tab() {
    let test_app = TestApp::new(MockOracleClient::new());
    test_app.get("/flow", false).await;

    let (status, location, _) = test_app
        .post_form("/vendors/1/report", "wait_minutes=90", false)
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/flow"));

    let (_, vendors) = test_app.get_json("/api/v1/vendors").await;
    assert_eq!(vendors[0]["current_wait_minutes"], 45);
}

#[tokio::test]
async fn sport_switcher_redirects_and_rethemes() {
    let test_app = TestApp::new(MockOracleClient::new());

    let (status, location, _) = test_app
        .post_form("/sport", "sport=Basketball&tab=flow", false)
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/flow"));

    let (_, body) = test_app.get("/flow", false).await;
    assert!(body.contains("theme-basketball"));

    let (status, _, _) = test_app.post_form("/sport", "sport=Cricket", false).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sync_toggle_swaps_live_feed() {
    let test_app = TestApp::new(MockOracleClient::new());

    let (status, _, body) = test_app.post_form("/flow/sync", "", true).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"id="live-feed""#));
    assert!(body.contains("Sync Paused"));

    let (_, body) = test_app
        .post_json("/api/v1/feed/sync", json!({ "enabled": true }))
        .await;
    assert_eq!(body["auto_sync"], true);

    let (_, body) = test_app.get("/flow/live", true).await;
    assert!(body.contains("Live Feed Connected"));
    assert!(body.contains("Waiting for game progression"));
}

#[tokio::test]
async fn static_assets_are_served() {
    let test_app = TestApp::new(MockOracleClient::new());

    let (status, body) = test_app.get("/ui/styles.css", false).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("theme-football"));

    let (status, _) = test_app.get("/ui/../Cargo.toml", false).await;
    assert_ne!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_path_keeps_current_tab() {
    let test_app = TestApp::new(MockOracleClient::new());
    test_app.get("/earn", false).await;

    let (status, _) = test_app.get("/favicon.ico", false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, dashboard) = test_app.get_json("/api/v1/dashboard").await;
    assert_eq!(dashboard["tab"], "earn");
}

#[tokio::test]
async fn form_report_snaps_to_slider_step() {
    let test_app = TestApp::new(MockOracleClient::new());

    let (status, _, _) = test_app
        .post_form("/vendors/2/report", "wait_minutes=7", false)
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, vendors) = test_app.get_json("/api/v1/vendors").await;
    assert_eq!(vendors[1]["current_wait_minutes"], 5);
}
