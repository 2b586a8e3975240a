use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use fanflow::{
    app, build_dashboard, AppState, Dashboard, FeedSettings, OracleError as Error, PitStopOracle,
};
use fanflow_core::{GamePhase, GameState, PitStopPrediction, Recommendation, SportType};
use mockall::mock;
use serde_json::Value;
use std::{
    sync::{Arc, Once},
    time::Duration,
};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tower::ServiceExt;

mock! {
    #[derive(Send, Sync)]
    pub OracleClient { }

    #[async_trait]
    impl PitStopOracle for OracleClient {
        async fn predict(&self, game: &GameState) -> Result<PitStopPrediction, Error>;
    }
}

static INIT_LOGGER: Once = Once::new();

pub fn setup_static_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

/// Feed settings that never trigger an analysis on their own
pub fn quiet_feed_settings() -> FeedSettings {
    FeedSettings {
        seed: Some(7),
        commercial_break_probability: 0.0,
        analysis_probability: 0.0,
        acknowledgment_secs: 3,
        ..FeedSettings::default()
    }
}

pub fn go_now() -> PitStopPrediction {
    PitStopPrediction {
        recommendation: Recommendation::GoNow,
        reasoning: String::from("TV timeout just started, lines are moving."),
        estimated_window: String::from("2:30 minutes"),
    }
}

pub fn tv_timeout(sport: SportType) -> GameState {
    let mut game = GameState::kickoff(sport);
    game.recent_event = String::from("TV Timeout");
    game.is_commercial_break = true;
    game.game_phase = GamePhase::Break;
    game
}

pub struct TestApp {
    pub router: Router,
    pub dashboard: Arc<Dashboard>,
    pub cancel_token: CancellationToken,
}

impl TestApp {
    pub fn new(oracle: MockOracleClient) -> Self {
        Self::with_settings(oracle, quiet_feed_settings())
    }

    pub fn with_settings(oracle: MockOracleClient, feed_settings: FeedSettings) -> Self {
        setup_static_logger();
        let cancel_token = CancellationToken::new();
        let dashboard = build_dashboard(
            &feed_settings,
            Arc::new(oracle),
            Duration::from_secs(1),
            TaskTracker::new(),
            cancel_token.clone(),
        );
        let app_state = AppState {
            ui_dir: String::from("./ui"),
            remote_url: String::from("http://127.0.0.1:9990"),
            dashboard: dashboard.clone(),
        };

        Self {
            router: app(app_state, vec![]),
            dashboard,
            cancel_token,
        }
    }

    pub async fn get(&self, uri: &str, htmx: bool) -> (StatusCode, String) {
        let mut request = Request::builder().method("GET").uri(uri);
        if htmx {
            request = request.header("HX-Request", "true");
        }
        self.send(request.body(Body::empty()).expect("valid request"))
            .await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri, false).await;
        (status, serde_json::from_str(&body).expect("json body"))
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request");
        let (status, body) = self.send(request).await;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).expect("json body")
        };
        (status, json)
    }

    pub async fn post_form(
        &self,
        uri: &str,
        form: &str,
        htmx: bool,
    ) -> (StatusCode, Option<String>, String) {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if htmx {
            request = request.header("HX-Request", "true");
        }
        let response = self
            .router
            .clone()
            .oneshot(request.body(Body::from(form.to_owned())).expect("valid request"))
            .await
            .expect("router response");

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        (status, location, String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
