use crate::{
    api::routes::{
        change_sport, earn_page, flow_page, get_dashboard, get_game, get_prediction, get_rewards,
        get_vendors, health, live_feed_fragment, map_page, notifications_fragment,
        report_modal_fragment, select_sport_handler, set_feed_sync, submit_report_handler,
        submit_vendor_report, toggle_sync_handler,
    },
    config::{FeedSettings, OracleSettings, Settings},
    domain::{Dashboard, DashboardState, FeedWatcher, GameFeedSimulator, PredictionTrigger},
    infra::{
        oracle::{GeminiClient, PitStopOracle},
        secrets::get_api_key,
    },
};

// Mock implementations only available with e2e-testing feature or debug builds
#[cfg(any(feature = "e2e-testing", debug_assertions))]
use crate::infra::oracle_mock::MockOracle;
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::{connect_info::IntoMakeServiceWithConnectInfo, ConnectInfo, Path, Request, State},
    http::{header, Extensions, HeaderValue, StatusCode},
    middleware::{self, AddExtension, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    serve::Serve,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::{error, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use reqwest_middleware::{
    reqwest::{self, Client, Url},
    ClientBuilder, ClientWithMiddleware, Middleware,
};
use std::{net::SocketAddr, str::FromStr};
use std::{sync::Arc, time::Duration};
use time::OffsetDateTime;
use tokio::signal::unix::{signal, SignalKind};
use tokio::{net::TcpListener, select};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// htmx marker headers the dashboard sends and reads
const HX_REQUEST: &str = "hx-request";
const HX_TARGET: &str = "hx-target";
const HX_TRIGGER: &str = "hx-trigger";

pub struct Application {
    server: Serve<
        TcpListener,
        IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
        AddExtension<Router, ConnectInfo<SocketAddr>>,
    >,
    cancellation_token: CancellationToken,
    background_tasks: TaskTracker,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        config.validate()?;
        let address = format!(
            "{}:{}",
            config.api_settings.domain, config.api_settings.port
        );
        let listener = SocketAddr::from_str(&address)?;
        let (app_state, background_tasks, cancellation_token) = build_app(config.clone()).await?;
        let server = build_server(listener, app_state, config.api_settings.origins).await?;
        Ok(Self {
            server,
            cancellation_token,
            background_tasks,
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        info!("Starting server...");
        match self.server.with_graceful_shutdown(shutdown_signal()).await {
            Ok(_) => {
                info!("Server shutdown initiated");
                self.cancellation_token.cancel();
                self.background_tasks.close();

                let timeout = tokio::time::sleep(Duration::from_secs(10));
                select! {
                    _ = self.background_tasks.wait() => {
                        info!("Background tasks completed gracefully");
                    }
                    _ = timeout => {
                        warn!("Background tasks timed out during shutdown");
                    }
                }

                info!("Shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!("Server shutdown error: {}", e);
                self.cancellation_token.cancel();
                self.background_tasks.close();

                let _ =
                    tokio::time::timeout(Duration::from_secs(5), self.background_tasks.wait())
                        .await;

                Err(anyhow!("Error during server shutdown: {}", e))
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub ui_dir: String,
    pub remote_url: String,
    pub dashboard: Arc<Dashboard>,
}

pub async fn build_app(
    config: Settings,
) -> Result<(AppState, TaskTracker, CancellationToken), anyhow::Error> {
    info!(
        "Static UI assets configured at {}",
        config.ui_settings.ui_dir
    );

    let reqwest_client = build_reqwest_client();
    let oracle = build_oracle(&config.oracle_settings, reqwest_client)?;

    let tracker = TaskTracker::new();
    let cancel_token = CancellationToken::new();
    let dashboard = build_dashboard(
        &config.feed_settings,
        oracle,
        Duration::from_secs(config.oracle_settings.timeout_secs),
        tracker.clone(),
        cancel_token.clone(),
    );
    info!(
        "Dashboard configured for {} (auto sync: {})",
        config.feed_settings.default_sport, config.feed_settings.auto_sync
    );

    let feed_watcher = FeedWatcher::new(
        dashboard.clone(),
        cancel_token.clone(),
        Duration::from_secs(config.feed_settings.tick_interval_secs),
    );
    tracker.spawn(async move {
        match feed_watcher.watch().await {
            Ok(_) => {
                info!("Successfully shutdown live feed watcher")
            }
            Err(e) => {
                error!("Error in live feed watcher: {}", e)
            }
        }
    });

    let app_state = AppState {
        ui_dir: config.ui_settings.ui_dir,
        remote_url: config.ui_settings.remote_url,
        dashboard,
    };
    Ok((app_state, tracker, cancel_token))
}

/// Builds the dashboard service with a fresh seeded session
pub fn build_dashboard(
    feed_settings: &FeedSettings,
    oracle: Arc<dyn PitStopOracle>,
    oracle_timeout: Duration,
    tracker: TaskTracker,
    cancel_token: CancellationToken,
) -> Arc<Dashboard> {
    let rng = match feed_settings.seed {
        Some(seed) => {
            info!("Seeding live feed with {}", seed);
            ChaCha20Rng::seed_from_u64(seed)
        }
        None => ChaCha20Rng::from_rng(&mut rand::rng()),
    };

    let state = DashboardState::seeded(
        feed_settings.default_sport,
        feed_settings.auto_sync,
        PredictionTrigger::new(feed_settings.analysis_probability),
        Duration::from_secs(feed_settings.acknowledgment_secs),
        OffsetDateTime::now_utc(),
    );

    Arc::new(Dashboard::new(
        state,
        rng,
        GameFeedSimulator::new(feed_settings.commercial_break_probability),
        oracle,
        oracle_timeout,
        tracker,
        cancel_token,
    ))
}

fn build_real_oracle(
    settings: &OracleSettings,
    client: ClientWithMiddleware,
) -> Result<Arc<dyn PitStopOracle>, anyhow::Error> {
    let base_url = Url::parse(&settings.base_url)
        .map_err(|e| anyhow!("Failed to parse oracle url: {}", e))?;
    let api_key = get_api_key(settings.api_key_file.as_deref(), &settings.api_key_env)?;
    info!("Prediction oracle configured with model {}", settings.model);
    Ok(Arc::new(GeminiClient::new(
        client,
        &base_url,
        settings.model.clone(),
        api_key,
    )))
}

#[cfg(any(feature = "e2e-testing", debug_assertions))]
fn build_oracle(
    settings: &OracleSettings,
    client: ClientWithMiddleware,
) -> Result<Arc<dyn PitStopOracle>, anyhow::Error> {
    if settings.mock_enabled {
        info!("Mock prediction oracle configured");
        return Ok(Arc::new(MockOracle::default()));
    }
    build_real_oracle(settings, client)
}

#[cfg(not(any(feature = "e2e-testing", debug_assertions)))]
fn build_oracle(
    settings: &OracleSettings,
    client: ClientWithMiddleware,
) -> Result<Arc<dyn PitStopOracle>, anyhow::Error> {
    if settings.mock_enabled {
        return Err(anyhow!(
            "Mock oracle requires e2e-testing feature or debug build"
        ));
    }
    build_real_oracle(settings, client)
}

pub async fn build_server(
    socket_addr: SocketAddr,
    app_state: AppState,
    origins: Vec<String>,
) -> Result<
    Serve<
        TcpListener,
        IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
        AddExtension<Router, ConnectInfo<SocketAddr>>,
    >,
    anyhow::Error,
> {
    let listener = TcpListener::bind(socket_addr).await?;

    info!("Setting up service");
    let app = app(app_state, origins);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );
    info!(
        "Service running @: http://{}:{}",
        socket_addr.ip(),
        socket_addr.port()
    );
    Ok(server)
}

pub fn app(app_state: AppState, origins: Vec<String>) -> Router {
    let origins: Vec<HeaderValue> = origins
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            header::HeaderName::from_static(HX_REQUEST),
            header::HeaderName::from_static(HX_TARGET),
            header::HeaderName::from_static(HX_TRIGGER),
        ])
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true);

    let api_endpoints = Router::new()
        .route("/health_check", get(health))
        .route("/dashboard", get(get_dashboard))
        .route("/vendors", get(get_vendors))
        .route("/vendors/{vendor_id}/reports", post(submit_vendor_report))
        .route("/game", get(get_game))
        .route("/prediction", get(get_prediction))
        .route("/rewards", get(get_rewards))
        .route("/sport", post(change_sport))
        .route("/feed/sync", post(set_feed_sync));

    // HTMX routes, full page on direct navigation
    let htmx_routes = Router::new()
        .route("/", get(map_page))
        .route("/map", get(map_page))
        .route("/flow", get(flow_page))
        .route("/earn", get(earn_page))
        .route("/flow/live", get(live_feed_fragment))
        .route("/flow/sync", post(toggle_sync_handler))
        .route("/sport", post(select_sport_handler))
        .route(
            "/vendors/{vendor_id}/report",
            get(report_modal_fragment).post(submit_report_handler),
        )
        .route("/notifications", get(notifications_fragment));

    Router::new()
        .merge(htmx_routes)
        .nest("/api/v1", api_endpoints)
        .route("/ui/{*path}", get(serve_static_file))
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(Arc::new(app_state))
        .layer(cors)
}

/// Unmatched paths (favicon probes and the like) must not move the dashboard off its tab
async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}

async fn serve_static_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    // Prevent directory traversal attacks
    if path.contains("..") {
        return (StatusCode::BAD_REQUEST, "Bad request").into_response();
    }

    let file_path = std::path::Path::new(&state.ui_dir).join(&path);

    let content = match tokio::fs::read(&file_path).await {
        Ok(c) => c,
        Err(_) => return (StatusCode::NOT_FOUND, "Not found").into_response(),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, get_mime_type(&path))
        .body(Body::from(content))
        .unwrap_or_else(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response())
}

fn get_mime_type(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "html" | "htm" => "text/html; charset=utf-8",
        "json" | "map" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Outbound client for the oracle. Requests are sent once; a failed call goes
/// straight to the fallback prediction.
pub fn build_reqwest_client() -> ClientWithMiddleware {
    ClientBuilder::new(Client::new())
        .with(LoggingMiddleware)
        .build()
}

struct LoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut Extensions,
        next: reqwest_middleware::Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let method = req.method().clone();
        let url = req.url().clone();

        info!("Making {} request to: {}", method, url);

        let result = next.run(req, extensions).await;

        match &result {
            Ok(response) => {
                info!("{} {} -> Status: {}", method, url, response.status());
            }
            Err(error) => {
                warn!("{} {} -> Error: {:?}", method, url, error);
            }
        }

        result
    }
}

async fn shutdown_signal() {
    let mut sigint = signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

    select! {
        _ = sigint.recv() => info!("Received SIGINT signal"),
        _ = sigterm.recv() => info!("Received SIGTERM signal"),
    }
}
