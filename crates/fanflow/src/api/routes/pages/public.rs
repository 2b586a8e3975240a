use std::{str::FromStr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use fanflow_core::{SportType, WaitMinutes};
use log::{debug, info, warn};
use maud::{html, Markup};
use serde::Deserialize;

use crate::{
    domain::{DashboardSnapshot, Error, Tab},
    startup::AppState,
    templates::{
        components::{navbar, notification_banner, report_modal},
        fragments::live_feed,
        layouts::base::{base, PageConfig},
        pages::tab_page,
    },
};

const PAGE_TITLE: &str = "FanFlow | Stadium Companion";

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}

/// Helper to render a fragment or wrap it in the base layout for direct navigation.
/// Returns just the fragment for HTMX requests, or a full page for direct URL access.
fn render_fragment(
    headers: &HeaderMap,
    state: &AppState,
    snapshot: &DashboardSnapshot,
    content: Markup,
) -> Html<String> {
    if is_htmx(headers) {
        Html(content.into_string())
    } else {
        let config = PageConfig {
            title: PAGE_TITLE,
            api_base: &state.remote_url,
        };
        Html(base(&config, snapshot, content).into_string())
    }
}

/// Switches the active tab and renders it.
/// Tab bar goes out of band on htmx swaps so the highlighted tab follows along.
fn tab_response(headers: &HeaderMap, state: &AppState, tab: Tab) -> Html<String> {
    state.dashboard.select_tab(tab);
    let snapshot = state.dashboard.snapshot();

    let content = if is_htmx(headers) {
        html! {
            (tab_page(&snapshot))
            (navbar(tab, true))
        }
    } else {
        tab_page(&snapshot)
    };
    render_fragment(headers, state, &snapshot, content)
}

pub async fn map_page(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Html<String> {
    tab_response(&headers, &state, Tab::Map)
}

pub async fn flow_page(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Html<String> {
    tab_response(&headers, &state, Tab::Flow)
}

pub async fn earn_page(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Html<String> {
    tab_response(&headers, &state, Tab::Earn)
}

/// Polled by the flow tab for fresh ticks and oracle answers
pub async fn live_feed_fragment(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Html<String> {
    let snapshot = state.dashboard.snapshot();
    render_fragment(&headers, &state, &snapshot, live_feed(&snapshot))
}

pub async fn toggle_sync_handler(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Html<String> {
    let auto_sync = state.dashboard.toggle_sync();
    info!("live feed sync {}", if auto_sync { "resumed" } else { "paused" });

    let snapshot = state.dashboard.snapshot();
    render_fragment(&headers, &state, &snapshot, live_feed(&snapshot))
}

#[derive(Debug, Deserialize)]
pub struct SportForm {
    pub sport: String,
    pub tab: Option<String>,
}

/// Full page post from the sport switcher; redirects back to the tab it came from
pub async fn select_sport_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SportForm>,
) -> Result<Redirect, Error> {
    let sport = SportType::from_str(&form.sport)?;
    let tab = match form.tab.as_deref() {
        Some(tab) => Tab::from_str(tab)?,
        None => state.dashboard.snapshot().tab,
    };

    state.dashboard.select_sport(sport);
    Ok(Redirect::to(tab.path()))
}

pub async fn report_modal_fragment(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Path(vendor_id): Path<String>,
) -> Result<Html<String>, Error> {
    let snapshot = state.dashboard.snapshot();
    let Some(vendor) = snapshot.reports.vendor(&vendor_id) else {
        warn!("report modal requested for unknown vendor {}", vendor_id);
        return Err(Error::NotFound(format!("vendor {}", vendor_id)));
    };

    let modal = report_modal(vendor);
    Ok(render_fragment(&headers, &state, &snapshot, modal))
}

#[derive(Debug, Deserialize)]
pub struct ReportForm {
    pub wait_minutes: i64,
}

/// Accepts a report from the modal.
///
/// htmx gets the refreshed tab with the modal closed and the acknowledgment
/// banner pushed out of band. Plain form posts are redirected back to the tab.
pub async fn submit_report_handler(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Path(vendor_id): Path<String>,
    Form(form): Form<ReportForm>,
) -> Response {
    let minutes = WaitMinutes::clamped(form.wait_minutes);
    let transition = state.dashboard.submit_report(&vendor_id, minutes);
    match &transition.report {
        Some(receipt) => info!(
            "report accepted for {}: {}m (+{} pts)",
            receipt.vendor.name, minutes, receipt.points
        ),
        None => debug!("report for unknown vendor {} was not applied", vendor_id),
    }

    let snapshot = state.dashboard.snapshot();
    if !is_htmx(&headers) {
        return Redirect::to(snapshot.tab.path()).into_response();
    }

    let content = html! {
        (tab_page(&snapshot))
        div id="modal-root" hx-swap-oob="true" {}
        (notification_banner(snapshot.notification.as_ref(), true))
    };
    Html(content.into_string()).into_response()
}

pub async fn notifications_fragment(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Html<String> {
    let snapshot = state.dashboard.snapshot();
    let banner = notification_banner(snapshot.notification.as_ref(), false);
    render_fragment(&headers, &state, &snapshot, banner)
}
