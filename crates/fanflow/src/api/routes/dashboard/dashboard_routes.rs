use axum::{
    extract::{Path, State},
    response::ErrorResponse,
    Json,
};
use fanflow_core::{GameState, PitStopPrediction, RewardLedger, SportType, Vendor, WaitMinutes};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::{str::FromStr, sync::Arc};

use crate::{
    domain::{DashboardSnapshot, Error, TriggerState},
    startup::AppState,
};

pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.snapshot())
}

pub async fn get_vendors(State(state): State<Arc<AppState>>) -> Json<Vec<Vendor>> {
    Json(state.dashboard.snapshot().reports.vendors().to_vec())
}

pub async fn get_game(State(state): State<Arc<AppState>>) -> Json<GameState> {
    Json(state.dashboard.snapshot().game)
}

#[derive(Debug, Serialize)]
pub struct PredictionStatus {
    pub prediction: Option<PitStopPrediction>,
    pub is_analyzing: bool,
    pub trigger: TriggerState,
}

pub async fn get_prediction(State(state): State<Arc<AppState>>) -> Json<PredictionStatus> {
    let snapshot = state.dashboard.snapshot();
    Json(PredictionStatus {
        prediction: snapshot.prediction,
        is_analyzing: snapshot.is_analyzing,
        trigger: snapshot.trigger,
    })
}

pub async fn get_rewards(State(state): State<Arc<AppState>>) -> Json<RewardLedger> {
    Json(state.dashboard.snapshot().reports.ledger().clone())
}

/// Wait-time report from a fan. Out of range values are clamped, not rejected.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub wait_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    /// False when the vendor id matched nothing; the store is left untouched
    pub applied: bool,
    pub vendor: Option<Vendor>,
    pub points: u32,
    pub rewards: RewardLedger,
}

pub async fn submit_vendor_report(
    State(state): State<Arc<AppState>>,
    Path(vendor_id): Path<String>,
    Json(body): Json<ReportRequest>,
) -> Json<ReportResponse> {
    let minutes = WaitMinutes::clamped(body.wait_minutes);
    let transition = state.dashboard.submit_report(&vendor_id, minutes);
    let rewards = state.dashboard.snapshot().reports.ledger().clone();

    match transition.report {
        Some(receipt) => {
            info!(
                "report accepted for {}: {}m (+{} pts)",
                receipt.vendor.name, minutes, receipt.points
            );
            Json(ReportResponse {
                applied: true,
                vendor: Some(receipt.vendor),
                points: receipt.points,
                rewards,
            })
        }
        None => {
            debug!("report for unknown vendor {} was not applied", vendor_id);
            Json(ReportResponse {
                applied: false,
                vendor: None,
                points: 0,
                rewards,
            })
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SportRequest {
    pub sport: String,
}

pub async fn change_sport(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SportRequest>,
) -> Result<Json<DashboardSnapshot>, ErrorResponse> {
    let sport = SportType::from_str(&body.sport).map_err(|e| {
        error!("error changing sport: {:?}", e);
        Error::from(e)
    })?;
    state.dashboard.select_sport(sport);
    Ok(Json(state.dashboard.snapshot()))
}

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub auto_sync: bool,
}

pub async fn set_feed_sync(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SyncRequest>,
) -> Json<SyncResponse> {
    state.dashboard.set_sync(body.enabled);
    Json(SyncResponse {
        auto_sync: state.dashboard.snapshot().auto_sync,
    })
}
