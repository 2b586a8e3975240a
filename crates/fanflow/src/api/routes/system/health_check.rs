use axum::{extract::State, response::ErrorResponse};
use hyper::StatusCode;
use log::{debug, error};
use std::sync::Arc;

use crate::{domain::Error, startup::AppState};

pub async fn health(State(state): State<Arc<AppState>>) -> Result<StatusCode, ErrorResponse> {
    // The feed watcher and oracle calls all hang off the dashboard's task tracker
    if !state.dashboard.is_running() {
        let err = Error::Thread(String::from(
            "dashboard background tasks are shutting down, we need to restart the service",
        ));
        error!("{}", err);
        return Err(err.into());
    }

    debug!("service and dashboard background tasks are up");
    Ok(StatusCode::OK)
}
