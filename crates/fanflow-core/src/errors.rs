//! Shared error types

use thiserror::Error;

/// Core errors shared between the service and its views
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unknown sport: {0}")]
    UnknownSport(String),

    #[error("unknown recommendation: {0}")]
    UnknownRecommendation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
