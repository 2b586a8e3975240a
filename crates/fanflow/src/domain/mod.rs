pub mod catalog;
mod dashboard;
mod feed;
mod prediction;
mod reports;

pub use dashboard::*;
pub use feed::*;
pub use prediction::*;
pub use reports::*;

use fanflow_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Invalid(#[from] CoreError),
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("background task died: {0}")]
    Thread(String),
}
