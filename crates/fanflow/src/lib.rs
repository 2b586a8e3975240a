pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod startup;
pub mod templates;

pub use api::routes::*;
pub use config::*;
pub use domain::{
    Dashboard, DashboardSnapshot, DashboardState, Error as DashboardError, Message, Tab,
};
pub use infra::oracle::{
    predict_or_fallback, Error as OracleError, GeminiClient, PitStopOracle,
};
pub use infra::secrets::get_api_key;
pub use startup::*;
