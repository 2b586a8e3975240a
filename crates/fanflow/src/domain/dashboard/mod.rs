mod service;
mod state;

pub use service::*;
pub use state::*;
