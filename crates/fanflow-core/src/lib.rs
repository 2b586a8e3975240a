//! fanflow-core: Shared domain types for the FanFlow stadium companion
//!
//! This crate holds the data model shared by the service, its views and its JSON API.
//! It performs no I/O.

pub mod errors;
pub mod types;
pub mod validation;

pub use errors::*;
pub use types::*;
pub use validation::*;
