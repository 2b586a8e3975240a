pub mod simulator;
mod watcher;

pub use simulator::*;
pub use watcher::*;
