pub mod history;
pub mod line_list;
pub mod live_feed;

pub use history::activity_history;
pub use line_list::line_list;
pub use live_feed::{live_feed, prediction_card};
