pub mod banner;
pub mod modals;
pub mod navbar;

pub use banner::notification_banner;
pub use modals::report_modal;
pub use navbar::{navbar, sport_switcher};
