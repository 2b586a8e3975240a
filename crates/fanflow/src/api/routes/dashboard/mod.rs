mod dashboard_routes;

pub use dashboard_routes::*;
