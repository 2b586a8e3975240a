pub mod earn;
pub mod flow;
pub mod map;

pub use earn::earn_page;
pub use flow::flow_page;
pub use map::map_page;

use maud::{html, Markup};

use crate::domain::{DashboardSnapshot, Tab};

/// Renders whichever tab the dashboard is currently on
pub fn tab_page(snapshot: &DashboardSnapshot) -> Markup {
    match snapshot.tab {
        Tab::Map => map_page(snapshot),
        Tab::Flow => flow_page(snapshot),
        Tab::Earn => earn_page(snapshot),
    }
}

fn page_header(tab: Tab, subtitle: &str) -> Markup {
    html! {
        div class="mb-5" {
            h2 class="title is-1 is-uppercase is-italic has-text-white" { (tab.heading()) }
            p class="subtitle is-6 has-text-grey-light" { (subtitle) }
        }
    }
}
