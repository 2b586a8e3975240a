use maud::{html, Markup};

use super::page_header;
use crate::{
    domain::{DashboardSnapshot, Tab},
    templates::fragments::live_feed,
};

pub fn flow_page(snapshot: &DashboardSnapshot) -> Markup {
    html! {
        div class="columns is-centered" {
            div class="column is-8" {
                (page_header(Tab::Flow, "Automated monitoring of the live game feed and broadcast signals"))
                h3 class="title is-4 is-italic" { "Pit Stop Predictor" }
                (live_feed(snapshot))
            }
        }
    }
}
