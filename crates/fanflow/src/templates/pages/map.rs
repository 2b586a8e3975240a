use fanflow_core::VendorType;
use maud::{html, Markup};

use super::page_header;
use crate::{
    domain::{DashboardSnapshot, Tab},
    templates::{
        fragments::line_list,
        stadium_map::{nearby_vendors, stadium_map},
    },
};

const BUSIEST_LINES: usize = 3;
const NEARBY_VENDORS: usize = 4;

pub fn map_page(snapshot: &DashboardSnapshot) -> Markup {
    let reports = &snapshot.reports;
    html! {
        (page_header(Tab::Map, "Live wait times across the concourse"))
        div class="columns" {
            div class="column is-8" {
                (stadium_map(snapshot.sport, reports.vendors()))
                (nearby_vendors(&reports.nearby(NEARBY_VENDORS)))
            }
            div class="column is-4" {
                div class="box" {
                    h4 class="title is-5 is-uppercase is-italic" { "🕒 Busiest Lines" }
                    (line_list(&reports.busiest(BUSIEST_LINES)))
                }
                div class="box pro-tip" {
                    h4 class="title is-6" { "Pro Tip" }
                    @match reports.shortest_wait(VendorType::Restroom) {
                        Some(restroom) => {
                            p class="has-text-grey-light" {
                                (restroom.name) " (Sec " (restroom.section) ") currently has the shortest restroom wait at "
                                (restroom.current_wait_minutes) " min. Head there at the next break!"
                            }
                        }
                        None => {
                            p class="has-text-grey-light" { "Watch the Flow tab for the next break window." }
                        }
                    }
                }
            }
        }
    }
}
