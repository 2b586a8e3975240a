use fanflow_core::{Vendor, WaitLevel};
use maud::{html, Markup};

use crate::domain::catalog::vendor_glyph;

/// Wait at which the progress bar is full
const FULL_BAR_MINUTES: f64 = 30.0;

pub fn progress_percent(minutes: u32) -> f64 {
    (f64::from(minutes) / FULL_BAR_MINUTES * 100.0).min(100.0)
}

fn wait_color(level: WaitLevel) -> &'static str {
    match level {
        WaitLevel::Low => "has-text-success",
        WaitLevel::Medium => "has-text-warning",
        WaitLevel::High => "has-text-danger",
    }
}

fn progress_color(level: WaitLevel) -> &'static str {
    match level {
        WaitLevel::Low => "is-success",
        WaitLevel::Medium => "is-warning",
        WaitLevel::High => "is-danger",
    }
}

/// Vendor cards with current wait, report count and a report button
pub fn line_list(vendors: &[Vendor]) -> Markup {
    html! {
        div class="line-list" {
            @for vendor in vendors {
                (line_card(vendor))
            }
        }
    }
}

fn line_card(vendor: &Vendor) -> Markup {
    let level = vendor.line_level();
    html! {
        div class="box line-card" id=(format!("vendor-{}", vendor.id)) {
            div class="media" {
                div class="media-left" {
                    span class="is-size-3" { (vendor_glyph(vendor.vendor_type)) }
                }
                div class="media-content" {
                    p class="title is-6" { (vendor.name) }
                    p class="is-size-7 has-text-grey" {
                        "📍 Sec " (vendor.section) " · ⭐ " (vendor.reports_count) " reports"
                    }
                }
                div class="media-right has-text-right" {
                    p class={"title is-4 " (wait_color(level))} { (vendor.current_wait_minutes) " min" }
                    p class="heading" { "Wait Time" }
                }
            }
            div class="level is-mobile" {
                div class="level-item is-flex-grow-1 mr-3" {
                    progress class={"progress is-small " (progress_color(level))}
                             value=(format!("{:.0}", progress_percent(vendor.current_wait_minutes)))
                             max="100" {}
                }
                div class="level-right" {
                    button class="button is-small is-dark"
                           hx-get=(format!("/vendors/{}/report", vendor.id))
                           hx-target="#modal-root" {
                        "Report Line ›"
                    }
                }
            }
        }
    }
}
