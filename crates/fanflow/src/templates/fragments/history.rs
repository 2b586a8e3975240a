use fanflow_core::RewardLedger;
use maud::{html, Markup};
use time::macros::format_description;

pub fn activity_history(ledger: &RewardLedger) -> Markup {
    let clock = format_description!("[hour]:[minute]");
    html! {
        div class="box activity-history" {
            h4 class="title is-5 is-uppercase is-italic" { "🕘 Activity History" }
            @for entry in &ledger.history {
                div class="level is-mobile history-entry" {
                    div class="level-left" {
                        div {
                            p class="has-text-weight-bold" { (entry.action) }
                            p class="heading" { (entry.date.format(clock).unwrap_or_default()) " UTC" }
                        }
                    }
                    div class="level-right" {
                        span class="has-text-success has-text-weight-bold" { "+" (entry.points) }
                    }
                }
            }
        }
    }
}
