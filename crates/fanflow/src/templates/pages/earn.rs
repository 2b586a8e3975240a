use maud::{html, Markup};

use super::page_header;
use crate::{
    domain::{
        catalog::{next_prize, FAN_STORE},
        DashboardSnapshot, Tab,
    },
    templates::{format_points, fragments::activity_history},
};

pub fn earn_page(snapshot: &DashboardSnapshot) -> Markup {
    let ledger = snapshot.reports.ledger();
    html! {
        (page_header(Tab::Earn, "Report lines, earn points, unlock stadium perks"))

        div class="box points-hero" {
            div class="columns is-vcentered" {
                div class="column" {
                    p class="heading" { "Authenticated Fan Profile" }
                    p class="title is-1 has-text-white" id="points-total" {
                        (format_points(ledger.points))
                        span class="is-size-5 ml-2" { "PTS" }
                    }
                    div class="tags" {
                        span class="tag is-white is-light" { "Level: " (ledger.level) }
                        span class="tag is-success" { "Top 5% Fan" }
                    }
                }
                div class="column is-4" {
                    @match next_prize(ledger.points) {
                        Some((prize, percent)) => {
                            div class="box next-reward" {
                                div class="level is-mobile mb-2" {
                                    span class="heading" { "Next Reward" }
                                    span class="heading" { (percent) "%" }
                                }
                                progress class="progress is-white" value=(percent) max="100" {}
                                p class="is-size-7 is-italic has-text-centered" {
                                    (format_points(prize.points - ledger.points))
                                    " more points to a "
                                    strong { (prize.name) }
                                    "!"
                                }
                            }
                        }
                        None => {
                            div class="box next-reward" {
                                p class="is-size-7 is-italic has-text-centered" {
                                    "Every prize in the Fan Store is unlocked!"
                                }
                            }
                        }
                    }
                }
            }
        }

        div class="columns" {
            div class="column is-half" {
                (activity_history(ledger))
            }
            div class="column is-half" {
                div class="box fan-store" {
                    h4 class="title is-5 is-uppercase is-italic" { "🎁 Fan Store" }
                    div class="columns is-multiline is-mobile" {
                        @for prize in FAN_STORE {
                            @let class = if prize.points <= ledger.points {
                                "box has-text-centered prize is-affordable"
                            } else {
                                "box has-text-centered prize"
                            };
                            div class="column is-half" {
                                div class=(class) {
                                    p class="is-size-3" { (prize.glyph) }
                                    p class="has-text-weight-bold is-uppercase" { (prize.name) }
                                    p class="heading" { (format_points(prize.points)) " PTS" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
