use fanflow_core::{GameState, PitStopPrediction, Recommendation};
use maud::{html, Markup};

use crate::domain::DashboardSnapshot;

fn recommendation_class(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::GoNow => "is-success",
        Recommendation::Urgent => "is-warning",
        Recommendation::Wait => "is-danger",
    }
}

fn recommendation_glyph(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::GoNow => "✅",
        Recommendation::Urgent => "⚡",
        Recommendation::Wait => "⚠️",
    }
}

/// Scoreboard, prediction card and sync toggle.
///
/// Polls itself while on the flow tab so ticks and oracle answers show up without a reload.
pub fn live_feed(snapshot: &DashboardSnapshot) -> Markup {
    html! {
        div id="live-feed"
            hx-get="/flow/live"
            hx-trigger="every 2s"
            hx-swap="outerHTML" {
            (scoreboard(&snapshot.game))
            (prediction_card(snapshot.prediction.as_ref(), snapshot.is_analyzing))
            (sync_toggle(snapshot.auto_sync))
        }
    }
}

fn scoreboard(game: &GameState) -> Markup {
    html! {
        div class="box scoreboard" {
            div class="level is-mobile mb-4" {
                div class="level-left" {
                    span class="live-dot" {}
                    span class="heading ml-2 mb-0" { "Live Intel Stream" }
                }
                div class="level-right" {
                    span class="tag is-link is-light" { "📡 Automated" }
                }
            }
            div class="level is-mobile" {
                div class="level-item has-text-centered" {
                    div {
                        p class="title is-2" id="score-home" { (game.score.home) }
                        p class="heading" { "Home" }
                    }
                }
                div class="level-item has-text-centered" {
                    div {
                        p class="tag is-dark is-medium is-family-monospace" id="time-remaining" { (game.time_remaining) }
                        p class="heading mt-1" { (game.current_period) }
                    }
                }
                div class="level-item has-text-centered" {
                    div {
                        p class="title is-2" id="score-away" { (game.score.away) }
                        p class="heading" { "Away" }
                    }
                }
            }
            div class="media current-action" {
                div class="media-left" {
                    span class="is-size-4" { "📈" }
                }
                div class="media-content" {
                    p class="heading" { "Current Action" }
                    p class="has-text-weight-bold" id="recent-event" { (game.recent_event) }
                }
                @if game.is_commercial_break {
                    div class="media-right" {
                        span class="tag is-warning is-light tv-timeout" { "TV Timeout" }
                    }
                }
            }
        }
    }
}

/// Break recommendation card with a loading overlay while an analysis is in flight
pub fn prediction_card(prediction: Option<&PitStopPrediction>, is_analyzing: bool) -> Markup {
    let tone = prediction
        .map(|p| recommendation_class(p.recommendation))
        .unwrap_or("is-dark");
    html! {
        div id="prediction-card" class={"notification prediction-card " (tone)} {
            @if is_analyzing {
                div class="analysis-overlay" {
                    span class="loader" {}
                    span class="heading" { "Analyzing Game Flow..." }
                }
            }
            div class="media" {
                div class="media-left" {
                    span class="is-size-2" {
                        (prediction.map(|p| recommendation_glyph(p.recommendation)).unwrap_or("⚡"))
                    }
                }
                div class="media-content" {
                    div class="level is-mobile mb-1" {
                        div class="level-left" {
                            span class="heading" { "Smart Break Analysis" }
                        }
                        @if let Some(prediction) = prediction {
                            div class="level-right" {
                                span class="heading" { "⏱ " (prediction.estimated_window) " Window" }
                            }
                        }
                    }
                    @match prediction {
                        Some(prediction) => {
                            h3 class="title is-3 is-uppercase" { (prediction.recommendation.label()) }
                            p { (prediction.reasoning) }
                        }
                        None => {
                            p class="is-italic has-text-grey-light" {
                                "Waiting for game progression to trigger break analysis..."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn sync_toggle(auto_sync: bool) -> Markup {
    let tone = if auto_sync {
        "has-text-success"
    } else {
        "has-text-grey"
    };
    html! {
        button class={"button is-text is-small sync-toggle " (tone)}
               hx-post="/flow/sync"
               hx-target="#live-feed"
               hx-swap="outerHTML" {
            @if auto_sync { "● Live Feed Connected" } @else { "○ Sync Paused" }
        }
    }
}
