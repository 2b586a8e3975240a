use maud::{html, Markup, DOCTYPE};

use crate::{
    domain::{catalog::sport_theme_class, DashboardSnapshot},
    templates::{
        components::{navbar, notification_banner, sport_switcher},
        format_points,
    },
};

pub struct PageConfig<'a> {
    pub title: &'a str,
    pub api_base: &'a str,
}

pub fn base(config: &PageConfig, snapshot: &DashboardSnapshot, content: Markup) -> Markup {
    let rewards = snapshot.reports.ledger();
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                base href="/";
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.title) }

                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bulma@1.0.2/css/bulma.min.css";
                link rel="stylesheet" href="/ui/styles.css";

                script src="https://unpkg.com/htmx.org@1.9.10" {}
            }
            body class=(sport_theme_class(snapshot.sport))
                 data-api-base=(config.api_base) {
                (notification_banner(snapshot.notification.as_ref(), false))

                div class="columns is-gapless fanflow-shell" {
                    aside class="column is-2 is-hidden-touch fanflow-sidebar" {
                        div class="brand mb-6" {
                            h1 class="title is-4 has-text-white" { "FANFLOW" }
                            span class="tag is-link is-light" { "Live Connect" }
                        }
                        div class="box xp-card" {
                            div class="level is-mobile mb-2" {
                                span class="heading" { "My XP" }
                                span class="tag is-success is-light" { (rewards.level) }
                            }
                            p class="title is-5" id="xp-points" { (format_points(rewards.points)) }
                            p class="heading" { "Fan Rank Points" }
                        }
                    }

                    main class="column section pt-5" {
                        div class="container" {
                            div class="level mb-5" {
                                div class="level-left" {
                                    span class="tag is-link is-medium" {
                                        "Live at Empower Field"
                                    }
                                }
                                div class="level-right" {
                                    (sport_switcher(snapshot.sport, snapshot.tab))
                                }
                            }
                            (navbar(snapshot.tab, false))
                            div id="main-content" {
                                (content)
                            }
                        }
                    }
                }

                div id="modal-root" {}
            }
        }
    }
}
