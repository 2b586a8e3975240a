use fanflow_core::SportType;
use maud::{html, Markup};

use crate::domain::{catalog::sport_glyph, Tab};

fn tab_glyph(tab: Tab) -> &'static str {
    match tab {
        Tab::Map => "🧭",
        Tab::Flow => "⚡",
        Tab::Earn => "🏆",
    }
}

/// Tab bar switching between map, flow and earn.
///
/// Tabs load into `#main-content` over htmx. Tab responses re-send this bar
/// with `oob` set so the active tab follows the navigation.
pub fn navbar(active: Tab, oob: bool) -> Markup {
    html! {
        div id="tab-nav" class="tabs is-toggle is-fullwidth mb-5" hx-swap-oob=[oob.then_some("true")] {
            ul {
                @for tab in Tab::ALL {
                    li class=[(tab == active).then_some("is-active")] {
                        a href=(tab.path())
                          hx-get=(tab.path())
                          hx-target="#main-content"
                          hx-push-url="true" {
                            span class="icon is-small" { (tab_glyph(tab)) }
                            span class="is-uppercase has-text-weight-bold" { (tab) }
                        }
                    }
                }
            }
        }
    }
}

/// Sport picker. A plain form post so the whole page, theme included, is redrawn.
pub fn sport_switcher(active: SportType, tab: Tab) -> Markup {
    html! {
        form method="post" action="/sport" class="buttons has-addons sport-switcher" {
            input type="hidden" name="tab" value=(tab);
            @for sport in SportType::ALL {
                @let class = if sport == active {
                    "button is-rounded is-link is-selected"
                } else {
                    "button is-rounded is-dark"
                };
                button type="submit" name="sport" value=(sport) class=(class) {
                    span class="sport-glyph" { (sport_glyph(sport)) }
                    span class="is-hidden-mobile" { (sport) }
                }
            }
        }
    }
}
