use maud::{html, Markup};

use crate::domain::Notification;

/// Transient acknowledgment banner, polled until the server clears it.
/// `oob` lets a report response push the banner alongside the tab content.
pub fn notification_banner(notification: Option<&Notification>, oob: bool) -> Markup {
    html! {
        div id="notification-banner"
            hx-swap-oob=[oob.then_some("true")]
            hx-get="/notifications"
            hx-trigger="every 1s"
            hx-swap="outerHTML" {
            @if let Some(notification) = notification {
                div class="notification is-success fanflow-banner" data-notification-id=(notification.id) {
                    span class="icon" { "🏆" }
                    strong class="is-uppercase" { (notification.message) }
                }
            }
        }
    }
}
