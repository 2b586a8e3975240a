use fanflow_core::{Vendor, DEFAULT_REPORT_MINUTES, MAX_WAIT_MINUTES, WAIT_STEP_MINUTES};
use maud::{html, Markup};

use crate::domain::catalog::vendor_glyph;

/// Wait-time report modal for a single vendor.
///
/// Loaded into `#modal-root`; the submit swaps the current tab back in and
/// empties the modal out of band.
pub fn report_modal(vendor: &Vendor) -> Markup {
    let action = format!("/vendors/{}/report", vendor.id);
    html! {
        div id="reportModal" class="modal is-active" {
            div class="modal-background"
                onclick="document.getElementById('modal-root').innerHTML = ''" {}
            div class="modal-content" {
                div class="box report-box" {
                    div class="level is-mobile mb-5" {
                        div class="level-left" {
                            h3 class="title is-3 is-uppercase is-italic" { "Submit Intel" }
                        }
                        div class="level-right" {
                            button class="delete is-large" aria-label="close"
                                   onclick="document.getElementById('modal-root').innerHTML = ''" {}
                        }
                    }

                    div class="media box has-background-dark mb-5" {
                        div class="media-left" {
                            span class="is-size-2" { (vendor_glyph(vendor.vendor_type)) }
                        }
                        div class="media-content" {
                            p class="heading" { "Live Status for" }
                            p class="title is-5 has-text-white" { (vendor.name) }
                        }
                    }

                    form method="post" action=(action)
                         hx-post=(action)
                         hx-target="#main-content" {
                        div class="field" {
                            div class="level is-mobile" {
                                label class="label heading" for="wait_minutes" { "Wait Time" }
                                span class="title is-3 has-text-link" {
                                    span id="report-value" { (DEFAULT_REPORT_MINUTES) }
                                    " min"
                                }
                            }
                            div class="control" {
                                input id="wait_minutes" class="slider is-fullwidth"
                                      type="range" name="wait_minutes"
                                      min="0" max=(MAX_WAIT_MINUTES) step=(WAIT_STEP_MINUTES)
                                      value=(DEFAULT_REPORT_MINUTES)
                                      oninput="document.getElementById('report-value').textContent = this.value";
                            }
                        }
                        button type="submit" class="button is-link is-large is-fullwidth mt-5" {
                            "Update Line Status"
                        }
                    }
                }
            }
        }
    }
}
