use fanflow_core::{SportType, Vendor, WaitLevel};
use maud::{html, Markup};
use std::f64::consts::PI;

use crate::domain::catalog::vendor_glyph;

/// The map is drawn in a 500x400 view box around an oval seating ring
pub const VIEW_BOX: &str = "0 0 500 400";
const CENTER: (f64, f64) = (250.0, 200.0);
const RADII: (f64, f64) = (200.0, 150.0);
const SEATING_RING: &str = "M 250,50 A 200,150 0 1,1 250,350 A 200,150 0 1,1 250,50 Z";

/// Vendor pin placed on the seating ring
#[derive(Debug, Clone)]
pub struct VendorPin<'a> {
    pub vendor: &'a Vendor,
    pub svg_x: f64,
    pub svg_y: f64,
    pub level: WaitLevel,
}

/// Spreads vendors evenly around the ring, the i-th at angle `i / n * 2π`
pub fn place_pins(vendors: &[Vendor]) -> Vec<VendorPin<'_>> {
    let count = vendors.len() as f64;
    vendors
        .iter()
        .enumerate()
        .map(|(i, vendor)| {
            let angle = (i as f64 / count) * 2.0 * PI;
            VendorPin {
                vendor,
                svg_x: CENTER.0 + RADII.0 * angle.cos(),
                svg_y: CENTER.1 + RADII.1 * angle.sin(),
                level: vendor.pin_level(),
            }
        })
        .collect()
}

pub fn level_class(level: WaitLevel) -> &'static str {
    match level {
        WaitLevel::Low => "wait-low",
        WaitLevel::Medium => "wait-medium",
        WaitLevel::High => "wait-high",
    }
}

fn field(sport: SportType) -> Markup {
    match sport {
        SportType::Football => html! {
            g class="field field-football" {
                rect x="150" y="140" width="200" height="120" fill="#064e3b" stroke="#065f46" stroke-width="2" {}
                @for i in 1..=9 {
                    @let x = 150 + i * 20;
                    line x1=(x) y1="140" x2=(x) y2="260" stroke="#065f46" stroke-width="1" {}
                }
                rect x="135" y="140" width="15" height="120" fill="#064e3b" stroke="#065f46" {}
                rect x="350" y="140" width="15" height="120" fill="#064e3b" stroke="#065f46" {}
            }
        },
        SportType::Baseball => html! {
            g class="field field-baseball" transform="translate(250, 200)" {
                path d="M 0,-60 L 60,0 L 0,60 L -60,0 Z" fill="#2d5a27" stroke="#3f6212" stroke-width="2" {}
                circle cx="0" cy="0" r="15" fill="#78350f" opacity="0.4" {}
                rect x="-3" y="-63" width="6" height="6" fill="white" {}
                rect x="57" y="-3" width="6" height="6" fill="white" {}
                rect x="-3" y="57" width="6" height="6" fill="white" {}
                rect x="-63" y="-3" width="6" height="6" fill="white" {}
            }
        },
        SportType::Basketball => html! {
            g class="field field-basketball" {
                rect x="170" y="140" width="160" height="120" fill="#92400e" stroke="#78350f" stroke-width="3" {}
                line x1="250" y1="140" x2="250" y2="260" stroke="#78350f" stroke-width="1" {}
                circle cx="250" cy="200" r="20" fill="none" stroke="#78350f" stroke-width="1" {}
                path d="M 170,165 A 35,35 0 0,1 170,235" fill="none" stroke="#fb923c" stroke-width="1" {}
                path d="M 330,165 A 35,35 0 0,0 330,235" fill="none" stroke="#fb923c" stroke-width="1" {}
            }
        },
        SportType::Soccer => html! {
            g class="field field-soccer" {
                rect x="160" y="140" width="180" height="120" fill="#15803d" stroke="#166534" stroke-width="2" {}
                line x1="250" y1="140" x2="250" y2="260" stroke="white" stroke-width="1" opacity="0.3" {}
                circle cx="250" cy="200" r="25" fill="none" stroke="white" stroke-width="1" opacity="0.3" {}
                rect x="160" y="175" width="20" height="50" fill="none" stroke="white" stroke-width="1" opacity="0.3" {}
                rect x="320" y="175" width="20" height="50" fill="none" stroke="white" stroke-width="1" opacity="0.3" {}
            }
        },
    }
}

/// Stadium layout with the sport's field and one clickable pin per vendor.
/// Clicking a pin opens the report modal for that vendor.
pub fn stadium_map(sport: SportType, vendors: &[Vendor]) -> Markup {
    html! {
        div class="box stadium-map" {
            div class="level is-mobile" {
                div class="level-left" {
                    div {
                        h3 class="title is-4 is-uppercase is-italic" { (sport) " Layout" }
                        p class="heading" { "Empower Field Level 1" }
                    }
                }
                div class="level-right" {
                    span class="tag is-success is-light is-rounded" { "Live Flow" }
                }
            }

            svg viewBox=(VIEW_BOX) class="stadium-svg" {
                path d=(SEATING_RING) fill="none" stroke="#1e293b" stroke-width="40" {}
                (field(sport))
                @for pin in place_pins(vendors) {
                    g class={"vendor-pin " (level_class(pin.level))}
                      data-vendor-id=(pin.vendor.id)
                      hx-get=(format!("/vendors/{}/report", pin.vendor.id))
                      hx-target="#modal-root" {
                        title { (pin.vendor.name) " (" (pin.vendor.current_wait_minutes) "m)" }
                        circle class="pin-halo" cx=(format!("{:.1}", pin.svg_x)) cy=(format!("{:.1}", pin.svg_y)) r="16" {}
                        circle class="pin-dot" cx=(format!("{:.1}", pin.svg_x)) cy=(format!("{:.1}", pin.svg_y)) r="10" {}
                        text class="pin-label" x=(format!("{:.1}", pin.svg_x)) y=(format!("{:.1}", pin.svg_y - 18.0)) text-anchor="middle" {
                            (pin.vendor.name)
                        }
                    }
                }
            }

            div class="columns is-mobile has-text-centered map-legend mt-4" {
                div class="column" {
                    p class="has-text-success has-text-weight-bold" { "Low" }
                    p class="heading" { "Under 5m" }
                }
                div class="column" {
                    p class="has-text-warning has-text-weight-bold" { "Med" }
                    p class="heading" { "5-15m" }
                }
                div class="column" {
                    p class="has-text-danger has-text-weight-bold" { "High" }
                    p class="heading" { "15m+" }
                }
            }
        }
    }
}

/// Compact list of the vendors closest to the fan's seat
pub fn nearby_vendors(vendors: &[Vendor]) -> Markup {
    html! {
        div class="box" {
            h4 class="title is-5" { "👥 Nearby Vendors" }
            div class="columns is-multiline" {
                @for vendor in vendors {
                    div class="column is-half" {
                        a class="box nearby-vendor"
                          hx-get=(format!("/vendors/{}/report", vendor.id))
                          hx-target="#modal-root" {
                            div class="media" {
                                div class="media-left" {
                                    span class="is-size-4" { (vendor_glyph(vendor.vendor_type)) }
                                }
                                div class="media-content" {
                                    p class="has-text-weight-bold" { (vendor.name) }
                                    p class="heading" {
                                        "Section " (vendor.section) " • " (vendor.current_wait_minutes) "m"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::seed_vendors;
    use time::OffsetDateTime;

    #[test]
    fn test_pins_are_spread_on_the_ring() {
        let vendors = seed_vendors(OffsetDateTime::now_utc());
        let pins = place_pins(&vendors);

        assert_eq!(pins.len(), 5);
        // First vendor sits at angle zero, on the right of the ring
        assert!((pins[0].svg_x - 450.0).abs() < 1e-9);
        assert!((pins[0].svg_y - 200.0).abs() < 1e-9);

        for pin in &pins {
            let dx = (pin.svg_x - CENTER.0) / RADII.0;
            let dy = (pin.svg_y - CENTER.1) / RADII.1;
            assert!((dx * dx + dy * dy - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pin_levels_follow_wait() {
        let vendors = seed_vendors(OffsetDateTime::now_utc());
        let levels: Vec<_> = place_pins(&vendors).iter().map(|p| p.level).collect();

        // 12m, 5m, 20m, 8m, 3m
        assert_eq!(
            levels,
            vec![
                WaitLevel::Medium,
                WaitLevel::Low,
                WaitLevel::High,
                WaitLevel::Medium,
                WaitLevel::Low
            ]
        );
    }

    #[test]
    fn test_field_changes_with_sport() {
        let vendors = seed_vendors(OffsetDateTime::now_utc());
        let baseball = stadium_map(SportType::Baseball, &vendors).into_string();
        assert!(baseball.contains("field-baseball"));
        assert!(baseball.contains("Baseball Layout"));

        let soccer = stadium_map(SportType::Soccer, &vendors).into_string();
        assert!(soccer.contains("field-soccer"));
        assert!(!soccer.contains("field-baseball"));
    }
}
