//! Seed data for a fresh session and the glyph registry used by the views

use fanflow_core::{LedgerEntry, RewardLedger, SportType, Vendor, VendorType};
use time::{Duration, OffsetDateTime};

/// Level label shown for the seeded fan profile
pub const SEED_LEVEL: &str = "All-Star";
/// Point total of the seeded fan profile
pub const SEED_POINTS: u64 = 1250;

/// Display-only reward the fan store advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrizeOffer {
    pub name: &'static str,
    pub points: u64,
    pub glyph: &'static str,
}

pub const FAN_STORE: [PrizeOffer; 4] = [
    PrizeOffer {
        name: "Cold Brew",
        points: 500,
        glyph: "🍺",
    },
    PrizeOffer {
        name: "Large Popcorn",
        points: 800,
        glyph: "🍿",
    },
    PrizeOffer {
        name: "Foam Finger",
        points: 1200,
        glyph: "⭐",
    },
    PrizeOffer {
        name: "VIP Pass",
        points: 5000,
        glyph: "🏅",
    },
];

/// Cheapest prize the fan cannot afford yet, with the progress toward it in percent.
/// Returns `None` once every prize is affordable.
pub fn next_prize(points: u64) -> Option<(PrizeOffer, u8)> {
    FAN_STORE
        .iter()
        .filter(|prize| prize.points > points)
        .min_by_key(|prize| prize.points)
        .map(|prize| {
            let percent = (points.saturating_mul(100) / prize.points).min(100) as u8;
            (*prize, percent)
        })
}

pub fn seed_vendors(now: OffsetDateTime) -> Vec<Vendor> {
    let vendor = |id: &str, name: &str, vendor_type, section: &str, wait, reports| Vendor {
        id: id.to_owned(),
        name: name.to_owned(),
        vendor_type,
        section: section.to_owned(),
        current_wait_minutes: wait,
        last_updated: now,
        reports_count: reports,
    };

    vec![
        vendor("1", "Big League Burgers", VendorType::Food, "102", 12, 45),
        vendor("2", "Craft Brews Alley", VendorType::Drink, "115", 5, 22),
        vendor("3", "Main Concourse Restroom", VendorType::Restroom, "105", 20, 130),
        vendor("4", "Team Store Express", VendorType::Merchandise, "Gate B", 8, 15),
        vendor("5", "Nacho Ordinary Stand", VendorType::Food, "204", 3, 8),
    ]
}

pub fn seed_ledger(now: OffsetDateTime) -> RewardLedger {
    RewardLedger::seeded(
        SEED_POINTS,
        SEED_LEVEL,
        vec![
            LedgerEntry {
                date: now,
                points: 50,
                action: String::from("Wait time report: Big League Burgers"),
            },
            LedgerEntry {
                date: now - Duration::minutes(15),
                points: 25,
                action: String::from("Daily login bonus"),
            },
        ],
    )
}

pub fn sport_glyph(sport: SportType) -> &'static str {
    match sport {
        SportType::Baseball => "⚾",
        SportType::Football => "🏈",
        SportType::Soccer => "⚽",
        SportType::Basketball => "🏀",
    }
}

pub fn vendor_glyph(vendor_type: VendorType) -> &'static str {
    match vendor_type {
        VendorType::Food => "🍕",
        VendorType::Drink => "🍺",
        VendorType::Restroom => "🚻",
        VendorType::Merchandise => "🛍",
    }
}

/// CSS class carrying the per-sport background gradient
pub fn sport_theme_class(sport: SportType) -> &'static str {
    match sport {
        SportType::Football => "theme-football",
        SportType::Baseball => "theme-baseball",
        SportType::Basketball => "theme-basketball",
        SportType::Soccer => "theme-soccer",
    }
}
