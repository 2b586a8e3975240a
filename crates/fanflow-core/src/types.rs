//! Shared types between the FanFlow service, its views and its JSON API

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use time::OffsetDateTime;

use crate::{CoreError, WaitMinutes};

/// Points credited to the ledger for every accepted line report
pub const REPORT_REWARD_POINTS: u32 = 50;

/// Sports the live feed can simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SportType {
    Baseball,
    Football,
    Soccer,
    Basketball,
}

impl SportType {
    /// Display order of the sport switcher
    pub const ALL: [SportType; 4] = [
        SportType::Baseball,
        SportType::Football,
        SportType::Soccer,
        SportType::Basketball,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SportType::Baseball => "Baseball",
            SportType::Football => "Football",
            SportType::Soccer => "Soccer",
            SportType::Basketball => "Basketball",
        }
    }

    /// Period label a freshly seeded game starts in
    pub fn opening_period(&self) -> &'static str {
        match self {
            SportType::Baseball => "Top 1st",
            _ => "1st Quarter",
        }
    }
}

impl fmt::Display for SportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SportType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SportType::ALL
            .into_iter()
            .find(|sport| sport.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownSport(s.to_owned()))
    }
}

/// Category of a stadium vendor, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VendorType {
    Food,
    Drink,
    Restroom,
    Merchandise,
}

impl fmt::Display for VendorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VendorType::Food => "Food",
            VendorType::Drink => "Drink",
            VendorType::Restroom => "Restroom",
            VendorType::Merchandise => "Merchandise",
        };
        f.write_str(label)
    }
}

/// Coarse line status used for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitLevel {
    Low,
    Medium,
    High,
}

impl WaitLevel {
    /// Level used by line lists: under 5 is low, under 15 is medium
    pub fn for_line(minutes: u32) -> Self {
        if minutes < 5 {
            WaitLevel::Low
        } else if minutes < 15 {
            WaitLevel::Medium
        } else {
            WaitLevel::High
        }
    }

    /// Level used by map pins: over 15 is high, over 5 is medium
    pub fn for_pin(minutes: u32) -> Self {
        if minutes > 15 {
            WaitLevel::High
        } else if minutes > 5 {
            WaitLevel::Medium
        } else {
            WaitLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub vendor_type: VendorType,
    pub section: String,
    pub current_wait_minutes: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    pub reports_count: u32,
}

impl Vendor {
    /// Applies a fan's wait-time report to this vendor
    pub fn record_report(&mut self, minutes: WaitMinutes, at: OffsetDateTime) {
        self.current_wait_minutes = minutes.get();
        self.reports_count += 1;
        self.last_updated = at;
    }

    pub fn line_level(&self) -> WaitLevel {
        WaitLevel::for_line(self.current_wait_minutes)
    }

    pub fn pin_level(&self) -> WaitLevel {
        WaitLevel::for_pin(self.current_wait_minutes)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GamePhase {
    Pre,
    Live,
    Break,
    Final,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GamePhase::Pre => "PRE",
            GamePhase::Live => "LIVE",
            GamePhase::Break => "BREAK",
            GamePhase::Final => "FINAL",
        };
        f.write_str(label)
    }
}

/// Snapshot of the simulated game, replaced wholesale on every feed tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub sport: SportType,
    pub current_period: String,
    pub time_remaining: String,
    pub recent_event: String,
    pub is_commercial_break: bool,
    pub score: Score,
    pub game_phase: GamePhase,
}

impl GameState {
    /// A freshly seeded game for `sport`
    pub fn kickoff(sport: SportType) -> Self {
        Self {
            sport,
            current_period: sport.opening_period().to_owned(),
            time_remaining: String::from("12:45"),
            recent_event: String::from("Kickoff complete"),
            is_commercial_break: false,
            score: Score::default(),
            game_phase: GamePhase::Live,
        }
    }
}

/// What the oracle tells a fan to do about leaving their seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "GO_NOW")]
    GoNow,
    #[serde(rename = "WAIT")]
    Wait,
    #[serde(rename = "URGENT")]
    Urgent,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [
        Recommendation::GoNow,
        Recommendation::Wait,
        Recommendation::Urgent,
    ];

    /// Wire token used by the oracle schema
    pub fn token(&self) -> &'static str {
        match self {
            Recommendation::GoNow => "GO_NOW",
            Recommendation::Wait => "WAIT",
            Recommendation::Urgent => "URGENT",
        }
    }

    /// Human label, e.g. "GO NOW"
    pub fn label(&self) -> String {
        self.token().replace('_', " ")
    }
}

impl FromStr for Recommendation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Recommendation::ALL
            .into_iter()
            .find(|rec| rec.token() == s)
            .ok_or_else(|| CoreError::UnknownRecommendation(s.to_owned()))
    }
}

/// Break recommendation produced by the oracle. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitStopPrediction {
    pub recommendation: Recommendation,
    pub reasoning: String,
    pub estimated_window: String,
}

impl PitStopPrediction {
    /// Value shown whenever the oracle cannot produce a usable answer
    pub fn fallback() -> Self {
        Self {
            recommendation: Recommendation::Wait,
            reasoning: String::from("Data syncing... stay alert."),
            estimated_window: String::from("Unknown"),
        }
    }

    pub fn is_go_now(&self) -> bool {
        self.recommendation == Recommendation::GoNow
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub points: u32,
    pub action: String,
}

/// Append-only rewards ledger, newest entry first.
///
/// `points` always equals `opening_balance` plus the sum of every history delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardLedger {
    pub opening_balance: u64,
    pub points: u64,
    pub level: String,
    pub history: Vec<LedgerEntry>,
}

impl RewardLedger {
    /// Builds a ledger whose current total is `points` with `history` already applied.
    /// History is expected newest first.
    pub fn seeded(points: u64, level: impl Into<String>, history: Vec<LedgerEntry>) -> Self {
        let credited: u64 = history.iter().map(|entry| u64::from(entry.points)).sum();
        Self {
            opening_balance: points.saturating_sub(credited),
            points: points.max(credited),
            level: level.into(),
            history,
        }
    }

    pub fn credit(&mut self, points: u32, action: impl Into<String>, at: OffsetDateTime) {
        self.points += u64::from(points);
        self.history.insert(
            0,
            LedgerEntry {
                date: at,
                points,
                action: action.into(),
            },
        );
    }

    /// Total recomputed from the opening balance and the history
    pub fn replayed_total(&self) -> u64 {
        self.opening_balance
            + self
                .history
                .iter()
                .map(|entry| u64::from(entry.points))
                .sum::<u64>()
    }

    pub fn is_balanced(&self) -> bool {
        self.replayed_total() == self.points
    }
}
