//! Synthetic live game feed
//!
//! Nothing here models real sport rules. Events are drawn from a fixed vocabulary,
//! the clock label is re-rolled every tick and scoring plays bump the home score
//! by a random amount. The feed exists to give the break predictor something to chew on.

use fanflow_core::{GamePhase, GameState, Score, SportType};
use rand::Rng;

/// Chance a tick is flagged as a broadcast break even when the event text does not say so
pub const COMMERCIAL_BREAK_RESIDUAL_PROBABILITY: f64 = 0.15;

/// Lowercased fragments that mark an event as a stoppage
pub const BREAK_KEYWORDS: [&str; 2] = ["timeout", "between"];

/// Upper bound (inclusive) of the home score bump on a scoring play
pub const MAX_SCORING_PLAY_POINTS: u32 = 6;

const FOOTBALL_EVENTS: [&str; 6] = [
    "Touchdown!",
    "Incomplete Pass",
    "TV Timeout",
    "First Down",
    "Official Review",
    "Punt coming up",
];
const BASEBALL_EVENTS: [&str; 6] = [
    "Strikeout",
    "Home Run!",
    "Pitching Change",
    "Between Innings",
    "Full Count",
    "Foul Ball",
];
const BASKETBALL_EVENTS: [&str; 6] = [
    "3-Pointer!",
    "Foul called",
    "Full Timeout",
    "Free Throws",
    "Substitution",
    "Fast Break",
];
const SOCCER_EVENTS: [&str; 6] = [
    "Goal!",
    "Yellow Card",
    "Corner Kick",
    "Injury Delay",
    "Offside",
    "Goal Kick",
];

pub fn event_vocabulary(sport: SportType) -> &'static [&'static str] {
    match sport {
        SportType::Football => &FOOTBALL_EVENTS,
        SportType::Baseball => &BASEBALL_EVENTS,
        SportType::Basketball => &BASKETBALL_EVENTS,
        SportType::Soccer => &SOCCER_EVENTS,
    }
}

pub fn is_break_event(event: &str) -> bool {
    let lowered = event.to_lowercase();
    BREAK_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Simulation approximation: any exclamation or "Goal" counts as a scoring play
pub fn is_scoring_event(event: &str) -> bool {
    event.contains('!') || event.contains("Goal")
}

#[derive(Debug, Clone)]
pub struct GameFeedSimulator {
    commercial_break_probability: f64,
}

impl Default for GameFeedSimulator {
    fn default() -> Self {
        Self::new(COMMERCIAL_BREAK_RESIDUAL_PROBABILITY)
    }
}

impl GameFeedSimulator {
    /// `commercial_break_probability` must already be validated to lie in `[0, 1]`
    pub fn new(commercial_break_probability: f64) -> Self {
        Self {
            commercial_break_probability,
        }
    }

    /// Produces the state that replaces `previous` on the next tick
    pub fn next_state<R: Rng + ?Sized>(&self, previous: &GameState, rng: &mut R) -> GameState {
        let events = event_vocabulary(previous.sport);
        let event = events[rng.random_range(0..events.len())];

        // Draw the residual roll unconditionally so a seeded run stays reproducible
        let residual_break = rng.random_bool(self.commercial_break_probability);
        let is_commercial_break = is_break_event(event) || residual_break;

        let score = if is_scoring_event(event) {
            Score {
                home: previous.score.home + rng.random_range(0..=MAX_SCORING_PLAY_POINTS),
                ..previous.score
            }
        } else {
            previous.score
        };

        GameState {
            sport: previous.sport,
            current_period: previous.current_period.clone(),
            time_remaining: random_clock_label(rng),
            recent_event: event.to_owned(),
            is_commercial_break,
            score,
            game_phase: if is_commercial_break {
                GamePhase::Break
            } else {
                GamePhase::Live
            },
        }
    }
}

/// Fresh `m:ss` label; the clock is not counted down
fn random_clock_label<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}:{:02}",
        rng.random_range(0..15u32),
        rng.random_range(0..60u32)
    )
}
