//! Decides when a simulated game event is worth a trip to the oracle.
//!
//! The trigger is a two-state machine guarding a single in-flight slot:
//! while one analysis is outstanding every other observation is dropped,
//! and an event is never analyzed twice in a row.

use fanflow_core::GameState;
use rand::Rng;
use serde::Serialize;

/// Chance an ordinary (non-break) event is analyzed anyway, keeping the feed lively
pub const ANALYSIS_RESIDUAL_PROBABILITY: f64 = 0.40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TriggerState {
    Idle,
    Analyzing { event: String },
}

#[derive(Debug, Clone)]
pub struct PredictionTrigger {
    analysis_probability: f64,
    state: TriggerState,
    last_analyzed: Option<String>,
}

impl Default for PredictionTrigger {
    fn default() -> Self {
        Self::new(ANALYSIS_RESIDUAL_PROBABILITY)
    }
}

impl PredictionTrigger {
    pub fn new(analysis_probability: f64) -> Self {
        Self {
            analysis_probability,
            state: TriggerState::Idle,
            last_analyzed: None,
        }
    }

    /// Looks at a new game state and claims the in-flight slot when it should be analyzed.
    ///
    /// Returns the snapshot to send to the oracle, or `None` when the state is ignored.
    pub fn observe<R: Rng + ?Sized>(&mut self, game: &GameState, rng: &mut R) -> Option<GameState> {
        if self.is_analyzing() {
            return None;
        }
        if self.last_analyzed.as_deref() == Some(game.recent_event.as_str()) {
            return None;
        }

        let should_analyze =
            game.is_commercial_break || rng.random_bool(self.analysis_probability);
        if !should_analyze {
            return None;
        }

        self.state = TriggerState::Analyzing {
            event: game.recent_event.clone(),
        };
        Some(game.clone())
    }

    /// Frees the in-flight slot and remembers the analyzed event.
    ///
    /// Returns the event that was being analyzed, `None` if nothing was in flight.
    pub fn resolve(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.state, TriggerState::Idle) {
            TriggerState::Analyzing { event } => {
                self.last_analyzed = Some(event.clone());
                Some(event)
            }
            TriggerState::Idle => None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.state, TriggerState::Analyzing { .. })
    }

    /// Number of oracle calls currently outstanding, never more than one
    pub fn outstanding(&self) -> usize {
        usize::from(self.is_analyzing())
    }

    pub fn state(&self) -> &TriggerState {
        &self.state
    }

    pub fn last_analyzed(&self) -> Option<&str> {
        self.last_analyzed.as_deref()
    }
}
