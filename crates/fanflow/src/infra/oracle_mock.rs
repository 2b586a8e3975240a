use async_trait::async_trait;
use fanflow_core::{GameState, PitStopPrediction, Recommendation};
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use super::oracle::{Error, PitStopOracle};

/// In-process oracle for local runs without a credential.
///
/// Breaks are always a good time to go; scoring plays mean the window is
/// closing; everything else says wait.
pub struct MockOracle {
    latency: Duration,
    calls: AtomicUsize,
}

impl MockOracle {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new(Duration::from_millis(750))
    }
}

#[async_trait]
impl PitStopOracle for MockOracle {
    async fn predict(&self, game: &GameState) -> Result<PitStopPrediction, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;

        let prediction = if game.is_commercial_break {
            PitStopPrediction {
                recommendation: Recommendation::GoNow,
                reasoning: format!("{} - lines are moving, go go go!", game.recent_event),
                estimated_window: String::from("2:30 minutes"),
            }
        } else if game.recent_event.contains('!') {
            PitStopPrediction {
                recommendation: Recommendation::Urgent,
                reasoning: String::from("Celebration lull, but play restarts soon!"),
                estimated_window: String::from("0:45 minutes"),
            }
        } else {
            PitStopPrediction {
                recommendation: Recommendation::Wait,
                reasoning: format!("{} - stay put, action is live.", game.recent_event),
                estimated_window: String::from("Next break"),
            }
        };

        Ok(prediction)
    }
}
