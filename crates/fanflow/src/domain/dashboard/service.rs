use fanflow_core::{GameState, PitStopPrediction, SportType, WaitMinutes};
use log::{debug, info};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use time::OffsetDateTime;
use tokio::{select, time::sleep};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use super::state::{DashboardState, Effect, Message, Notification, Tab, Transition};
use crate::{
    domain::{feed::GameFeedSimulator, prediction::TriggerState, reports::LineReportStore},
    infra::oracle::{predict_or_fallback, PitStopOracle},
};

/// Read-only copy of everything a view needs, taken under a single lock
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub sport: SportType,
    pub tab: Tab,
    pub auto_sync: bool,
    pub game: GameState,
    pub prediction: Option<PitStopPrediction>,
    pub is_analyzing: bool,
    pub trigger: TriggerState,
    pub notification: Option<Notification>,
    #[serde(flatten)]
    pub reports: LineReportStore,
}

impl From<&DashboardState> for DashboardSnapshot {
    fn from(state: &DashboardState) -> Self {
        Self {
            sport: state.sport,
            tab: state.tab,
            auto_sync: state.auto_sync,
            game: state.game.clone(),
            prediction: state.prediction.clone(),
            is_analyzing: state.is_analyzing(),
            trigger: state.trigger().state().clone(),
            notification: state.notification.clone(),
            reports: state.reports().clone(),
        }
    }
}

struct Engine {
    state: DashboardState,
    rng: ChaCha20Rng,
}

/// Owns the dashboard state and runs the work its transitions ask for.
///
/// Every message is applied while holding one lock, so readers never see a
/// half-applied transition. Effects run afterwards on the task tracker.
pub struct Dashboard {
    engine: Mutex<Engine>,
    simulator: GameFeedSimulator,
    oracle: Arc<dyn PitStopOracle>,
    oracle_timeout: Duration,
    tasks: TaskTracker,
    cancel_token: CancellationToken,
}

impl Dashboard {
    pub fn new(
        state: DashboardState,
        rng: ChaCha20Rng,
        simulator: GameFeedSimulator,
        oracle: Arc<dyn PitStopOracle>,
        oracle_timeout: Duration,
        tasks: TaskTracker,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            engine: Mutex::new(Engine { state, rng }),
            simulator,
            oracle,
            oracle_timeout,
            tasks,
            cancel_token,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Engine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// False once shutdown has started and background work is being drained
    pub fn is_running(&self) -> bool {
        !self.cancel_token.is_cancelled() && !self.tasks.is_closed()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::from(&self.lock().state)
    }

    pub fn dispatch(self: &Arc<Self>, message: Message) -> Transition {
        let transition = {
            let mut engine = self.lock();
            let Engine { state, rng } = &mut *engine;
            state.apply(message, rng)
        };
        self.run_effects(&transition.effects);
        transition
    }

    /// Draws the next simulated game state and feeds it back in.
    ///
    /// Does nothing while sync is paused so the simulator RNG only advances on live ticks.
    pub fn advance_feed(self: &Arc<Self>) -> Transition {
        let transition = {
            let mut engine = self.lock();
            let Engine { state, rng } = &mut *engine;
            if !state.auto_sync {
                return Transition::default();
            }
            let next = self.simulator.next_state(&state.game, rng);
            debug!("feed tick: {} ({})", next.recent_event, next.game_phase);
            state.apply(Message::FeedTick(next), rng)
        };
        self.run_effects(&transition.effects);
        transition
    }

    pub fn select_sport(self: &Arc<Self>, sport: SportType) -> Transition {
        self.dispatch(Message::SportSelected(sport))
    }

    pub fn select_tab(self: &Arc<Self>, tab: Tab) -> Transition {
        self.dispatch(Message::TabSelected(tab))
    }

    pub fn toggle_sync(self: &Arc<Self>) -> bool {
        self.dispatch(Message::SyncToggled);
        self.lock().state.auto_sync
    }

    pub fn set_sync(self: &Arc<Self>, enabled: bool) {
        self.dispatch(Message::SyncSet(enabled));
    }

    pub fn submit_report(self: &Arc<Self>, vendor_id: &str, minutes: WaitMinutes) -> Transition {
        self.dispatch(Message::ReportSubmitted {
            vendor_id: vendor_id.to_owned(),
            minutes,
            at: OffsetDateTime::now_utc(),
        })
    }

    fn run_effects(self: &Arc<Self>, effects: &[Effect]) {
        for effect in effects {
            match effect.clone() {
                Effect::RequestPrediction { epoch, snapshot } => {
                    info!("analyzing '{}' for a pit stop window", snapshot.recent_event);
                    let dashboard = Arc::clone(self);
                    self.tasks.spawn(async move {
                        let prediction = select! {
                            prediction = predict_or_fallback(
                                dashboard.oracle.as_ref(),
                                &snapshot,
                                dashboard.oracle_timeout,
                            ) => prediction,
                            _ = dashboard.cancel_token.cancelled() => {
                                debug!("prediction for '{}' cancelled by shutdown", snapshot.recent_event);
                                return;
                            }
                        };
                        dashboard.dispatch(Message::PredictionResolved { epoch, prediction });
                    });
                }
                Effect::ScheduleDismiss { id, after } => {
                    let dashboard = Arc::clone(self);
                    self.tasks.spawn(async move {
                        select! {
                            _ = sleep(after) => {
                                dashboard.dispatch(Message::NotificationExpired(id));
                            }
                            _ = dashboard.cancel_token.cancelled() => {}
                        }
                    });
                }
            }
        }
    }
}
