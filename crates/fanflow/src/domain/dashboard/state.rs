//! Application state and the reducer that moves it forward.
//!
//! Every change to the dashboard arrives as a [`Message`]. Applying a message is
//! synchronous and never performs I/O; work that has to happen later (oracle
//! calls, clearing the acknowledgment banner) is handed back as [`Effect`]s.

use fanflow_core::{GameState, PitStopPrediction, SportType, WaitMinutes, REPORT_REWARD_POINTS};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::{
    catalog::{seed_ledger, seed_vendors},
    prediction::PredictionTrigger,
    reports::{LineReportStore, ReportReceipt},
    Error,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Map,
    Flow,
    Earn,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Map, Tab::Flow, Tab::Earn];

    pub fn path(&self) -> &'static str {
        match self {
            Tab::Map => "/map",
            Tab::Flow => "/flow",
            Tab::Earn => "/earn",
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Tab::Map => "Stadium View",
            Tab::Flow => "Game Intelligence",
            Tab::Earn => "Fan Rewards",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tab::Map => "map",
            Tab::Flow => "flow",
            Tab::Earn => "earn",
        };
        f.write_str(label)
    }
}

impl FromStr for Tab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.to_string() == s)
            .ok_or_else(|| Error::BadRequest(format!("unknown tab: {}", s)))
    }
}

/// Transient acknowledgment shown after a report is accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub points: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// The feed came online; look at the current state once
    FeedConnected,
    FeedTick(GameState),
    SportSelected(SportType),
    TabSelected(Tab),
    SyncToggled,
    SyncSet(bool),
    ReportSubmitted {
        vendor_id: String,
        minutes: WaitMinutes,
        at: OffsetDateTime,
    },
    PredictionResolved {
        epoch: u64,
        prediction: PitStopPrediction,
    },
    NotificationExpired(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestPrediction { epoch: u64, snapshot: GameState },
    ScheduleDismiss { id: Uuid, after: Duration },
}

/// What applying a single message produced
#[derive(Debug, Default)]
pub struct Transition {
    pub effects: Vec<Effect>,
    pub report: Option<ReportReceipt>,
}

impl Transition {
    fn effect(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            report: None,
        }
    }

    fn maybe(effect: Option<Effect>) -> Self {
        Self {
            effects: effect.into_iter().collect(),
            report: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub sport: SportType,
    pub tab: Tab,
    pub game: GameState,
    pub prediction: Option<PitStopPrediction>,
    pub auto_sync: bool,
    pub notification: Option<Notification>,
    reports: LineReportStore,
    trigger: PredictionTrigger,
    /// Bumped on every sport change so late oracle answers for the old game are dropped
    epoch: u64,
    acknowledgment: Duration,
}

impl DashboardState {
    pub fn new(
        sport: SportType,
        auto_sync: bool,
        reports: LineReportStore,
        trigger: PredictionTrigger,
        acknowledgment: Duration,
    ) -> Self {
        Self {
            sport,
            tab: Tab::default(),
            game: GameState::kickoff(sport),
            prediction: None,
            auto_sync,
            notification: None,
            reports,
            trigger,
            epoch: 0,
            acknowledgment,
        }
    }

    /// Fresh session seeded with the stadium's mock vendors and the demo fan profile
    pub fn seeded(
        sport: SportType,
        auto_sync: bool,
        trigger: PredictionTrigger,
        acknowledgment: Duration,
        now: OffsetDateTime,
    ) -> Self {
        Self::new(
            sport,
            auto_sync,
            LineReportStore::new(seed_vendors(now), seed_ledger(now)),
            trigger,
            acknowledgment,
        )
    }

    pub fn apply<R: Rng + ?Sized>(&mut self, message: Message, rng: &mut R) -> Transition {
        match message {
            Message::FeedConnected => Transition::maybe(self.observe_game(rng)),
            Message::FeedTick(next) => {
                if !self.auto_sync || next.sport != self.sport {
                    debug!("dropping feed tick for {} (sync: {})", next.sport, self.auto_sync);
                    return Transition::default();
                }
                self.game = next;
                Transition::maybe(self.observe_game(rng))
            }
            Message::SportSelected(sport) => {
                if sport == self.sport {
                    return Transition::default();
                }
                info!("switching live feed from {} to {}", self.sport, sport);
                self.sport = sport;
                self.game = GameState::kickoff(sport);
                self.prediction = None;
                self.epoch += 1;
                Transition::maybe(self.observe_game(rng))
            }
            Message::TabSelected(tab) => {
                self.tab = tab;
                Transition::default()
            }
            Message::SyncToggled => {
                self.auto_sync = !self.auto_sync;
                info!("live feed sync {}", if self.auto_sync { "resumed" } else { "paused" });
                Transition::default()
            }
            Message::SyncSet(enabled) => {
                self.auto_sync = enabled;
                Transition::default()
            }
            Message::ReportSubmitted {
                vendor_id,
                minutes,
                at,
            } => {
                let Some(receipt) = self.reports.submit(&vendor_id, minutes, at) else {
                    return Transition::default();
                };
                let notification = Notification {
                    id: Uuid::now_v7(),
                    message: format!("+{} Points Awarded!", REPORT_REWARD_POINTS),
                    points: receipt.points,
                    created_at: at,
                };
                let dismiss = Effect::ScheduleDismiss {
                    id: notification.id,
                    after: self.acknowledgment,
                };
                self.notification = Some(notification);
                Transition {
                    effects: vec![dismiss],
                    report: Some(receipt),
                }
            }
            Message::PredictionResolved { epoch, prediction } => {
                let analyzed = self.trigger.resolve();
                if epoch != self.epoch {
                    debug!(
                        "discarding prediction for {:?} from a previous game",
                        analyzed
                    );
                    return Transition::default();
                }
                self.prediction = Some(prediction);
                Transition::default()
            }
            Message::NotificationExpired(id) => {
                if self.notification.as_ref().is_some_and(|n| n.id == id) {
                    self.notification = None;
                }
                Transition::default()
            }
        }
    }

    fn observe_game<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Effect> {
        self.trigger
            .observe(&self.game, rng)
            .map(|snapshot| Effect::RequestPrediction {
                epoch: self.epoch,
                snapshot,
            })
    }

    pub fn reports(&self) -> &LineReportStore {
        &self.reports
    }

    pub fn trigger(&self) -> &PredictionTrigger {
        &self.trigger
    }

    pub fn is_analyzing(&self) -> bool {
        self.trigger.is_analyzing()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanflow_core::{GamePhase, Recommendation, Score};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn seeded(analysis_probability: f64) -> DashboardState {
        DashboardState::seeded(
            SportType::Football,
            true,
            PredictionTrigger::new(analysis_probability),
            Duration::from_secs(3),
            OffsetDateTime::now_utc(),
        )
    }

    fn break_state(sport: SportType, event: &str) -> GameState {
        GameState {
            recent_event: event.to_string(),
            is_commercial_break: true,
            game_phase: GamePhase::Break,
            score: Score { home: 7, away: 3 },
            ..GameState::kickoff(sport)
        }
    }

    fn go_now() -> PitStopPrediction {
        PitStopPrediction {
            recommendation: Recommendation::GoNow,
            reasoning: String::from("TV timeout, lines are short"),
            estimated_window: String::from("2:30 minutes"),
        }
    }

    #[test]
    fn test_break_tick_requests_prediction() {
        let mut state = seeded(0.0);
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let transition = state.apply(
            Message::FeedTick(break_state(SportType::Football, "TV Timeout")),
            &mut rng,
        );

        assert_eq!(transition.effects.len(), 1);
        assert!(matches!(
            &transition.effects[0],
            Effect::RequestPrediction { epoch: 0, snapshot } if snapshot.recent_event == "TV Timeout"
        ));
        assert!(state.is_analyzing());
    }

    #[test]
    fn test_prediction_is_stored_on_resolution() {
        let mut state = seeded(0.0);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        state.apply(
            Message::FeedTick(break_state(SportType::Football, "TV Timeout")),
            &mut rng,
        );

        state.apply(
            Message::PredictionResolved {
                epoch: 0,
                prediction: go_now(),
            },
            &mut rng,
        );

        assert_eq!(state.prediction, Some(go_now()));
        assert!(!state.is_analyzing());
        assert_eq!(state.trigger().last_analyzed(), Some("TV Timeout"));
    }

    #[test]
    fn test_switching_sport_resets_game_and_prediction() {
        let mut state = seeded(0.0);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        state.apply(
            Message::FeedTick(break_state(SportType::Football, "TV Timeout")),
            &mut rng,
        );
        state.apply(
            Message::PredictionResolved {
                epoch: 0,
                prediction: go_now(),
            },
            &mut rng,
        );
        assert_eq!(state.game.score, Score { home: 7, away: 3 });

        state.apply(Message::SportSelected(SportType::Soccer), &mut rng);

        assert_eq!(state.sport, SportType::Soccer);
        assert_eq!(state.game.score, Score { home: 0, away: 0 });
        assert_eq!(state.game.current_period, "1st Quarter");
        assert!(state.prediction.is_none());
        assert_eq!(state.epoch(), 1);
    }

    #[test]
    fn test_stale_prediction_is_dropped_but_slot_freed() {
        let mut state = seeded(0.0);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        state.apply(
            Message::FeedTick(break_state(SportType::Football, "TV Timeout")),
            &mut rng,
        );

        // The in-flight call outlives the sport change
        let transition = state.apply(Message::SportSelected(SportType::Baseball), &mut rng);
        assert!(transition.effects.is_empty());
        assert_eq!(state.trigger().outstanding(), 1);

        state.apply(
            Message::PredictionResolved {
                epoch: 0,
                prediction: go_now(),
            },
            &mut rng,
        );
        assert!(state.prediction.is_none());
        assert_eq!(state.trigger().outstanding(), 0);

        let transition = state.apply(
            Message::FeedTick(break_state(SportType::Baseball, "Between Innings")),
            &mut rng,
        );
        assert!(matches!(
            &transition.effects[0],
            Effect::RequestPrediction { epoch: 1, .. }
        ));
    }

    #[test]
    fn test_paused_feed_drops_ticks() {
        let mut state = seeded(1.0);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        state.apply(Message::SyncToggled, &mut rng);
        assert!(!state.auto_sync);

        let transition = state.apply(
            Message::FeedTick(break_state(SportType::Football, "TV Timeout")),
            &mut rng,
        );
        assert!(transition.effects.is_empty());
        assert_eq!(state.game.recent_event, "Kickoff complete");
    }

    #[test]
    fn test_tick_for_previous_sport_is_dropped() {
        let mut state = seeded(1.0);
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        state.apply(
            Message::FeedTick(break_state(SportType::Soccer, "Injury Delay")),
            &mut rng,
        );
        assert_eq!(state.game.sport, SportType::Football);
    }

    #[test]
    fn test_report_raises_notification_that_expires() {
        let mut state = seeded(0.0);
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let transition = state.apply(
            Message::ReportSubmitted {
                vendor_id: String::from("2"),
                minutes: WaitMinutes::new(10).unwrap(),
                at: OffsetDateTime::now_utc(),
            },
            &mut rng,
        );

        let receipt = transition.report.unwrap();
        assert_eq!(receipt.vendor.reports_count, 23);
        assert_eq!(state.reports().ledger().points, 1300);

        let notification = state.notification.clone().unwrap();
        assert_eq!(notification.message, "+50 Points Awarded!");
        assert_eq!(
            transition.effects,
            vec![Effect::ScheduleDismiss {
                id: notification.id,
                after: Duration::from_secs(3),
            }]
        );

        state.apply(Message::NotificationExpired(Uuid::now_v7()), &mut rng);
        assert!(state.notification.is_some());
        state.apply(Message::NotificationExpired(notification.id), &mut rng);
        assert!(state.notification.is_none());
    }

    #[test]
    fn test_unknown_vendor_report_is_silent() {
        let mut state = seeded(0.0);
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let transition = state.apply(
            Message::ReportSubmitted {
                vendor_id: String::from("99"),
                minutes: WaitMinutes::new(10).unwrap(),
                at: OffsetDateTime::now_utc(),
            },
            &mut rng,
        );

        assert!(transition.report.is_none());
        assert!(transition.effects.is_empty());
        assert!(state.notification.is_none());
        assert_eq!(state.reports().ledger().points, 1250);
    }

    #[test]
    fn test_tab_parsing() {
        assert_eq!("earn".parse::<Tab>().unwrap(), Tab::Earn);
        assert!("settings".parse::<Tab>().is_err());
    }
}
