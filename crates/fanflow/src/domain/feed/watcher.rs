use log::info;
use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::domain::{Dashboard, Message};

/// Background task ticking the simulated game feed
pub struct FeedWatcher {
    dashboard: Arc<Dashboard>,
    tick_interval: Duration,
    cancel_token: CancellationToken,
}

impl FeedWatcher {
    pub fn new(
        dashboard: Arc<Dashboard>,
        cancel_token: CancellationToken,
        tick_interval: Duration,
    ) -> Self {
        Self {
            dashboard,
            tick_interval,
            cancel_token,
        }
    }

    pub async fn watch(&self) -> Result<(), anyhow::Error> {
        info!(
            "Starting live feed watcher, ticking every {:?}",
            self.tick_interval
        );
        self.dashboard.dispatch(Message::FeedConnected);

        loop {
            tokio::select! {
                _ = sleep(self.tick_interval) => {}
                _ = self.cancel_token.cancelled() => {
                    info!("Live feed watcher cancelled during sleep");
                    break;
                }
            }

            self.dashboard.advance_feed();
        }

        Ok(())
    }
}
