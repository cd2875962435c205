//! Status poller: fetch `/api/status` immediately and then on a fixed
//! interval.
//!
//! Each fetch is its own task, so a slow response never delays the next
//! tick and responses may overlap.  Every fetch takes a sequence number
//! from the shared `Sequencer` before it is sent; the engine uses it when
//! the sequenced ordering policy is configured.

use std::time::Duration;

use farm_proto::client::DeviceClient;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace};

use crate::engine::{Sequencer, SyncEvent};

pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Clone)]
pub struct Poller {
    client: DeviceClient,
    sequencer: Sequencer,
    tx: mpsc::Sender<SyncEvent>,
    period: Duration,
}

impl Poller {
    pub fn new(client: DeviceClient, sequencer: Sequencer, tx: mpsc::Sender<SyncEvent>) -> Self {
        Self {
            client,
            sequencer,
            tx,
            period: POLL_INTERVAL,
        }
    }

    #[cfg(test)]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Run until the event receiver is dropped.  The first tick fires
    /// immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if self.tx.is_closed() {
                    debug!("poller stopping: receiver gone");
                    break;
                }
                self.refresh_now();
            }
        })
    }

    /// Fire one fetch right now.  Returns its sequence number.
    pub fn refresh_now(&self) -> u64 {
        let seq = self.sequencer.next();
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            trace!(seq, "poll");
            let result = client.fetch_status().await;
            let _ = tx.send(SyncEvent::PollCompleted { seq, result }).await;
        });
        seq
    }
}
