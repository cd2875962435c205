//! Command dispatcher: relay toggles and rename requests.
//!
//! Requests run on their own tasks and report a `CommandOutcome`; nothing
//! here touches view state.

use farm_proto::client::DeviceClient;
use farm_proto::protocol::{Device, RenameRequest};
use tokio::sync::mpsc;
use tracing::info;

use crate::engine::{CommandOutcome, Sequencer, SyncEvent};

#[derive(Clone)]
pub struct CommandDispatcher {
    client: DeviceClient,
    sequencer: Sequencer,
    tx: mpsc::Sender<SyncEvent>,
}

impl CommandDispatcher {
    pub fn new(client: DeviceClient, sequencer: Sequencer, tx: mpsc::Sender<SyncEvent>) -> Self {
        Self {
            client,
            sequencer,
            tx,
        }
    }

    /// Ask the controller to set `device` to `desired`.  Returns the
    /// sequence number the reply will carry.
    pub fn toggle(&self, device: Device, desired: bool) -> u64 {
        let seq = self.sequencer.next();
        info!(seq, %device, desired, "toggle");
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.toggle(device, desired).await;
            let outcome = CommandOutcome::Toggle {
                seq,
                device,
                desired,
                result,
            };
            let _ = tx.send(SyncEvent::CommandCompleted(outcome)).await;
        });
        seq
    }

    /// Submit both names.  Whitespace is trimmed; empty names are sent
    /// as-is.
    pub fn rename(&self, motor_name: &str, light_name: &str) {
        let request = RenameRequest::new(motor_name, light_name);
        info!(motor = %request.motor_name, light = %request.light_name, "rename");
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.rename(&request).await;
            let outcome = CommandOutcome::Rename { result };
            let _ = tx.send(SyncEvent::CommandCompleted(outcome)).await;
        });
    }
}
