//! SyncEngine: the single owner of dashboard state.
//!
//! Poller, dispatcher and toast timer run as independent tasks and report
//! back as `SyncEvent`s.  The app loop feeds each event to `apply`, which
//! is the only place `RenderState`, the loading gate, the toast slot and
//! relay intents change.  Side effects the engine cannot perform itself
//! (arming a toast timer, triggering an immediate poll) come back as
//! `Effect`s for the caller to run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use farm_proto::client::ClientError;
use farm_proto::config::ResponseOrdering;
use farm_proto::protocol::{Device, RelayState, StatusSnapshot};
use tracing::{debug, info, warn};

use crate::intent::IntentState;
use crate::loading::LoadingGate;
use crate::mapper;
use crate::notifier::{Notifier, Severity, ToastState, ToastTicket};
use crate::render_state::RenderState;

pub const NAMES_SAVED: &str = "Names saved";
pub const SAVE_FAILED: &str = "Save failed";

/// Issue order for outbound requests, shared by poller and dispatcher.
#[derive(Debug, Clone, Default)]
pub struct Sequencer(Arc<AtomicU64>);

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strictly increasing, starting at 1.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[derive(Debug)]
pub enum CommandOutcome {
    Toggle {
        seq: u64,
        device: Device,
        desired: bool,
        result: Result<RelayState, ClientError>,
    },
    Rename {
        result: Result<(), ClientError>,
    },
}

#[derive(Debug)]
pub enum SyncEvent {
    PollCompleted {
        seq: u64,
        result: Result<StatusSnapshot, ClientError>,
    },
    CommandCompleted(CommandOutcome),
    ToastExpired(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScheduleToast(ToastTicket),
    RefreshNow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resource {
    Telemetry,
    Relay,
}

/// Decides whether a completed response may still be applied.
#[derive(Debug)]
struct OrderingGuard {
    ordering: ResponseOrdering,
    telemetry_seq: u64,
    relay_seq: u64,
}

impl OrderingGuard {
    fn new(ordering: ResponseOrdering) -> Self {
        Self {
            ordering,
            telemetry_seq: 0,
            relay_seq: 0,
        }
    }

    fn admit(&mut self, resource: Resource, seq: u64) -> bool {
        if self.ordering == ResponseOrdering::Arrival {
            return true;
        }
        let applied = match resource {
            Resource::Telemetry => &mut self.telemetry_seq,
            Resource::Relay => &mut self.relay_seq,
        };
        if seq <= *applied {
            return false;
        }
        *applied = seq;
        true
    }
}

pub struct SyncEngine {
    state: RenderState,
    gate: LoadingGate,
    notifier: Notifier,
    motor: IntentState<bool>,
    light: IntentState<bool>,
    guard: OrderingGuard,
    toast_toggle_failures: bool,
}

impl SyncEngine {
    pub fn new(ordering: ResponseOrdering, toast_toggle_failures: bool) -> Self {
        Self {
            state: RenderState::initial(),
            gate: LoadingGate::new(),
            notifier: Notifier::new(),
            motor: IntentState::new(false),
            light: IntentState::new(false),
            guard: OrderingGuard::new(ordering),
            toast_toggle_failures,
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn toast(&self) -> Option<&ToastState> {
        self.notifier.current()
    }

    /// Record a toggle that was just dispatched.  Displayed on/off stays put.
    pub fn toggle_requested(&mut self, device: Device, desired: bool) {
        self.intent_mut(device).set_intent(desired);
        self.refresh_hints();
    }

    /// Back to the skeleton until the next poll completes.
    pub fn reset_loading(&mut self) {
        self.gate.reset();
        self.state = self.state.with_loading(true);
    }

    pub fn apply(&mut self, event: SyncEvent) -> Vec<Effect> {
        match event {
            SyncEvent::PollCompleted { seq, result } => {
                self.apply_poll(seq, result);
                Vec::new()
            }
            SyncEvent::CommandCompleted(outcome) => self.apply_command(outcome),
            SyncEvent::ToastExpired(generation) => {
                if self.notifier.expire(generation) {
                    debug!(generation, "toast hidden");
                }
                Vec::new()
            }
        }
    }

    /// Advance intent timeouts and the pending pulse.  Returns `true` when
    /// a redraw is needed.
    pub fn tick(&mut self) -> bool {
        self.motor.tick();
        self.light.tick();
        let before = (self.state.motor.hint, self.state.light.hint);
        self.refresh_hints();
        before != (self.state.motor.hint, self.state.light.hint)
    }

    fn apply_poll(&mut self, seq: u64, result: Result<StatusSnapshot, ClientError>) {
        if !self.guard.admit(Resource::Telemetry, seq) {
            debug!(seq, "dropping stale poll response");
            return;
        }
        if self.gate.mark_loaded() {
            info!(seq, "first poll completed");
        }

        match result {
            Ok(snapshot) => {
                let relay = snapshot
                    .relay
                    .filter(|_| self.guard.admit(Resource::Relay, seq));
                if let Some(relay) = relay {
                    self.motor.on_observed(relay.motor);
                    self.light.on_observed(relay.light);
                }
                let patch = mapper::map(&snapshot);
                self.state = self.state.with_poll(patch, relay);
            }
            Err(e) => {
                // Next tick retries; keep the last values on screen.
                debug!(seq, kind = ?e.kind(), "poll failed: {e}");
                self.state = self.state.with_poll_failure();
            }
        }
        self.refresh_hints();
    }

    fn apply_command(&mut self, outcome: CommandOutcome) -> Vec<Effect> {
        match outcome {
            CommandOutcome::Toggle {
                seq,
                device,
                desired,
                result: Ok(relay),
            } => {
                if relay.get(device) != desired {
                    info!(
                        %device,
                        desired,
                        actual = relay.get(device),
                        "controller overrode toggle"
                    );
                }
                if self.guard.admit(Resource::Relay, seq) {
                    self.motor.resolve(relay.motor);
                    self.light.resolve(relay.light);
                    self.state = self.state.with_relay(relay);
                } else {
                    debug!(seq, "toggle reply older than applied relay state");
                    self.intent_mut(device).cancel();
                }
                self.refresh_hints();
                Vec::new()
            }
            CommandOutcome::Toggle {
                device,
                desired,
                result: Err(e),
                ..
            } => {
                warn!(%device, desired, kind = ?e.kind(), "toggle failed: {e}");
                self.intent_mut(device).cancel();
                self.refresh_hints();
                if self.toast_toggle_failures {
                    let ticket = self
                        .notifier
                        .show(format!("Toggle {} failed", device), Severity::Error);
                    vec![Effect::ScheduleToast(ticket)]
                } else {
                    Vec::new()
                }
            }
            CommandOutcome::Rename { result: Ok(()) } => {
                info!("relay names saved");
                let ticket = self.notifier.show(NAMES_SAVED, Severity::Success);
                vec![Effect::ScheduleToast(ticket), Effect::RefreshNow]
            }
            CommandOutcome::Rename { result: Err(e) } => {
                warn!(kind = ?e.kind(), "rename failed: {e}");
                let ticket = self.notifier.show(SAVE_FAILED, Severity::Error);
                vec![Effect::ScheduleToast(ticket)]
            }
        }
    }

    fn intent_mut(&mut self, device: Device) -> &mut IntentState<bool> {
        match device {
            Device::Motor => &mut self.motor,
            Device::Light => &mut self.light,
        }
    }

    fn refresh_hints(&mut self) {
        let motor = self.motor.render_state();
        let light = self.light.render_state();
        if (motor, light) != (self.state.motor.hint, self.state.light.hint) {
            self.state = self.state.with_hints(motor, light);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_proto::protocol::VirtualSensors;

    fn engine() -> SyncEngine {
        SyncEngine::new(ResponseOrdering::Arrival, false)
    }

    fn rejected(msg: &str) -> ClientError {
        ClientError::Rejected(msg.to_string())
    }

    fn snapshot(water: f64, relay: RelayState) -> StatusSnapshot {
        StatusSnapshot {
            connected: true,
            relay: Some(relay),
            sensors: Some(VirtualSensors {
                water_liters_24h: Some(water),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn poll(seq: u64, result: Result<StatusSnapshot, ClientError>) -> SyncEvent {
        SyncEvent::PollCompleted { seq, result }
    }

    #[test]
    fn test_sequencer_strictly_increasing() {
        let s = Sequencer::new();
        let t = s.clone();
        assert_eq!(s.next(), 1);
        assert_eq!(t.next(), 2);
        assert_eq!(s.next(), 3);
    }

    #[test]
    fn test_first_failure_still_ends_loading() {
        let mut e = engine();
        assert!(e.state().loading);
        e.apply(poll(1, Err(rejected("down"))));
        assert!(!e.state().loading);
        assert_eq!(e.state().water_24h.text(), "—");
    }

    #[test]
    fn test_failure_keeps_last_good_values() {
        let mut e = engine();
        e.apply(poll(1, Ok(snapshot(12.3, RelayState::default()))));
        assert_eq!(e.state().water_24h.text(), "12.3 L");
        assert!(e.state().last_updated_at.is_some());
        e.apply(poll(2, Err(rejected("down"))));
        assert_eq!(e.state().water_24h.text(), "12.3 L");
        assert_eq!(e.state().connection.label(), "Waiting for controller");
    }

    #[test]
    fn test_poll_without_relay_keeps_relay() {
        let mut e = engine();
        e.apply(poll(
            1,
            Ok(snapshot(
                1.0,
                RelayState {
                    motor: true,
                    light: false,
                },
            )),
        ));
        e.apply(poll(
            2,
            Ok(StatusSnapshot {
                connected: true,
                ..Default::default()
            }),
        ));
        assert!(e.state().motor.on);
        assert_eq!(e.state().water_24h.text(), "—");
    }

    #[test]
    fn test_toggle_applies_controller_reply() {
        let mut e = engine();
        e.toggle_requested(Device::Motor, true);
        assert!(!e.state().motor.on);
        assert!(e.state().motor.hint.is_pending());

        let effects = e.apply(SyncEvent::CommandCompleted(CommandOutcome::Toggle {
            seq: 1,
            device: Device::Motor,
            desired: true,
            result: Ok(RelayState {
                motor: false,
                light: true,
            }),
        }));
        assert!(effects.is_empty());
        assert!(!e.state().motor.on);
        assert!(e.state().light.on);
        assert!(!e.state().motor.hint.is_pending());
    }

    #[test]
    fn test_toggle_failure_is_silent_by_default() {
        let mut e = engine();
        e.toggle_requested(Device::Light, true);
        let before = e.state().light.on;
        let effects = e.apply(SyncEvent::CommandCompleted(CommandOutcome::Toggle {
            seq: 1,
            device: Device::Light,
            desired: true,
            result: Err(rejected("toggle light refused")),
        }));
        assert!(effects.is_empty());
        assert!(e.toast().is_none());
        assert_eq!(e.state().light.on, before);
        assert!(!e.state().light.hint.is_pending());
    }

    #[test]
    fn test_toggle_failure_toast_when_enabled() {
        let mut e = SyncEngine::new(ResponseOrdering::Arrival, true);
        let effects = e.apply(SyncEvent::CommandCompleted(CommandOutcome::Toggle {
            seq: 1,
            device: Device::Motor,
            desired: true,
            result: Err(rejected("no")),
        }));
        assert_eq!(effects.len(), 1);
        assert_eq!(e.toast().unwrap().message, "Toggle motor failed");
        assert_eq!(e.toast().unwrap().severity, Severity::Error);
    }

    #[test]
    fn test_rename_success_toasts_and_refreshes() {
        let mut e = engine();
        let effects = e.apply(SyncEvent::CommandCompleted(CommandOutcome::Rename {
            result: Ok(()),
        }));
        assert!(matches!(effects[0], Effect::ScheduleToast(_)));
        assert_eq!(effects[1], Effect::RefreshNow);
        assert_eq!(e.toast().unwrap().message, NAMES_SAVED);
    }

    #[test]
    fn test_rename_failure_toasts_without_refresh() {
        let mut e = engine();
        let effects = e.apply(SyncEvent::CommandCompleted(CommandOutcome::Rename {
            result: Err(rejected("rename refused")),
        }));
        assert_eq!(effects.len(), 1);
        assert_eq!(e.toast().unwrap().message, SAVE_FAILED);
    }

    #[test]
    fn test_toast_expiry_only_for_current_generation() {
        let mut e = engine();
        let first = match e.apply(SyncEvent::CommandCompleted(CommandOutcome::Rename {
            result: Err(rejected("x")),
        }))[0]
        {
            Effect::ScheduleToast(t) => t,
            other => panic!("unexpected {other:?}"),
        };
        e.apply(SyncEvent::CommandCompleted(CommandOutcome::Rename {
            result: Ok(()),
        }));
        e.apply(SyncEvent::ToastExpired(first.generation));
        assert_eq!(e.toast().unwrap().message, NAMES_SAVED);
    }

    #[test]
    fn test_arrival_ordering_applies_latest_arrival() {
        let mut e = engine();
        e.apply(poll(2, Ok(snapshot(2.0, RelayState::default()))));
        e.apply(poll(1, Ok(snapshot(1.0, RelayState::default()))));
        assert_eq!(e.state().water_24h.text(), "1 L");
    }

    #[test]
    fn test_arrival_ordering_poll_overwrites_later_toggle_reply() {
        let mut e = engine();
        // Poll #1 issued, toggle #2 issued; the toggle reply lands first.
        e.toggle_requested(Device::Motor, true);
        e.apply(SyncEvent::CommandCompleted(CommandOutcome::Toggle {
            seq: 2,
            device: Device::Motor,
            desired: true,
            result: Ok(RelayState {
                motor: true,
                light: false,
            }),
        }));
        assert!(e.state().motor.on);

        e.apply(poll(1, Ok(snapshot(5.0, RelayState::default()))));
        assert!(!e.state().motor.on);
        assert!(!e.state().motor.hint.is_pending());
        assert_eq!(e.state().water_24h.text(), "5 L");
    }

    #[test]
    fn test_sequenced_ordering_drops_older_responses() {
        let mut e = SyncEngine::new(ResponseOrdering::Sequenced, false);
        e.apply(poll(2, Ok(snapshot(2.0, RelayState::default()))));
        e.apply(poll(1, Ok(snapshot(1.0, RelayState::default()))));
        assert_eq!(e.state().water_24h.text(), "2 L");

        // An older poll failure must not flip the connection either.
        e.apply(poll(1, Err(rejected("late"))));
        assert_eq!(e.state().connection.label(), "Hardware connected");
    }

    #[test]
    fn test_sequenced_poll_older_than_toggle_keeps_relay() {
        let mut e = SyncEngine::new(ResponseOrdering::Sequenced, false);
        // Poll #1 issued, toggle #2 issued; toggle reply lands first.
        e.apply(SyncEvent::CommandCompleted(CommandOutcome::Toggle {
            seq: 2,
            device: Device::Motor,
            desired: true,
            result: Ok(RelayState {
                motor: true,
                light: false,
            }),
        }));
        e.apply(poll(1, Ok(snapshot(5.0, RelayState::default()))));
        assert!(e.state().motor.on);
        assert_eq!(e.state().water_24h.text(), "5 L");
    }

    #[test]
    fn test_reset_loading_rearms_gate() {
        let mut e = engine();
        e.apply(poll(1, Ok(snapshot(1.0, RelayState::default()))));
        e.reset_loading();
        assert!(e.state().loading);
        assert_eq!(e.state().water_24h.text(), "1 L");
        e.apply(poll(2, Err(rejected("x"))));
        assert!(!e.state().loading);
    }
}
