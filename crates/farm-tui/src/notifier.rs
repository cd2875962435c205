//! Notifier: single-slot transient toast.
//!
//! A newer toast replaces the current one and restarts the hide timer.
//! Every `show` bumps a generation counter; the timer task carries the
//! generation it was armed for, and `expire` ignores anything older.  The
//! timer handle also aborts the previous task, so a superseded timer
//! neither fires nor hides its successor.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::engine::SyncEvent;

pub const TOAST_DURATION: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToastState {
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

/// Returned by `show`; hand it to a `ToastTimer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTicket {
    pub generation: u64,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct Notifier {
    slot: Option<ToastState>,
    generation: u64,
    duration: Duration,
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_duration(TOAST_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            slot: None,
            generation: 0,
            duration,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, severity: Severity) -> ToastTicket {
        self.show_at(message, severity, Instant::now())
    }

    pub fn show_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: Instant,
    ) -> ToastTicket {
        self.generation += 1;
        let expires_at = now + self.duration;
        self.slot = Some(ToastState {
            message: message.into(),
            severity,
            expires_at,
        });
        ToastTicket {
            generation: self.generation,
            expires_at,
        }
    }

    /// Hide the toast if `generation` is still current.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.slot.is_none() {
            return false;
        }
        self.slot = None;
        true
    }

    pub fn current(&self) -> Option<&ToastState> {
        self.slot.as_ref()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the one outstanding hide task.
#[derive(Debug, Default)]
pub struct ToastTimer {
    pending: Option<AbortHandle>,
}

impl ToastTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the previous timer and arm a new one for `ticket`.
    pub fn schedule(&mut self, ticket: ToastTicket, tx: mpsc::Sender<SyncEvent>) {
        self.cancel();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(ticket.expires_at).await;
            let _ = tx.send(SyncEvent::ToastExpired(ticket.generation)).await;
        });
        self.pending = Some(handle.abort_handle());
    }

    pub fn cancel(&mut self) {
        if let Some(prev) = self.pending.take() {
            debug!("toast timer superseded");
            prev.abort();
        }
    }
}

impl Drop for ToastTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
