//! Pending-intent tracking for relay toggles.
//!
//! A toggle is sent to the controller and the displayed relay state only
//! moves when the controller answers.  During that window the relay button
//! shows a pending marker instead of flipping early.
//!
//! # States
//! ```text
//!  Confirmed(T)          controller state; render normally
//!  Pending { ... }       toggle in flight; render with a pulsing marker
//!  TimedOut { ... }      no answer after INTENT_TIMEOUT; render with "?"
//! ```

use std::time::{Duration, Instant};

/// Timeout before a pending intent becomes `TimedOut`.
pub const INTENT_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub enum IntentState<T: Clone + PartialEq> {
    Confirmed(T),
    Pending {
        intended: T,
        confirmed: T,
        since: Instant,
    },
    TimedOut { intended: T, confirmed: T },
}

impl<T: Clone + PartialEq> IntentState<T> {
    pub fn new(value: T) -> Self {
        Self::Confirmed(value)
    }

    #[cfg(test)]
    pub fn intended(&self) -> &T {
        match self {
            Self::Confirmed(v) => v,
            Self::Pending { intended, .. } => intended,
            Self::TimedOut { intended, .. } => intended,
        }
    }

    /// The last value the controller reported.
    pub fn confirmed(&self) -> &T {
        match self {
            Self::Confirmed(v) => v,
            Self::Pending { confirmed, .. } => confirmed,
            Self::TimedOut { confirmed, .. } => confirmed,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Register a toggle that was just dispatched.
    /// Stays `Confirmed` when `intended` already matches the controller.
    pub fn set_intent(&mut self, intended: T) {
        let confirmed = self.confirmed().clone();
        if intended == confirmed {
            *self = Self::Confirmed(intended);
        } else {
            *self = Self::Pending {
                intended,
                confirmed,
                since: Instant::now(),
            };
        }
    }

    /// Called every UI tick.  Returns `true` if state changed.
    pub fn tick(&mut self) -> bool {
        if let Self::Pending {
            intended,
            confirmed,
            since,
        } = self
        {
            if since.elapsed() >= INTENT_TIMEOUT {
                *self = Self::TimedOut {
                    intended: intended.clone(),
                    confirmed: confirmed.clone(),
                };
                return true;
            }
        }
        false
    }

    /// A poll observed `value`.  The poll may predate the toggle, so a
    /// mismatching value updates `confirmed` but keeps the intent pending.
    pub fn on_observed(&mut self, value: T) -> bool {
        match self {
            Self::Pending {
                intended,
                confirmed,
                ..
            } => {
                if value == *intended {
                    *self = Self::Confirmed(value);
                    return true;
                }
                *confirmed = value;
                false
            }
            Self::TimedOut { .. } => {
                *self = Self::Confirmed(value);
                true
            }
            Self::Confirmed(v) => {
                if *v != value {
                    *self = Self::Confirmed(value);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// The toggle reply arrived: its value is final whatever was intended.
    pub fn resolve(&mut self, value: T) {
        *self = Self::Confirmed(value);
    }

    /// The toggle failed: drop the intent, keep the last confirmed value.
    pub fn cancel(&mut self) {
        let confirmed = self.confirmed().clone();
        *self = Self::Confirmed(confirmed);
    }

    pub fn render_state(&self) -> RenderHint {
        match self {
            Self::Confirmed(_) => RenderHint::Normal,
            Self::Pending { since, .. } => {
                // Pulse on/off every 400ms
                let pulsing = (since.elapsed().as_millis() / 400) % 2 == 0;
                if pulsing {
                    RenderHint::PendingVisible
                } else {
                    RenderHint::PendingHidden
                }
            }
            Self::TimedOut { .. } => RenderHint::TimedOut,
        }
    }
}

/// How to render a relay that may be waiting on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderHint {
    Normal,
    /// Pending, marker shown (pulse-on frame).
    PendingVisible,
    /// Pending, marker hidden (pulse-off frame).
    PendingHidden,
    /// Timed out; warning colour and "?" suffix.
    TimedOut,
}

impl RenderHint {
    pub fn is_pending(self) -> bool {
        matches!(self, RenderHint::PendingVisible | RenderHint::PendingHidden)
    }
}
