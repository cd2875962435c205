//! RenderState: the view-facing model every component reads.
//!
//! Only `SyncEngine` produces new values; components get `&RenderState`.
//! Each reconciliation builds the next state from the previous one plus a
//! patch instead of mutating fields in place.

use chrono::{DateTime, Local};
use farm_proto::protocol::{Device, RelayState};

use crate::intent::RenderHint;
use crate::mapper::TelemetryPatch;

/// Rendered marker for "value unknown".  Distinct from a real zero.
pub const PLACEHOLDER: &str = "—";

/// A display field: either a formatted measurement or unknown.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Reading {
    Value(String),
    #[default]
    Unknown,
}

impl Reading {
    pub fn text(&self) -> &str {
        match self {
            Reading::Value(s) => s,
            Reading::Unknown => PLACEHOLDER,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Reading::Value(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionVisual {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionVisual {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionVisual::Connected => "Hardware connected",
            ConnectionVisual::Disconnected => "Waiting for controller",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelayView {
    /// Last state confirmed by the controller.
    pub on: bool,
    pub name: String,
    pub last_run: Reading,
    pub hint: RenderHint,
}

impl RelayView {
    fn new() -> Self {
        Self {
            on: false,
            name: String::new(),
            last_run: Reading::Unknown,
            hint: RenderHint::Normal,
        }
    }

    pub fn state_label(&self) -> &'static str {
        if self.on {
            "ON"
        } else {
            "OFF"
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub connection: ConnectionVisual,
    pub motor: RelayView,
    pub light: RelayView,

    /// Clamped to 0..=100; `None` when unknown.
    pub moisture_percent: Option<f64>,
    pub moisture: Reading,
    pub csi: Reading,
    pub water_24h: Reading,
    pub power_24h: Reading,
    pub predicted_water: Reading,
    pub predicted_power: Reading,
    pub crop_label: String,

    pub last_updated_at: Option<DateTime<Local>>,
    /// True until the first poll response of the session.
    pub loading: bool,
}

impl RenderState {
    pub fn initial() -> Self {
        Self {
            connection: ConnectionVisual::Disconnected,
            motor: RelayView::new(),
            light: RelayView::new(),
            moisture_percent: None,
            moisture: Reading::Unknown,
            csi: Reading::Unknown,
            water_24h: Reading::Unknown,
            power_24h: Reading::Unknown,
            predicted_water: Reading::Unknown,
            predicted_power: Reading::Unknown,
            crop_label: String::new(),
            last_updated_at: None,
            loading: true,
        }
    }

    pub fn relay(&self, device: Device) -> &RelayView {
        match device {
            Device::Motor => &self.motor,
            Device::Light => &self.light,
        }
    }

    /// Fill ratio for the moisture gauge.  Zero while loading or unknown.
    pub fn gauge_ratio(&self) -> f64 {
        if self.loading {
            return 0.0;
        }
        self.moisture_percent.unwrap_or(0.0) / 100.0
    }

    /// Next state after a successful poll.  A poll is authoritative for
    /// everything except relay on/off when the payload omits `relay`.
    pub fn with_poll(&self, patch: TelemetryPatch, relay: Option<RelayState>) -> Self {
        let mut motor = self.motor.clone();
        let mut light = self.light.clone();
        motor.name = patch.motor_name;
        light.name = patch.light_name;
        motor.last_run = patch.motor_last_run;
        light.last_run = patch.light_last_run;
        if let Some(relay) = relay {
            motor.on = relay.motor;
            light.on = relay.light;
        }
        Self {
            connection: patch.connection,
            motor,
            light,
            moisture_percent: patch.moisture_percent,
            moisture: patch.moisture,
            csi: patch.csi,
            water_24h: patch.water_24h,
            power_24h: patch.power_24h,
            predicted_water: patch.predicted_water,
            predicted_power: patch.predicted_power,
            crop_label: patch.crop_label,
            last_updated_at: Some(Local::now()),
            loading: false,
        }
    }

    /// Next state after a failed poll: stale-but-visible.
    pub fn with_poll_failure(&self) -> Self {
        Self {
            connection: ConnectionVisual::Disconnected,
            loading: false,
            ..self.clone()
        }
    }

    /// Next state after the controller confirmed relay state.
    pub fn with_relay(&self, relay: RelayState) -> Self {
        let mut next = self.clone();
        next.motor.on = relay.motor;
        next.light.on = relay.light;
        next
    }

    pub fn with_hints(&self, motor: RenderHint, light: RenderHint) -> Self {
        let mut next = self.clone();
        next.motor.hint = motor;
        next.light.hint = light;
        next
    }

    pub fn with_loading(&self, loading: bool) -> Self {
        Self {
            loading,
            ..self.clone()
        }
    }

    /// Plain-text rendering for non-interactive output.
    pub fn text_lines(&self) -> Vec<String> {
        let relay_line = |device: Device| {
            let view = self.relay(device);
            let name = if view.name.is_empty() {
                device.as_str()
            } else {
                view.name.as_str()
            };
            format!(
                "{:<16} {:<3}  last run {}",
                name,
                view.state_label(),
                view.last_run.text()
            )
        };
        let mut lines = vec![self.connection.label().to_string()];
        if !self.crop_label.is_empty() {
            lines.push(self.crop_label.clone());
        }
        lines.push(relay_line(Device::Motor));
        lines.push(relay_line(Device::Light));
        lines.push(format!("Soil moisture    {}", self.moisture.text()));
        lines.push(format!("Crop stress      {}", self.csi.text()));
        lines.push(format!("Water (24h)      {}", self.water_24h.text()));
        lines.push(format!("Power (24h)      {}", self.power_24h.text()));
        lines.push(format!("Water forecast   {}", self.predicted_water.text()));
        lines.push(format!("Power forecast   {}", self.predicted_power.text()));
        lines
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::initial()
    }
}
