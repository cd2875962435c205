//! Telemetry mapper: raw status payload to render patch.
//!
//! Pure: no I/O, no clock, no shared state.  Null-handling rules:
//! an absent or `null` number becomes `Reading::Unknown`, never `0`.

use farm_proto::protocol::{Device, StatusSnapshot};

use crate::render_state::{ConnectionVisual, Reading};

pub const CROP_STAGE_SEPARATOR: &str = " · ";

/// Everything a poll contributes to `RenderState` apart from relay on/off,
/// which the engine applies separately so it can honour ordering rules.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryPatch {
    pub connection: ConnectionVisual,
    pub moisture_percent: Option<f64>,
    pub moisture: Reading,
    pub csi: Reading,
    pub water_24h: Reading,
    pub power_24h: Reading,
    pub predicted_water: Reading,
    pub predicted_power: Reading,
    pub crop_label: String,
    pub motor_name: String,
    pub light_name: String,
    pub motor_last_run: Reading,
    pub light_last_run: Reading,
}

pub fn map(snapshot: &StatusSnapshot) -> TelemetryPatch {
    let sensors = snapshot.sensors.clone().unwrap_or_default();
    let predictions = snapshot.predictions.clone().unwrap_or_default();

    let moisture_percent = moisture_percent(sensors.soil_moisture);
    let last_run = |device: Device| match snapshot.last_runtimes {
        Some(rt) => Reading::Value(format!("{} s", rt.get(device))),
        None => Reading::Unknown,
    };

    TelemetryPatch {
        connection: if snapshot.connected {
            ConnectionVisual::Connected
        } else {
            ConnectionVisual::Disconnected
        },
        moisture_percent,
        moisture: match moisture_percent {
            Some(p) => Reading::Value(format!("{:.1}%", p)),
            None => Reading::Unknown,
        },
        csi: with_unit(sensors.csi, None),
        water_24h: with_unit(sensors.water_liters_24h, Some("L")),
        power_24h: with_unit(sensors.power_kwh_24h, Some("kWh")),
        predicted_water: with_unit(predictions.water_liters, Some("L")),
        predicted_power: with_unit(predictions.power_kwh, Some("kWh")),
        crop_label: crop_label(snapshot.crop.as_deref(), snapshot.stage.as_deref()),
        motor_name: snapshot.motor_name.clone().unwrap_or_default(),
        light_name: snapshot.light_name.clone().unwrap_or_default(),
        motor_last_run: last_run(Device::Motor),
        light_last_run: last_run(Device::Light),
    }
}

/// Fraction (nominally 0..1) to a percentage clamped into 0..=100.
pub fn moisture_percent(fraction: Option<f64>) -> Option<f64> {
    fraction.map(|f| (f * 100.0).clamp(0.0, 100.0))
}

/// `12.0` → `"12"`, `12.3` → `"12.3"`, plus an optional unit suffix.
pub fn with_unit(value: Option<f64>, unit: Option<&str>) -> Reading {
    match (value, unit) {
        (Some(v), Some(unit)) => Reading::Value(format!("{} {}", v, unit)),
        (Some(v), None) => Reading::Value(v.to_string()),
        (None, _) => Reading::Unknown,
    }
}

pub fn crop_label(crop: Option<&str>, stage: Option<&str>) -> String {
    [crop, stage]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(CROP_STAGE_SEPARATOR)
}
