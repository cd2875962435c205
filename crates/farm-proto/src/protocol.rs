use serde::{Deserialize, Deserializer, Serialize};

pub const STATUS_PATH: &str = "/api/status";
pub const TOGGLE_PATH: &str = "/api/toggle";
pub const RENAME_PATH: &str = "/api/rename";

/// The two relays on the controller board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Motor,
    Light,
}

impl Device {
    pub const ALL: [Device; 2] = [Device::Motor, Device::Light];

    pub fn as_str(self) -> &'static str {
        match self {
            Device::Motor => "motor",
            Device::Light => "light",
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On/off state of both relays, as reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelayState {
    #[serde(default)]
    pub motor: bool,
    #[serde(default)]
    pub light: bool,
}

impl RelayState {
    pub fn get(self, device: Device) -> bool {
        match device {
            Device::Motor => self.motor,
            Device::Light => self.light,
        }
    }
}

/// Values derived server-side from relay runtimes.  Every field may be
/// `null`, which means "unknown" and is distinct from a measured zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualSensors {
    /// Soil moisture as a fraction, nominally 0..1.
    #[serde(default)]
    pub soil_moisture: Option<f64>,
    /// Crop stress index.
    #[serde(default)]
    pub csi: Option<f64>,
    #[serde(default)]
    pub water_liters_24h: Option<f64>,
    #[serde(default)]
    pub power_kwh_24h: Option<f64>,
}

/// Next-day usage forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Predictions {
    #[serde(default)]
    pub water_liters: Option<f64>,
    #[serde(default)]
    pub power_kwh: Option<f64>,
}

/// Seconds of the most recent completed run per relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtimes {
    #[serde(default)]
    pub motor: u64,
    #[serde(default)]
    pub light: u64,
}

impl Runtimes {
    pub fn get(self, device: Device) -> u64 {
        match device {
            Device::Motor => self.motor,
            Device::Light => self.light,
        }
    }
}

/// One `GET /api/status` payload.  Never retained past reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Only a literal JSON `true` counts as connected.
    #[serde(rename = "serial_connected", default, deserialize_with = "strict_true")]
    pub connected: bool,
    #[serde(default)]
    pub relay: Option<RelayState>,
    #[serde(default)]
    pub motor_name: Option<String>,
    #[serde(default)]
    pub light_name: Option<String>,
    #[serde(rename = "virtual", default)]
    pub sensors: Option<VirtualSensors>,
    #[serde(default)]
    pub predictions: Option<Predictions>,
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub last_runtimes: Option<Runtimes>,
}

fn strict_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(matches!(value, serde_json::Value::Bool(true)))
}

/// `POST /api/toggle` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub device: Device,
    pub state: bool,
}

/// `POST /api/toggle` reply.  `relay` is the controller's authoritative view
/// of both relays after the command, which may differ from what was asked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToggleResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub relay: Option<RelayState>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /api/rename` body.  Both names are always sent together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRequest {
    pub motor_name: String,
    pub light_name: String,
}

impl RenameRequest {
    /// Build a request from raw user input.  Whitespace is trimmed; an empty
    /// name is a valid value that clears the label.
    pub fn new(motor_name: &str, light_name: &str) -> Self {
        Self {
            motor_name: motor_name.trim().to_string(),
            light_name: light_name.trim().to_string(),
        }
    }
}

/// `POST /api/rename` reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenameResponse {
    #[serde(default)]
    pub ok: bool,
}
