//! In-process fake controller bridge for poller and dispatcher tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, routing::get, routing::post, Json, Router};
use farm_proto::client::DeviceClient;
use farm_proto::protocol::{Device, RelayState, RenameRequest, ToggleRequest};
use serde_json::{json, Value};

#[derive(Clone, Default)]
pub struct FakeBridge {
    pub relay: Arc<Mutex<RelayState>>,
    /// Refuse every toggle, as the bridge does with the serial port down.
    pub serial_down: bool,
    /// Force the motor off whatever was requested.
    pub motor_interlock: bool,
    pub refuse_rename: bool,
    pub renames: Arc<Mutex<Vec<RenameRequest>>>,
}

async fn status(State(bridge): State<FakeBridge>) -> Json<Value> {
    let relay = *bridge.relay.lock().unwrap();
    Json(json!({
        "serial_connected": !bridge.serial_down,
        "relay": relay,
        "motor_name": "Bore Pump",
        "light_name": "",
        "virtual": {
            "soil_moisture": 0.42,
            "csi": 0.1,
            "water_liters_24h": 12.3,
            "power_kwh_24h": null
        },
        "predictions": {"water_liters": 3.5, "power_kwh": null},
        "crop": "Tomato",
        "stage": "",
        "last_runtimes": {"motor": 30, "light": 0}
    }))
}

async fn toggle(State(bridge): State<FakeBridge>, Json(req): Json<ToggleRequest>) -> Json<Value> {
    let mut relay = bridge.relay.lock().unwrap();
    if bridge.serial_down {
        return Json(json!({"ok": false, "relay": *relay}));
    }
    match req.device {
        Device::Motor => relay.motor = req.state && !bridge.motor_interlock,
        Device::Light => relay.light = req.state,
    }
    Json(json!({"ok": true, "relay": *relay}))
}

async fn rename(State(bridge): State<FakeBridge>, Json(req): Json<RenameRequest>) -> Json<Value> {
    if bridge.refuse_rename {
        return Json(json!({"ok": false}));
    }
    bridge.renames.lock().unwrap().push(req);
    Json(json!({"ok": true}))
}

pub async fn spawn_bridge(bridge: FakeBridge) -> SocketAddr {
    let app = Router::new()
        .route("/api/status", get(status))
        .route("/api/toggle", post(toggle))
        .route("/api/rename", post(rename))
        .with_state(bridge);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// A loopback address with nothing listening on it.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn client_for(addr: SocketAddr) -> DeviceClient {
    DeviceClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap()
}
