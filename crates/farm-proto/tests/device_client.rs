//! DeviceClient against an in-process fake bridge.
//!
//! Run with: cargo test -p farm-proto --test device_client

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use farm_proto::client::{ClientError, DeviceClient, ErrorKind};
use farm_proto::protocol::{Device, RelayState, RenameRequest, ToggleRequest};
use serde_json::json;

#[derive(Clone, Default)]
struct Bridge {
    relay: Arc<Mutex<RelayState>>,
    /// When set, the bridge refuses every toggle (serial port down).
    serial_down: bool,
    /// When set, the bridge forces the motor off whatever was asked.
    motor_interlock: bool,
    refuse_rename: bool,
    renames: Arc<Mutex<Vec<RenameRequest>>>,
}

async fn status(State(bridge): State<Bridge>) -> Json<serde_json::Value> {
    let relay = *bridge.relay.lock().unwrap();
    Json(json!({
        "serial_connected": !bridge.serial_down,
        "relay": relay,
        "motor_name": "Bore Pump",
        "light_name": "Grow Light",
        "virtual": {
            "soil_moisture": 0.5,
            "csi": null,
            "water_liters_24h": 0.0,
            "power_kwh_24h": 1.25
        },
        "predictions": {"water_liters": null, "power_kwh": 0.4},
        "crop": "tomato",
        "stage": "flowering",
        "last_runtimes": {"motor": 30, "light": 0}
    }))
}

async fn toggle(
    State(bridge): State<Bridge>,
    Json(req): Json<ToggleRequest>,
) -> Json<serde_json::Value> {
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

async fn rename(
    State(bridge): State<Bridge>,
    Json(req): Json<RenameRequest>,
) -> Json<serde_json::Value> {
    if bridge.refuse_rename {
        return Json(json!({"ok": false}));
    }
    bridge.renames.lock().unwrap().push(req);
    Json(json!({"ok": true}))
}

async fn spawn_bridge(bridge: Bridge) -> SocketAddr {
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

fn client_for(addr: SocketAddr) -> DeviceClient {
    DeviceClient::new(&format!("http://{}/", addr), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn status_keeps_null_and_zero_apart() {
    let addr = spawn_bridge(Bridge::default()).await;
    let snap = client_for(addr).fetch_status().await.unwrap();

    assert!(snap.connected);
    let sensors = snap.sensors.expect("virtual block present");
    assert_eq!(sensors.csi, None);
    assert_eq!(sensors.water_liters_24h, Some(0.0));
    assert_eq!(snap.predictions.unwrap().water_liters, None);
    let runtimes = snap.last_runtimes.expect("last_runtimes present");
    assert_eq!(runtimes.get(Device::Motor), 30);
    assert_eq!(runtimes.get(Device::Light), 0);
}

#[tokio::test]
async fn toggle_returns_authoritative_relay_state() {
    let bridge = Bridge {
        motor_interlock: true,
        ..Default::default()
    };
    bridge.relay.lock().unwrap().light = true;
    let addr = spawn_bridge(bridge).await;

    let relay = client_for(addr).toggle(Device::Motor, true).await.unwrap();
    assert_eq!(
        relay,
        RelayState {
            motor: false,
            light: true
        }
    );
}

#[tokio::test]
async fn toggle_refusal_is_rejected() {
    let bridge = Bridge {
        serial_down: true,
        ..Default::default()
    };
    let addr = spawn_bridge(bridge).await;

    let err = client_for(addr).toggle(Device::Light, true).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rejected);
}

#[tokio::test]
async fn invalid_device_reply_carries_bridge_message() {
    let app = Router::new().route(
        "/api/toggle",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"ok": false, "error": "Invalid device"})),
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let err = client_for(addr).toggle(Device::Motor, false).await.unwrap_err();
    match err {
        ClientError::Rejected(msg) => assert_eq!(msg, "Invalid device"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_status_is_malformed() {
    let app = Router::new().route(
        "/api/status",
        get(|| async { (StatusCode::BAD_GATEWAY, "<html>bridge down</html>").into_response() }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let err = client_for(addr).fetch_status().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert!(matches!(err, ClientError::Malformed { status: 502, .. }));
}

#[tokio::test]
async fn unreachable_bridge_is_transport_error() {
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr).fetch_status().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn rename_with_empty_names_is_a_valid_clear() {
    let bridge = Bridge::default();
    let renames = bridge.renames.clone();
    let addr = spawn_bridge(bridge).await;

    client_for(addr)
        .rename(&RenameRequest::new("", ""))
        .await
        .unwrap();

    let seen = renames.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].motor_name, "");
    assert_eq!(seen[0].light_name, "");
}

#[tokio::test]
async fn rename_refusal_is_rejected() {
    let bridge = Bridge {
        refuse_rename: true,
        ..Default::default()
    };
    let renames = bridge.renames.clone();
    let addr = spawn_bridge(bridge).await;

    let err = client_for(addr)
        .rename(&RenameRequest::new("Pump", "Lamp"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert!(renames.lock().unwrap().is_empty());
}
