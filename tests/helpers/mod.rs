#![allow(dead_code)] // Test helpers appear unused when compiled independently

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

/// One request received by the mock station endpoint
#[derive(Clone, Debug)]
pub struct Received {
    pub api_key: String,
    pub body: Value,
}

#[derive(Clone)]
struct WindyState {
    received: Arc<Mutex<Vec<Received>>>,
    status: Arc<AtomicU16>,
    vessel_name: Option<String>,
}

pub struct MockWindy {
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
    state: WindyState,
    pub base_url: String,
}

impl MockWindy {
    /// Base passed to the client; the key is appended to it
    pub fn api_base(&self) -> String {
        format!("{}/pws/update/", self.base_url)
    }

    pub fn respond_with(&self, status: u16) {
        self.state.status.store(status, Ordering::SeqCst);
    }

    pub async fn received(&self) -> Vec<Received> {
        self.state.received.lock().await.clone()
    }

    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}

/// Best-effort check for whether binding to loopback is permitted in the current sandbox.
pub async fn can_bind_loopback() -> bool {
    match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => {
            drop(listener);
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => false,
        Err(_) => true, // treat other errors as non-fatal for skipping
    }
}

/// Spawn a mock that serves the Windy update endpoint and the Signal K
/// vessel name endpoint.
pub async fn spawn_mock_windy(vessel_name: Option<&str>) -> MockWindy {
    let state = WindyState {
        received: Arc::new(Mutex::new(Vec::new())),
        status: Arc::new(AtomicU16::new(200)),
        vessel_name: vessel_name.map(str::to_string),
    };

    let app = Router::new()
        .route("/pws/update/:key", post(update))
        .route("/signalk/v1/api/vessels/self/name", get(vessel_name_handler))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock windy listener");
    let port = listener.local_addr().unwrap().port();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });
        if let Err(err) = server.await {
            eprintln!("mock windy server error: {}", err);
        }
    });

    MockWindy {
        shutdown_tx,
        handle,
        state,
        base_url: format!("http://127.0.0.1:{}", port),
    }
}

async fn update(
    State(state): State<WindyState>,
    Path(key): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let parsed: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.received.lock().await.push(Received {
        api_key: key,
        body: parsed,
    });

    let status = StatusCode::from_u16(state.status.load(Ordering::SeqCst))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(serde_json::json!({ "result": "ok" })))
}

async fn vessel_name_handler(State(state): State<WindyState>) -> Result<Json<Value>, StatusCode> {
    match state.vessel_name {
        Some(name) => Ok(Json(Value::String(name))),
        None => Err(StatusCode::NOT_FOUND),
    }
}
