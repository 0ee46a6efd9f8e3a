use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::hub::Hub;

pub type AppState = Arc<Hub>;

// =============================================================================
// Response Models
// =============================================================================

#[derive(Serialize)]
pub struct HealthModel {
    pub status: String,
    pub connections: usize,
    pub rooms: usize,
    pub waiting: bool,
}

// =============================================================================
// Handlers
// =============================================================================

async fn health(State(hub): State<AppState>) -> Json<HealthModel> {
    let stats = hub.stats();
    Json(HealthModel {
        status: "ok".to_string(),
        connections: stats.connections,
        rooms: stats.rooms,
        waiting: stats.waiting,
    })
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(hub): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, hub))
}

/// Pump one WebSocket until either side goes away.
async fn serve_socket(socket: WebSocket, hub: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let conn = hub.connect(tx);
    info!(%conn, "client connected");

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    error!(%conn, %err, "failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_hub = Arc::clone(&hub);
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => recv_hub.handle_text(conn, text.as_str()),
                Message::Close(_) => break,
                other => debug!(%conn, ?other, "non-text frame ignored"),
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    hub.disconnect(conn);
    info!(%conn, "client disconnected");
}

// =============================================================================
// Router
// =============================================================================

/// `/ws` for play, `/health` for probes, everything else from `static_dir`.
pub fn router(hub: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_upgrade))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(hub)
}
