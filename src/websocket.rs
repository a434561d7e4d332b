//! WebSocket endpoint streaming tracker snapshots to clients.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut snapshots = state.snapshots.clone();

    let client_id = Uuid::new_v4();
    info!("WebSocket client connected: {}", client_id);

    // Push the current snapshot immediately so clients render without
    // waiting for the next engine change. The borrow must not be held
    // across the send.
    let initial = {
        let snapshot = snapshots.borrow_and_update();
        serde_json::to_string(&*snapshot)
    };
    if let Ok(json) = initial {
        if sender.send(Message::Text(json)).await.is_err() {
            info!("WebSocket client disconnected: {}", client_id);
            return;
        }
    }

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                // Err means the engine task is gone
                if changed.is_err() {
                    break;
                }

                let json = {
                    let snapshot = snapshots.borrow_and_update();
                    serde_json::to_string(&*snapshot)
                };
                match json {
                    Ok(json) => {
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Snapshot serialization failed: {}", e);
                    }
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Ok(Message::Ping(_))) => {
                        // Pong is handled automatically by axum
                        debug!("Received ping from {}", client_id);
                    }
                    Some(Ok(Message::Text(text))) => {
                        // Read-only stream, client text is ignored
                        debug!("Ignoring message from {}: {}", client_id, text);
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error for {}: {}", client_id, e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("WebSocket client disconnected: {}", client_id);
}
