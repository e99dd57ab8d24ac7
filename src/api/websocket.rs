//! WebSocket handler for panel refresh notifications
//!
//! Clients connected to `/ws` receive a `panel` event with the current
//! revision on connect and again whenever the control panel must be rebuilt.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};

use super::shared::SharedStateHandle;
use super::types::WsEvent;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedStateHandle>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn panel_message(revision: u64) -> Option<Message> {
    serde_json::to_string(&WsEvent::Panel { revision }).ok().map(Message::Text)
}

async fn handle_socket(socket: WebSocket, state: SharedStateHandle) {
    let (mut sender, mut receiver) = socket.split();

    let mut revisions = state.designer().subscribe_panel();
    let initial = *revisions.borrow_and_update();
    if let Some(message) = panel_message(initial) {
        if sender.send(message).await.is_err() {
            return;
        }
    }

    tracing::info!("WebSocket client connected");

    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!("WebSocket client requested close");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket receive error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    let send_task = tokio::spawn(async move {
        while revisions.changed().await.is_ok() {
            let revision = *revisions.borrow_and_update();
            let Some(message) = panel_message(revision) else {
                continue;
            };
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    tokio::select! {
        _ = recv_task => {},
        _ = send_task => {},
    }

    tracing::info!("WebSocket client disconnected");
}
