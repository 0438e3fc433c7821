pub mod handlers;
mod host;
mod player;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::Session;

pub const PROTOCOL_VERSION: &str = "1.0";

/// What this connection is within its session, once it has created or
/// joined one.
#[derive(Debug, Clone)]
pub struct ConnCtx {
    pub code: String,
    pub name: String,
    pub is_host: bool,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let welcome = ServerMessage::Welcome {
        protocol: PROTOCOL_VERSION.to_string(),
        server_now: chrono::Utc::now().to_rfc3339(),
    };
    if let Ok(msg) = serde_json::to_string(&welcome) {
        if sender.send(Message::Text(msg.into())).await.is_err() {
            tracing::error!("Failed to send welcome message");
            return;
        }
    }

    let mut conn: Option<ConnCtx> = None;
    let mut snapshots: Option<broadcast::Receiver<Session>> = None;

    loop {
        tokio::select! {
            // Push session snapshots once attached
            snapshot = async {
                match &mut snapshots {
                    Some(rx) => rx.recv().await,
                    // Not attached to a session: wait forever
                    None => std::future::pending().await,
                }
            } => {
                match snapshot {
                    Ok(session) => {
                        let msg = ServerMessage::SessionState { session };
                        if let Ok(json) = serde_json::to_string(&msg) {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // The next snapshot carries the full state anyway
                        tracing::debug!("Connection lagged behind {} snapshots", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        // The shared record is gone
                        snapshots = None;
                        if let Some(ctx) = conn.take() {
                            let msg = ServerMessage::SessionDeleted { code: ctx.code };
                            if let Ok(json) = serde_json::to_string(&msg) {
                                if sender.send(Message::Text(json.into())).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                }
            }

            // Handle client messages
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message: {}", text);

                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                let attached_to = conn.as_ref().map(|c| c.code.clone());
                                let response =
                                    handlers::handle_message(client_msg, &mut conn, &state).await;

                                // Attach/detach moves the subscription with it
                                let now_attached_to = conn.as_ref().map(|c| c.code.clone());
                                if attached_to != now_attached_to {
                                    snapshots = match &conn {
                                        Some(ctx) => state.subscribe(&ctx.code).await.ok(),
                                        None => None,
                                    };
                                }

                                if let Some(response) = response {
                                    if let Ok(json) = serde_json::to_string(&response) {
                                        if sender.send(Message::Text(json.into())).await.is_err() {
                                            tracing::error!("Failed to send response");
                                            break;
                                        }
                                    }
                                }
                            }
                            Err(e) => {
                                tracing::error!("Failed to parse client message: {}", e);
                                let error = ServerMessage::Error {
                                    code: "PARSE_ERROR".to_string(),
                                    msg: format!("Invalid message format: {}", e),
                                };
                                if let Ok(json) = serde_json::to_string(&error) {
                                    let _ = sender.send(Message::Text(json.into())).await;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    if let Some(ctx) = conn {
        tracing::info!("Connection for {} left session {}", ctx.name, ctx.code);
    }
}
