//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::PlayerIntent;
use crate::util::rate_limit::PlayerRateLimiter;
use crate::util::time::unix_millis;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Display name for the joining player
    pub name: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Response {
    let user_id = Uuid::new_v4();
    let display_name = query
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("Player_{}", &user_id.to_string()[..8]));

    info!(user_id = %user_id, name = %display_name, "WebSocket upgrade");
    ws.on_upgrade(move |socket| handle_socket(socket, user_id, display_name, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, user_id: Uuid, display_name: String, state: AppState) {
    info!(user_id = %user_id, "New WebSocket connection");

    let (mut ws_sink, ws_stream) = socket.split();

    // Send welcome message
    let welcome = ServerMsg::Welcome {
        user_id,
        server_time: unix_millis(),
    };

    if let Err(e) = send_msg(&mut ws_sink, &welcome).await {
        error!(user_id = %user_id, error = %e, "Failed to send welcome");
        return;
    }

    let input_tx = state.world.input_tx.clone();
    let update_rx = state.world.update_tx.subscribe();

    // Enter the world
    let join = PlayerIntent {
        user_id,
        msg: ClientMsg::Join {
            name: display_name.clone(),
        },
        received_at: unix_millis(),
    };
    if input_tx.send(join).await.is_err() {
        error!(user_id = %user_id, "World intent channel closed");
        return;
    }

    state.connections.insert(user_id, display_name);

    // Run the session with split read/write
    run_session(user_id, ws_sink, ws_stream, input_tx, update_rx).await;

    // Cleanup on disconnect
    state.connections.remove(&user_id);

    info!(user_id = %user_id, "WebSocket connection closed");
}

/// Run the WebSocket session with read/write split
async fn run_session(
    user_id: Uuid,
    mut ws_sink: futures::stream::SplitSink<WebSocket, Message>,
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
    input_tx: mpsc::Sender<PlayerIntent>,
    mut update_rx: broadcast::Receiver<ServerMsg>,
) {
    let rate_limiter = PlayerRateLimiter::new();

    // Spawn writer task: broadcast updates -> WebSocket
    let writer_user_id = user_id;
    let writer_handle = tokio::spawn(async move {
        loop {
            match update_rx.recv().await {
                Ok(msg) => {
                    // World updates are per-player frames on a shared
                    // channel; drop the ones addressed elsewhere.
                    if let ServerMsg::WorldUpdate { user_id: target, .. } = &msg {
                        if *target != writer_user_id {
                            continue;
                        }
                    }
                    if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                        debug!(user_id = %writer_user_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(
                        user_id = %writer_user_id,
                        lagged_count = n,
                        "Client lagged, skipping {} updates", n
                    );
                    // Continue - don't disconnect for lag
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(user_id = %writer_user_id, "Update channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> world loop
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if !rate_limiter.check_input() {
                    warn!(user_id = %user_id, "Rate limited input message");
                    continue;
                }

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(msg @ (ClientMsg::Move { .. } | ClientMsg::Ping { .. })) => {
                        let intent = PlayerIntent {
                            user_id,
                            msg,
                            received_at: unix_millis(),
                        };

                        if input_tx.send(intent).await.is_err() {
                            debug!(user_id = %user_id, "Intent channel closed");
                            break;
                        }
                    }
                    Ok(_) => {
                        // Join/leave are connection-lifecycle events, not
                        // wire intents
                        warn!(user_id = %user_id, "Session message not accepted from client");
                    }
                    Err(e) => {
                        warn!(user_id = %user_id, error = %e, "Failed to parse client message");
                    }
                }
            }
            Ok(Message::Binary(_)) => {
                warn!(user_id = %user_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) => {
                debug!(user_id = %user_id, "Received ping");
            }
            Ok(Message::Pong(_)) => {
                debug!(user_id = %user_id, "Received pong");
            }
            Ok(Message::Close(_)) => {
                info!(user_id = %user_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Signal leave to the world loop
    let _ = input_tx
        .send(PlayerIntent {
            user_id,
            msg: ClientMsg::Leave,
            received_at: unix_millis(),
        })
        .await;

    // Abort writer task
    writer_handle.abort();
}

/// Send a message over WebSocket
async fn send_msg(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
