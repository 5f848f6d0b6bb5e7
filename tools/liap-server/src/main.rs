//! WebSocket server for Liap Tui (§4.7, §9): one socket per connection, one
//! spawned room actor per room. Each connection is a thin bridge — it owns
//! no game state, only a `RoomHandle` and the player id it joined as.
//!
//! Client -> server messages are `liap_types::action::ClientMessage`
//! (`{event, data}`); the first one on a fresh connection must be
//! `create_room` or `join_room`, everything after goes straight to the
//! room's inbox.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use tower_http::cors::CorsLayer;

use liap_room::{RoomConfig, RoomRegistry};
use liap_types::action::ClientMessage;
use liap_types::event::ServerMessage;
use liap_types::ids::RoomId;

#[derive(Clone)]
struct AppState {
    registry: Arc<RoomRegistry>,
}

async fn health() -> &'static str {
    "liap-server ok"
}

async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html><head><title>Liap Tui Server</title></head>
<body>
<h1>Liap Tui WebSocket Server</h1>
<p>Connect via WebSocket at <code>/ws</code></p>
<pre>
const ws = new WebSocket("ws://localhost:8080/ws");
ws.onmessage = (e) => console.log(JSON.parse(e.data));
ws.onopen = () => ws.send(JSON.stringify({ event: "create_room" }));
</pre>
</body></html>"#,
    )
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Awaits the next outbound message once a room connection exists; before
/// that (pre-join), there's nothing to wait on, so this never resolves and
/// the `select!` below falls through to the inbound-frame branch.
async fn recv_or_pending(rx: &mut Option<tokio::sync::mpsc::UnboundedReceiver<ServerMessage>>) -> Option<ServerMessage> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let mut session: Option<(liap_room::RoomHandle, liap_types::ids::PlayerId)> = None;
    let mut outbound_rx: Option<tokio::sync::mpsc::UnboundedReceiver<ServerMessage>> = None;

    loop {
        tokio::select! {
            biased;
            outgoing = recv_or_pending(&mut outbound_rx) => match outgoing {
                Some(message) => {
                    if send_json(&mut sink, &message).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            incoming = stream.next() => {
                let Some(incoming) = incoming else { break };
                let Ok(incoming) = incoming else { break };
                let text = match incoming {
                    Message::Text(t) => t,
                    Message::Close(_) => break,
                    _ => continue,
                };

                let client_msg: ClientMessage = match serde_json::from_str(&text) {
                    Ok(m) => m,
                    Err(e) => {
                        let _ = send_json(&mut sink, &ServerMessage::Error { code: "malformed_json".into(), message: e.to_string() }).await;
                        continue;
                    }
                };

                match client_msg {
                    ClientMessage::CreateRoom if session.is_none() => {
                        let room_id = state.registry.create_room(RoomConfig::from_env());
                        let _ = send_json(
                            &mut sink,
                            &ServerMessage::RoomListUpdate { rooms: vec![liap_types::event::RoomSummary { room_id: room_id.to_string(), occupied_seats: 0, in_progress: false }] },
                        )
                        .await;
                    }
                    ClientMessage::JoinRoom { room_id, player_name } if session.is_none() => {
                        let Some(handle) = state.registry.get(&RoomId::from(room_id.clone())) else {
                            let _ = send_json(&mut sink, &ServerMessage::Error { code: "room_not_found".into(), message: format!("no room {room_id}") }).await;
                            continue;
                        };
                        match handle.join(player_name).await {
                            Ok(ack) => {
                                let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
                                handle.connect(ack.player_id.clone(), tx);
                                outbound_rx = Some(rx);
                                session = Some((handle, ack.player_id));
                            }
                            Err(e) => {
                                let _ = send_json(&mut sink, &ServerMessage::Error { code: e.code(), message: e.to_string() }).await;
                            }
                        }
                    }
                    other => match &session {
                        Some((handle, player_id)) => handle.send_action(player_id.clone(), other),
                        None => {
                            let _ = send_json(&mut sink, &ServerMessage::Error { code: "unexpected_message".into(), message: "join a room first".into() }).await;
                        }
                    },
                }
            }
        }
    }

    if let Some((handle, player_id)) = session {
        handle.disconnect(player_id);
    }
}

async fn send_json(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).expect("ServerMessage should serialize");
    sink.send(Message::Text(json.into())).await
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let state = AppState { registry: RoomRegistry::new() };

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = liap_room::config::listen_port();
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        tracing::error!(%addr, error = %e, "failed to bind");
        std::process::exit(1);
    });
    tracing::info!(%addr, "liap-server listening");
    axum::serve(listener, app).await.unwrap();
}
