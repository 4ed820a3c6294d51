//! WebSocket connection lifecycle: attach a player to the hub, pump messages
//! both ways, and report the disconnect.

use axum::{extract::State, response::IntoResponse};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::game::engine::Event;
use crate::http::routes::AppState;
use crate::util::id::{new_player_id, PlayerId};
use crate::ws::protocol::{ClientMsg, ServerMsg};

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let player = new_player_id();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (sv_tx, mut sv_rx) = mpsc::unbounded_channel::<ServerMsg>();
    state.hub.connect(player, sv_tx);
    tracing::info!(%player, "ws connected");

    // forward hub -> socket
    let writer = tokio::spawn(async move {
        while let Some(msg) = sv_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to encode outbound message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_rx.next().await {
        match msg {
            Message::Text(text) => on_text(&state, player, &text),
            Message::Close(_) => break,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    state.hub.send(Event::Disconnected { player });
    writer.abort();
    tracing::info!(%player, "ws closed");
}

fn on_text(state: &AppState, player: PlayerId, text: &str) {
    match serde_json::from_str::<ClientMsg>(text) {
        Ok(msg) => state.hub.send(Event::Client { player, msg }),
        Err(err) => tracing::debug!(%player, error = %err, "dropping malformed message"),
    }
}
