// WebSocket handler: welcome + state on connect, then commands in and
// broadcasts out.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::StreamExt;
use tokio::sync::broadcast;

use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::pretty;
use crate::server::state::{current_state_public, handle_client_msg, AppState};
use hilo_shared::{ClientMsg, ServerMsg};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let hello = format!("{} {}", "[CONNECT]".bold().green(), "display".bold());
    tracing::info!(%hello);

    // Welcome + current state right away, so a display that joins mid-round
    // can draw the table before sending anything.
    send_ws(&mut socket, &ServerMsg::Welcome).await;
    let gs = current_state_public(&state).await;
    send_ws(&mut socket, &ServerMsg::State(gs)).await;

    // State changes caused by other connections (or the startup draw) arrive here.
    let mut rx = state.broadcaster.subscribe();
    let color = std::io::stdout().is_terminal();

    loop {
        tokio::select! {
            biased;

            // Server-wide broadcasts are forwarded unchanged
            recv = rx.recv() => {
                match recv {
                    Ok(sm) => send_ws(&mut socket, &sm).await,
                    // missed a few states; the next one carries everything
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            // Commands from this display
            msg = socket.next() => {
                match msg {
                    Some(Ok(Message::Text(txt))) => {
                        match serde_json::from_str::<ClientMsg>(&txt) {
                            Ok(cm) => {
                                tracing::debug!(ws_received_client_msg = ?cm);
                                let resp = handle_client_msg(&state, cm).await;
                                // Echo the newest event to the server console
                                if let ServerMsg::State(gs) = &resp {
                                    if let Some(ev) = gs.event_log.last() {
                                        tracing::info!("{}", pretty::format_event_human(ev, color));
                                    }
                                }
                                send_ws(&mut socket, &resp).await;
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "failed to parse incoming ClientMsg JSON");
                                tracing::debug!(raw_in = %txt);
                                send_ws(&mut socket, &ServerMsg::Error("Malformed ClientMsg JSON".into())).await;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // ping/pong and binary frames carry nothing for us
                    _ => {}
                }
            }
        }
    }
    tracing::info!("display disconnected");
}

async fn send_ws(socket: &mut WebSocket, msg: &ServerMsg) {
    match serde_json::to_string(msg) {
        Ok(txt) => {
            let _ = socket.send(Message::Text(txt)).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize ServerMsg for websocket send");
        }
    }
}
