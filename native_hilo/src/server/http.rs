// HTTP handlers mirroring the websocket commands.
//
// Engine errors map onto status codes: a failed card draw is an upstream
// failure (502), a command in the wrong phase is a conflict (409).

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::game::EngineError;
use crate::server::state::{current_state_public, dispatch, AppState};
use hilo_shared::{ClientMsg, ServerMsg};

fn error_status(e: &EngineError) -> StatusCode {
    match e {
        EngineError::CardSupplyUnavailable(_) => StatusCode::BAD_GATEWAY,
        EngineError::InvalidState { .. } => StatusCode::CONFLICT,
    }
}

/// Apply one command.
///
/// Body: `{ "type": "Guess", "data": "higher" }`
/// Returns `ServerMsg::State` on success or `ServerMsg::Error` on failure.
pub async fn message_handler(
    State(state): State<AppState>,
    Json(cm): Json<ClientMsg>,
) -> Response {
    if let ClientMsg::Ping = cm {
        return (StatusCode::OK, Json(ServerMsg::Pong)).into_response();
    }
    match dispatch(&state, cm).await {
        Ok(gs) => (StatusCode::OK, Json(ServerMsg::State(gs))).into_response(),
        Err(e) => {
            tracing::debug!(error = %e, "http command failed");
            (error_status(&e), Json(ServerMsg::Error(e.to_string()))).into_response()
        }
    }
}

pub async fn state_handler(State(state): State<AppState>) -> impl IntoResponse {
    let gs = current_state_public(&state).await;
    (StatusCode::OK, Json(ServerMsg::State(gs)))
}
