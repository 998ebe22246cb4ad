use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use crate::game::{DrawApplied, DrawTicket, EngineError, RoundEngine};
use crate::storage::MemoryStore;
use crate::supply::{CardSupply, LocalSupply};
use hilo_shared::{ClientMsg, RoundStatePublic, ServerMsg};

pub const CHANNEL_BUFFER_SIZE: usize = 256;

/// Shared application state exposed to handlers.
///
/// The engine lock is never held across a card draw: commands take a ticket
/// under the lock, release it, await the supply, then lock again to apply the
/// card. A restart that slips in between makes the late card stale.
///
/// A new high score is written through the engine's store while the lock is
/// held. With a `FileStore` that is a blocking write of a few bytes on the
/// runtime thread, once per scoring round.
#[derive(Clone)]
pub struct AppState {
    pub(crate) engine: Arc<Mutex<RoundEngine>>,
    pub(crate) supply: Arc<dyn CardSupply>,
    pub broadcaster: broadcast::Sender<ServerMsg>,
}

impl AppState {
    pub fn new(engine: RoundEngine, supply: Arc<dyn CardSupply>) -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_BUFFER_SIZE);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            supply,
            broadcaster: tx,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(
            RoundEngine::new(Box::new(MemoryStore::default())),
            Arc::new(LocalSupply::new()),
        )
    }
}

pub async fn current_state_public(state: &AppState) -> RoundStatePublic {
    state.engine.lock().await.public()
}

/// Send the current state to every subscriber. No subscribers is fine.
pub async fn broadcast_state(state: &AppState) {
    let gs = current_state_public(state).await;
    let _ = state.broadcaster.send(ServerMsg::State(gs));
}

async fn fulfil(state: &AppState, ticket: DrawTicket) -> Result<(), EngineError> {
    // lock released here: a restart may overtake this draw
    let result = state.supply.supply_random_card().await;
    let applied = state.engine.lock().await.complete_draw(ticket, result);
    // a failed draw is still news for watchers: the error event was logged
    broadcast_state(state).await;
    if let DrawApplied::Discarded = applied? {
        tracing::info!(
            generation = ticket.generation(),
            "draw result arrived after a restart and was dropped"
        );
    }
    Ok(())
}

/// Run one command against the engine and return the resulting state.
pub async fn dispatch(state: &AppState, cm: ClientMsg) -> Result<RoundStatePublic, EngineError> {
    let mutates = !matches!(
        cm,
        ClientMsg::RequestState | ClientMsg::Subscribe | ClientMsg::Ping
    );
    let ticket = {
        let mut engine = state.engine.lock().await;
        match cm {
            ClientMsg::Draw => Some(engine.begin_draw()?),
            ClientMsg::Guess(direction) => Some(engine.guess(direction)?),
            // no ticket after a wrong guess: the round ends in GameOver
            ClientMsg::Resolve => engine.resolve_round()?.next_draw,
            ClientMsg::Restart => Some(engine.restart()),
            // read-only: the caller gets the snapshot below
            ClientMsg::RequestState | ClientMsg::Subscribe | ClientMsg::Ping => None,
        }
    };
    // every accepted command changed the state, so watchers hear about it
    // before any draw starts (loading hints, game over screens)
    if mutates {
        broadcast_state(state).await;
    }
    if let Some(ticket) = ticket {
        fulfil(state, ticket).await?;
    }
    Ok(current_state_public(state).await)
}

/// Single entry point shared by every transport.
pub async fn handle_client_msg(state: &AppState, cm: ClientMsg) -> ServerMsg {
    if let ClientMsg::Ping = cm {
        return ServerMsg::Pong;
    }
    match dispatch(state, cm).await {
        Ok(gs) => ServerMsg::State(gs),
        Err(e) => ServerMsg::Error(e.to_string()),
    }
}
