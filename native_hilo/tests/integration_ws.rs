use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use hilo_shared::{Card, CardRank, CardSuit, ClientMsg, Direction, Phase, RoundStatePublic, ServerMsg};
use native_hilo::game::RoundEngine;
use native_hilo::server::{build_router, AppState};
use native_hilo::storage::MemoryStore;
use native_hilo::supply::ScriptedSupply;
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;

type WsRead = futures_util::stream::SplitStream<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
>;

fn card(value: u8) -> Card {
    Card::new(CardRank::from_value(value).expect("valid value"), CardSuit::Spades)
}

async fn spawn_server(cards: &[u8]) -> Result<(std::net::SocketAddr, tokio::task::JoinHandle<()>)> {
    let supply = ScriptedSupply::from_cards(cards.iter().map(|&v| card(v)));
    let state = AppState::new(
        RoundEngine::new(Box::new(MemoryStore::default())),
        Arc::new(supply),
    );
    let app = build_router(state, None);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok((addr, handle))
}

/// Read states until one matches `pred` or the timeout runs out.
async fn wait_for_state(
    read: &mut WsRead,
    pred: impl Fn(&RoundStatePublic) -> bool,
) -> Option<RoundStatePublic> {
    let start = tokio::time::Instant::now();
    while start.elapsed() < Duration::from_secs(3) {
        if let Ok(Some(Ok(Message::Text(txt)))) =
            tokio::time::timeout(Duration::from_millis(300), read.next()).await
        {
            if let Ok(ServerMsg::State(gs)) = serde_json::from_str::<ServerMsg>(&txt) {
                if pred(&gs) {
                    return Some(gs);
                }
            }
        }
    }
    None
}

#[tokio::test]
async fn ws_client_plays_a_round() -> Result<()> {
    let (addr, server) = spawn_server(&[5, 11, 7]).await?;
    let ws_url = format!("ws://127.0.0.1:{}/ws", addr.port());
    let (stream, _) = tokio_tungstenite::connect_async(&ws_url).await?;
    let (mut write, mut read) = stream.split();

    let first = read.next().await;
    assert!(
        matches!(first, Some(Ok(Message::Text(ref t))) if t.contains("Welcome")),
        "expected a welcome first, got {:?}",
        first
    );
    let initial = wait_for_state(&mut read, |_| true).await;
    assert_eq!(initial.map(|gs| gs.phase), Some(Phase::AwaitingFirstCard));

    for cm in [
        ClientMsg::Draw,
        ClientMsg::Guess(Direction::Higher),
        ClientMsg::Resolve,
    ] {
        write.send(Message::Text(serde_json::to_string(&cm)?)).await?;
    }

    let resolved = wait_for_state(&mut read, |gs| gs.score == 1 && gs.phase == Phase::AwaitingGuess).await;
    server.abort();

    let gs = resolved.expect("never saw the state after a correct round");
    assert_eq!(gs.previous_card, Some(card(11)));
    assert_eq!(gs.current_card, Some(card(7)));
    assert_eq!(gs.high_score, 1);
    Ok(())
}

#[tokio::test]
async fn ws_broadcasts_to_watching_displays() -> Result<()> {
    let (addr, server) = spawn_server(&[9]).await?;
    let ws_url = format!("ws://127.0.0.1:{}/ws", addr.port());
    let (player, _) = tokio_tungstenite::connect_async(&ws_url).await?;
    let (watcher, _) = tokio_tungstenite::connect_async(&ws_url).await?;
    let (mut write, _player_read) = player.split();
    let (mut watcher_write, mut watcher_read) = watcher.split();

    watcher_write
        .send(Message::Text(serde_json::to_string(&ClientMsg::Subscribe)?))
        .await?;
    write
        .send(Message::Text(serde_json::to_string(&ClientMsg::Draw)?))
        .await?;

    let seen = wait_for_state(&mut watcher_read, |gs| gs.current_card == Some(card(9))).await;
    server.abort();
    assert!(seen.is_some(), "watcher did not receive the drawn card");
    Ok(())
}

#[tokio::test]
async fn ws_rejects_malformed_json() -> Result<()> {
    let (addr, server) = spawn_server(&[]).await?;
    let ws_url = format!("ws://127.0.0.1:{}/ws", addr.port());
    let (stream, _) = tokio_tungstenite::connect_async(&ws_url).await?;
    let (mut write, mut read) = stream.split();
    write.send(Message::Text("{\"type\":\"Shuffle\"}".into())).await?;

    let mut got_error = false;
    let start = tokio::time::Instant::now();
    while start.elapsed() < Duration::from_secs(3) {
        if let Ok(Some(Ok(Message::Text(txt)))) =
            tokio::time::timeout(Duration::from_millis(300), read.next()).await
        {
            if let Ok(ServerMsg::Error(e)) = serde_json::from_str::<ServerMsg>(&txt) {
                got_error = e.contains("Malformed");
                break;
            }
        }
    }
    server.abort();
    assert!(got_error, "no error reply for malformed message");
    Ok(())
}

#[tokio::test]
async fn ws_watcher_sees_game_over() -> Result<()> {
    let (addr, server) = spawn_server(&[5, 9]).await?;
    let ws_url = format!("ws://127.0.0.1:{}/ws", addr.port());
    let (player, _) = tokio_tungstenite::connect_async(&ws_url).await?;
    let (watcher, _) = tokio_tungstenite::connect_async(&ws_url).await?;
    let (mut write, _player_read) = player.split();
    let (_watcher_write, mut watcher_read) = watcher.split();

    for cm in [
        ClientMsg::Draw,
        ClientMsg::Guess(Direction::Lower),
        ClientMsg::Resolve,
    ] {
        write.send(Message::Text(serde_json::to_string(&cm)?)).await?;
    }

    let seen = wait_for_state(&mut watcher_read, |gs| gs.phase == Phase::GameOver).await;
    server.abort();

    let gs = seen.expect("watcher never saw the game end");
    assert!(gs.game_over);
    assert!(gs.hints.show_restart);
    assert_eq!(gs.score, 0);
    Ok(())
}
