//! TCP front end: connection handling, the tick/broadcast loop and the fan
//! out of state snapshots to every connected client.
//!
//! All shared state sits behind one async mutex. Per-client writes go through
//! a bounded channel drained by a dedicated writer task, so a slow client
//! backs up its own queue instead of the game loop; when the queue fills the
//! client is dropped.

use std::collections::HashMap;
use std::io;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::constants::{BROADCAST_MS, OUTBOUND_QUEUE_DEPTH, TICK_MS};
use crate::engine::{GameEngine, PlayerAction};
use crate::protocol::{self, ClientMessage, ServerMessage};

pub type SharedState = Arc<Mutex<ServerState>>;

pub struct ServerState {
    engine: GameEngine,
    action_queue: Vec<PlayerAction>,
    clients: HashMap<String, mpsc::Sender<String>>,
}

impl ServerState {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine,
            action_queue: Vec::new(),
            clients: HashMap::new(),
        }
    }

    pub fn shared(engine: GameEngine) -> SharedState {
        Arc::new(Mutex::new(Self::new(engine)))
    }
}

/// Spawns the simulation task: advance the engine at the tick rate and push
/// snapshots at the broadcast rate.
pub fn start_game_loop(state: SharedState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_millis(TICK_MS));
        let mut broadcast = tokio::time::interval(Duration::from_millis(BROADCAST_MS));
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let mut state = state.lock().await;
                    let actions = mem::take(&mut state.action_queue);
                    state.engine.step(actions, TICK_MS);
                }
                _ = broadcast.tick() => {
                    let mut state = state.lock().await;
                    broadcast_game_state(&mut state);
                }
            }
        }
    })
}

/// Serializes the snapshot once and fans it out to every client queue.
fn broadcast_game_state(state: &mut ServerState) {
    if state.clients.is_empty() {
        return;
    }
    let frame = protocol::encode_frame(&ServerMessage::GameStateUpdate {
        game_state: state.engine.snapshot(),
    });
    let mut stale = Vec::new();
    for (player_id, sender) in &state.clients {
        if sender.try_send(frame.clone()).is_err() {
            stale.push(player_id.clone());
        }
    }
    for player_id in stale {
        warn!("dropping unresponsive client {player_id}");
        remove_player(state, &player_id);
    }
}

fn remove_player(state: &mut ServerState, player_id: &str) {
    state.clients.remove(player_id);
    if state.engine.leave(player_id) {
        info!(
            "player {player_id} left ({} remaining)",
            state.engine.player_count()
        );
    }
}

/// Accept loop; one task per connection.
pub async fn run_server(listener: TcpListener, state: SharedState) -> io::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        debug!("connection from {addr}");
        let state = Arc::clone(&state);
        tokio::spawn(handle_connection(stream, state));
    }
}

async fn handle_connection(stream: TcpStream, state: SharedState) {
    let (read_half, mut write_half) = stream.into_split();
    let (sender, mut outbound) = mpsc::channel::<String>(OUTBOUND_QUEUE_DEPTH);
    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if write_half.write_all(frame.as_bytes()).await.is_err() {
                break;
            }
        }
    });

    let mut reader = BufReader::new(read_half);
    let mut line = String::new();
    let mut bound_player: Option<String> = None;

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        let message = match protocol::decode_client_message(raw) {
            Ok(message) => message,
            Err(err) => {
                warn!("ignoring malformed message: {err}");
                continue;
            }
        };
        match message {
            ClientMessage::Join { player_name } => {
                if bound_player.is_some() {
                    let frame = protocol::encode_frame(&ServerMessage::Error {
                        message: "already joined".to_string(),
                    });
                    let _ = sender.try_send(frame);
                    continue;
                }
                let mut state = state.lock().await;
                match state.engine.join(&player_name) {
                    Ok(player_id) => {
                        info!("{player_name} joined as {player_id}");
                        state.clients.insert(player_id.clone(), sender.clone());
                        // Queued under the lock so join_success always lands
                        // ahead of the first broadcast this client sees.
                        let frame = protocol::encode_frame(&ServerMessage::JoinSuccess {
                            player_id: player_id.clone(),
                            game_state: state.engine.snapshot(),
                        });
                        let _ = sender.try_send(frame);
                        bound_player = Some(player_id);
                    }
                    Err(err) => {
                        let frame = protocol::encode_frame(&ServerMessage::Error {
                            message: err.to_string(),
                        });
                        let _ = sender.try_send(frame);
                    }
                }
            }
            ClientMessage::Move {
                player_id,
                direction,
                position,
            } => {
                let mut state = state.lock().await;
                if state.engine.has_player(&player_id) {
                    state.action_queue.push(PlayerAction::Move {
                        player_id,
                        direction,
                        position,
                    });
                }
            }
            ClientMessage::StartGame { player_id } => {
                let mut state = state.lock().await;
                if state.engine.request_start(&player_id) {
                    info!("game started by {player_id}");
                }
            }
            ClientMessage::Disconnect { .. } => break,
        }
    }

    if let Some(player_id) = bound_player {
        let mut state = state.lock().await;
        remove_player(&mut state, &player_id);
    }
    drop(sender);
    let _ = writer.await;
}
