use std::sync::Arc;

use clap::Parser;
use log::info;
use rand::Rng as _;
use tokio::net::TcpListener;

use maze_arena_server::constants::{DEFAULT_MAX_PLAYERS, DEFAULT_PORT};
use maze_arena_server::engine::GameEngine;
use maze_arena_server::maze::Maze;
use maze_arena_server::server::{run_server, start_game_loop, ServerState};

/// Authoritative multiplayer maze arena server.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// TCP port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Maximum simultaneous players
    #[arg(long, default_value_t = DEFAULT_MAX_PLAYERS)]
    max_players: usize,

    /// Simulation seed; random when omitted
    #[arg(long)]
    seed: Option<u32>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    let engine = GameEngine::new(Maze::default_level(), cli.max_players, seed);
    let state = ServerState::shared(engine);
    let _game_loop = start_game_loop(Arc::clone(&state));

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {addr} (seed {seed}, max {} players)", cli.max_players);
    run_server(listener, state).await
}
