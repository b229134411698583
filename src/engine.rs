//! Deterministic game simulation. The engine owns the complete world state
//! and advances it one tick at a time; all mutation funnels through `join`,
//! `leave`, `request_start` and `step`, so the caller can wrap one engine in
//! a single lock and get consistent snapshots for free.

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{
    DOT_POINTS, FRIGHTENED_DURATION_MS, GHOST_POINTS, MAX_NAME_LEN, MIN_PLAYERS_TO_START,
    MODE_SWITCH_MS, POWER_DURATION_MS, POWER_POINTS, STARTING_LIVES,
};
use crate::maze::Maze;
use crate::rng::Rng;
use crate::types::{
    Cell, CollectibleKind, CollectibleView, Direction, GameStateView, GameStatus, GhostMode,
    GhostName, GhostView, PlayerView,
};

/// Player input collected between ticks. The queue is drained once per tick,
/// in arrival order.
#[derive(Clone, Debug)]
pub enum PlayerAction {
    Move {
        player_id: String,
        direction: Direction,
        position: Cell,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum JoinError {
    Full,
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinError::Full => write!(f, "Game is full"),
        }
    }
}

impl std::error::Error for JoinError {}

#[derive(Clone, Debug)]
struct Player {
    name: String,
    position: Cell,
    direction: Direction,
    score: i32,
    lives: i32,
    powered: bool,
    power_until_ms: u64,
}

#[derive(Clone, Debug)]
struct Ghost {
    name: GhostName,
    position: Cell,
    direction: Direction,
    mode: GhostMode,
    frightened: bool,
    eaten: bool,
    target: Option<Cell>,
}

#[derive(Clone, Debug)]
struct Collectible {
    kind: CollectibleKind,
    points: i32,
    collected: bool,
}

pub struct GameEngine {
    maze: Maze,
    rng: Rng,
    players: BTreeMap<String, Player>,
    ghosts: Vec<Ghost>,
    collectibles: BTreeMap<Cell, Collectible>,
    status: GameStatus,
    level: u32,
    /// Global ghost behavior mode; individual ghosts mirror it unless eaten.
    mode: GhostMode,
    mode_timer_ms: u64,
    frightened_timer_ms: u64,
    elapsed_ms: u64,
    next_player_seq: u32,
    max_players: usize,
}

impl GameEngine {
    pub fn new(maze: Maze, max_players: usize, seed: u32) -> Self {
        let ghosts = GhostName::ALL
            .iter()
            .map(|&name| Ghost {
                name,
                position: maze.ghost_start(name),
                direction: Direction::Left,
                mode: GhostMode::Scatter,
                frightened: false,
                eaten: false,
                target: None,
            })
            .collect();
        let collectibles = maze
            .collectible_cells()
            .into_iter()
            .map(|(cell, kind)| {
                let points = match kind {
                    CollectibleKind::Dot => DOT_POINTS,
                    CollectibleKind::Power => POWER_POINTS,
                };
                (
                    cell,
                    Collectible {
                        kind,
                        points,
                        collected: false,
                    },
                )
            })
            .collect();
        Self {
            maze,
            rng: Rng::new(seed),
            players: BTreeMap::new(),
            ghosts,
            collectibles,
            status: GameStatus::Waiting,
            level: 1,
            mode: GhostMode::Scatter,
            mode_timer_ms: 0,
            frightened_timer_ms: 0,
            elapsed_ms: 0,
            next_player_seq: 1,
            max_players,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }

    /// Adds a player at the next free spawn slot and returns the assigned id.
    pub fn join(&mut self, name: &str) -> Result<String, JoinError> {
        if self.players.len() >= self.max_players {
            return Err(JoinError::Full);
        }
        let player_id = format!("player_{}", self.next_player_seq);
        self.next_player_seq += 1;
        let spawn = self.maze.spawn_point(self.players.len());
        self.players.insert(
            player_id.clone(),
            Player {
                name: sanitize_name(name),
                position: spawn,
                direction: Direction::Right,
                score: 0,
                lives: STARTING_LIVES,
                powered: false,
                power_until_ms: 0,
            },
        );
        if self.status == GameStatus::Waiting && self.players.len() >= MIN_PLAYERS_TO_START {
            self.status = GameStatus::Ready;
        }
        Ok(player_id)
    }

    /// Removes a player. A running or ready game falls back to waiting when
    /// the head count drops below the start threshold.
    pub fn leave(&mut self, player_id: &str) -> bool {
        let removed = self.players.remove(player_id).is_some();
        if removed
            && matches!(self.status, GameStatus::Ready | GameStatus::Playing)
            && self.players.len() < MIN_PLAYERS_TO_START
        {
            self.status = GameStatus::Waiting;
        }
        removed
    }

    /// Starts the match. Only a joined player may start, and only from the
    /// ready state.
    pub fn request_start(&mut self, player_id: &str) -> bool {
        if self.status == GameStatus::Ready && self.players.contains_key(player_id) {
            self.status = GameStatus::Playing;
            true
        } else {
            false
        }
    }

    /// Advances the world by one tick of `dt_ms` milliseconds, applying the
    /// queued actions first. Outside the playing state this is a no-op and
    /// the queued actions are discarded.
    pub fn step(&mut self, actions: Vec<PlayerAction>, dt_ms: u64) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.elapsed_ms += dt_ms;
        for action in actions {
            self.apply_action(action);
        }
        self.advance_timers(dt_ms);
        self.expire_power();
        self.update_ghosts();
        self.resolve_collisions();
        self.check_game_over();
    }

    fn apply_action(&mut self, action: PlayerAction) {
        let PlayerAction::Move {
            player_id,
            direction,
            position,
        } = action;
        let Some(player) = self.players.get_mut(&player_id) else {
            return;
        };
        // Destination must be in bounds and off the walls; anything else is
        // dropped without a reply.
        if !self.maze.is_walkable(position) {
            return;
        }
        player.direction = direction;
        player.position = position;

        let mut powered_up = false;
        if let Some(item) = self.collectibles.get_mut(&position) {
            if !item.collected {
                item.collected = true;
                player.score += item.points;
                if item.kind == CollectibleKind::Power {
                    player.powered = true;
                    player.power_until_ms = self.elapsed_ms + POWER_DURATION_MS;
                    powered_up = true;
                }
            }
        }
        if powered_up {
            self.enter_frightened();
        }
    }

    fn enter_frightened(&mut self) {
        self.mode = GhostMode::Frightened;
        self.frightened_timer_ms = 0;
        for ghost in &mut self.ghosts {
            ghost.frightened = true;
            if !ghost.eaten {
                ghost.mode = GhostMode::Frightened;
            }
        }
    }

    fn advance_timers(&mut self, dt_ms: u64) {
        if self.mode == GhostMode::Frightened {
            // Frightened pauses the scatter/chase alternation; when it ends
            // the alternation restarts from scatter with a fresh timer.
            self.frightened_timer_ms += dt_ms;
            if self.frightened_timer_ms >= FRIGHTENED_DURATION_MS {
                self.frightened_timer_ms = 0;
                self.mode_timer_ms = 0;
                self.mode = GhostMode::Scatter;
                for ghost in &mut self.ghosts {
                    ghost.frightened = false;
                    if !ghost.eaten {
                        ghost.mode = GhostMode::Scatter;
                    }
                }
            }
        } else {
            self.mode_timer_ms += dt_ms;
            if self.mode_timer_ms >= MODE_SWITCH_MS {
                self.mode_timer_ms = 0;
                self.mode = match self.mode {
                    GhostMode::Scatter => GhostMode::Chase,
                    _ => GhostMode::Scatter,
                };
                for ghost in &mut self.ghosts {
                    if !ghost.eaten {
                        ghost.mode = self.mode;
                    }
                }
            }
        }
    }

    fn expire_power(&mut self) {
        for player in self.players.values_mut() {
            if player.powered && self.elapsed_ms >= player.power_until_ms {
                player.powered = false;
            }
        }
    }

    fn update_ghosts(&mut self) {
        let player_cells: Vec<Cell> = self.players.values().map(|p| p.position).collect();
        for ghost in &mut self.ghosts {
            if ghost.eaten {
                continue;
            }
            let direction = match ghost.mode {
                GhostMode::Frightened => {
                    ghost.target = None;
                    self.rng.direction()
                }
                GhostMode::Scatter => {
                    let corner = self.maze.scatter_corner(ghost.name);
                    ghost.target = Some(corner);
                    greedy_direction(ghost.position, corner)
                }
                GhostMode::Chase => match nearest_cell(ghost.position, &player_cells) {
                    Some(prey) => {
                        ghost.target = Some(prey);
                        greedy_direction(ghost.position, prey)
                    }
                    None => {
                        ghost.target = None;
                        continue;
                    }
                },
            };
            // Direction commits even when the step is blocked by a wall.
            ghost.direction = direction;
            let next = direction.step_from(ghost.position);
            if self.maze.is_walkable(next) {
                ghost.position = next;
            }
        }
    }

    fn resolve_collisions(&mut self) {
        let respawn = self.maze.spawn_point(0);
        for player in self.players.values_mut() {
            for ghost in &mut self.ghosts {
                if ghost.eaten || ghost.position != player.position {
                    continue;
                }
                if ghost.frightened {
                    ghost.eaten = true;
                    ghost.frightened = false;
                    player.score += GHOST_POINTS;
                } else if !player.powered {
                    player.lives = (player.lives - 1).max(0);
                    player.position = respawn;
                }
            }
        }
    }

    fn check_game_over(&mut self) {
        if self.players.is_empty() {
            return;
        }
        let all_dead = self.players.values().all(|p| p.lives == 0);
        let all_collected = self.collectibles.values().all(|c| c.collected);
        if all_dead || all_collected {
            self.status = GameStatus::Stopped;
        }
    }

    pub fn snapshot(&self) -> GameStateView {
        let players = self
            .players
            .iter()
            .map(|(id, p)| {
                (
                    id.clone(),
                    PlayerView {
                        name: p.name.clone(),
                        position: p.position,
                        direction: p.direction,
                        score: p.score,
                        lives: p.lives,
                        powered: p.powered,
                    },
                )
            })
            .collect();
        let ghosts = self
            .ghosts
            .iter()
            .map(|g| {
                (
                    g.name,
                    GhostView {
                        position: g.position,
                        direction: g.direction,
                        mode: g.mode,
                        frightened: g.frightened,
                        eaten: g.eaten,
                        target: g.target,
                    },
                )
            })
            .collect();
        let collectibles = self
            .collectibles
            .iter()
            .map(|(&(row, col), c)| {
                (
                    format!("{row},{col}"),
                    CollectibleView {
                        kind: c.kind,
                        points: c.points,
                        collected: c.collected,
                    },
                )
            })
            .collect();
        GameStateView {
            players,
            ghosts,
            collectibles,
            game_status: self.status,
            level: self.level,
        }
    }
}

fn sanitize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "Player".to_string();
    }
    trimmed.chars().take(MAX_NAME_LEN).collect()
}

/// One-step direction toward `to`, greedy along the dominant axis. Ties go
/// to the row axis.
fn greedy_direction(from: Cell, to: Cell) -> Direction {
    let row_diff = to.0 - from.0;
    let col_diff = to.1 - from.1;
    if row_diff.abs() >= col_diff.abs() {
        if row_diff >= 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    } else if col_diff >= 0 {
        Direction::Right
    } else {
        Direction::Left
    }
}

/// Closest cell by squared euclidean distance; the first candidate wins ties.
fn nearest_cell(from: Cell, cells: &[Cell]) -> Option<Cell> {
    let mut best: Option<(i64, Cell)> = None;
    for &cell in cells {
        let dr = (cell.0 - from.0) as i64;
        let dc = (cell.1 - from.1) as i64;
        let dist = dr * dr + dc * dc;
        match best {
            Some((shortest, _)) if dist >= shortest => {}
            _ => best = Some((dist, cell)),
        }
    }
    best.map(|(_, cell)| cell)
}
