pub const TICK_RATE: u32 = 60;
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;
pub const BROADCAST_RATE: u32 = 30;
pub const BROADCAST_MS: u64 = 1000 / BROADCAST_RATE as u64;

pub const MODE_SWITCH_MS: u64 = 7_000;
pub const FRIGHTENED_DURATION_MS: u64 = 10_000;
pub const POWER_DURATION_MS: u64 = 10_000;

pub const DOT_POINTS: i32 = 10;
pub const POWER_POINTS: i32 = 50;
pub const GHOST_POINTS: i32 = 200;

pub const STARTING_LIVES: i32 = 3;
pub const MIN_PLAYERS_TO_START: usize = 2;
pub const DEFAULT_MAX_PLAYERS: usize = 4;
pub const DEFAULT_PORT: u16 = 55_000;
pub const MAX_NAME_LEN: usize = 16;

pub const OUTBOUND_QUEUE_DEPTH: usize = 64;
