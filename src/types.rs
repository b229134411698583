use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Grid coordinate as (row, col). Serializes as a two-element array.
pub type Cell = (i32, i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbor of `cell` one step along this direction.
    pub fn step_from(self, cell: Cell) -> Cell {
        let (row, col) = cell;
        match self {
            Self::Up => (row - 1, col),
            Self::Down => (row + 1, col),
            Self::Left => (row, col - 1),
            Self::Right => (row, col + 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostName {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostName {
    pub const ALL: [GhostName; 4] = [Self::Blinky, Self::Pinky, Self::Inky, Self::Clyde];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostMode {
    Scatter,
    Chase,
    Frightened,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Ready,
    Playing,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleKind {
    Dot,
    Power,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub position: Cell,
    pub direction: Direction,
    pub score: i32,
    pub lives: i32,
    pub powered: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GhostView {
    pub position: Cell,
    pub direction: Direction,
    pub mode: GhostMode,
    pub frightened: bool,
    pub eaten: bool,
    pub target: Option<Cell>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectibleView {
    #[serde(rename = "type")]
    pub kind: CollectibleKind,
    pub points: i32,
    pub collected: bool,
}

/// The canonical world snapshot pushed to every client. Built under the
/// server lock, so a snapshot never exposes a mid-tick partial update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStateView {
    pub players: BTreeMap<String, PlayerView>,
    pub ghosts: BTreeMap<GhostName, GhostView>,
    pub collectibles: BTreeMap<String, CollectibleView>,
    pub game_status: GameStatus,
    pub level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Left).unwrap(), r#""left""#);
        let parsed: Direction = serde_json::from_str(r#""up""#).unwrap();
        assert_eq!(parsed, Direction::Up);
    }

    #[test]
    fn step_from_moves_one_cell() {
        assert_eq!(Direction::Up.step_from((5, 5)), (4, 5));
        assert_eq!(Direction::Down.step_from((5, 5)), (6, 5));
        assert_eq!(Direction::Left.step_from((5, 5)), (5, 4));
        assert_eq!(Direction::Right.step_from((5, 5)), (5, 6));
    }

    #[test]
    fn ghost_names_work_as_json_map_keys() {
        let mut ghosts = BTreeMap::new();
        ghosts.insert(
            GhostName::Blinky,
            GhostView {
                position: (7, 10),
                direction: Direction::Up,
                mode: GhostMode::Scatter,
                frightened: false,
                eaten: false,
                target: None,
            },
        );
        let encoded = serde_json::to_string(&ghosts).unwrap();
        assert!(encoded.contains(r#""blinky""#));
        let decoded: BTreeMap<GhostName, GhostView> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, ghosts);
    }

    #[test]
    fn collectible_kind_uses_type_field() {
        let view = CollectibleView {
            kind: CollectibleKind::Power,
            points: 50,
            collected: false,
        };
        let encoded = serde_json::to_string(&view).unwrap();
        assert!(encoded.contains(r#""type":"power""#));
    }
}
