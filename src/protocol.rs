//! Wire protocol: newline-delimited JSON, one self-describing object per
//! line, dispatched on the `action` discriminator. Framing is handled by the
//! connection layer buffering up to each `\n`, so a message split across
//! reads or several messages coalesced into one read both decode correctly.

use serde::{Deserialize, Serialize};

use crate::types::{Cell, Direction, GameStateView};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    Join {
        player_name: String,
    },
    Move {
        player_id: String,
        direction: Direction,
        position: Cell,
    },
    StartGame {
        player_id: String,
    },
    Disconnect {
        player_id: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ServerMessage {
    JoinSuccess {
        player_id: String,
        game_state: GameStateView,
    },
    Error {
        message: String,
    },
    GameStateUpdate {
        game_state: GameStateView,
    },
}

pub fn decode_client_message(raw: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Serializes one server message as a single frame, newline terminator
/// included.
pub fn encode_frame(message: &ServerMessage) -> String {
    let mut frame =
        serde_json::to_string(message).expect("server messages always serialize");
    frame.push('\n');
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_join_message() {
        let parsed =
            decode_client_message(r#"{"action":"join","player_name":"Alice"}"#).unwrap();
        assert_eq!(
            parsed,
            ClientMessage::Join {
                player_name: "Alice".to_string()
            }
        );
    }

    #[test]
    fn decode_move_message() {
        let parsed = decode_client_message(
            r#"{"action":"move","player_id":"player_1","direction":"left","position":[3,2]}"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            ClientMessage::Move {
                player_id: "player_1".to_string(),
                direction: Direction::Left,
                position: (3, 2),
            }
        );
    }

    #[test]
    fn decode_rejects_unknown_action() {
        assert!(decode_client_message(r#"{"action":"dance","player_id":"p"}"#).is_err());
    }

    #[test]
    fn decode_rejects_missing_fields() {
        assert!(decode_client_message(r#"{"action":"move","player_id":"p"}"#).is_err());
    }

    #[test]
    fn decode_rejects_invalid_direction() {
        let raw =
            r#"{"action":"move","player_id":"p","direction":"diagonal","position":[1,1]}"#;
        assert!(decode_client_message(raw).is_err());
    }

    #[test]
    fn decode_rejects_malformed_json() {
        assert!(decode_client_message("{not json").is_err());
    }

    #[test]
    fn encode_frame_is_newline_terminated() {
        let frame = encode_frame(&ServerMessage::Error {
            message: "Game is full".to_string(),
        });
        assert!(frame.ends_with('\n'));
        assert!(!frame[..frame.len() - 1].contains('\n'));
        assert!(frame.contains(r#""action":"error""#));
    }

    #[test]
    fn server_message_tags_match_wire_contract() {
        let err = encode_frame(&ServerMessage::Error {
            message: "m".to_string(),
        });
        assert!(err.contains(r#""action":"error""#));

        let game_state = GameStateView {
            players: Default::default(),
            ghosts: Default::default(),
            collectibles: Default::default(),
            game_status: crate::types::GameStatus::Waiting,
            level: 1,
        };
        let join = encode_frame(&ServerMessage::JoinSuccess {
            player_id: "player_1".to_string(),
            game_state: game_state.clone(),
        });
        assert!(join.contains(r#""action":"join_success""#));
        let update = encode_frame(&ServerMessage::GameStateUpdate { game_state });
        assert!(update.contains(r#""action":"game_state_update""#));
    }

    #[test]
    fn client_message_round_trips() {
        let original = ClientMessage::StartGame {
            player_id: "player_2".to_string(),
        };
        let encoded = serde_json::to_string(&original).unwrap();
        assert!(encoded.contains(r#""action":"start_game""#));
        let decoded = decode_client_message(&encoded).unwrap();
        assert_eq!(decoded, original);
    }
}
