//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::grid::Direction;

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Queue one step for the player. Bounds are checked at tick
    /// resolution, not here.
    Move { direction: Direction },

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },

    /// Enter the world. Synthesized by the connection handler on upgrade,
    /// never accepted from the wire.
    Join { name: String },

    /// Leave the world. Synthesized on disconnect.
    Leave,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMsg {
    /// Welcome message after connection
    Welcome { user_id: Uuid, server_time: u64 },

    /// Per-player view of the world (sent at regular intervals).
    /// `surroundings` is nine terrain codes, the 3x3 neighborhood around
    /// the player, row-major with the north row first.
    WorldUpdate {
        user_id: Uuid,
        /// Server tick number
        tick: u64,
        surroundings: String,
    },

    /// A player joined the world
    PlayerJoined { user_id: Uuid, name: String },

    /// A player left the world
    PlayerLeft { user_id: Uuid, reason: String },

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },

    /// Error message
    Error { code: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_intent_parses_from_wire_shape() {
        let msg: ClientMsg =
            serde_json::from_str(r#"{"action":"move","direction":"north"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMsg::Move {
                direction: Direction::North
            }
        ));
    }

    #[test]
    fn unknown_direction_is_rejected_at_parse() {
        let result =
            serde_json::from_str::<ClientMsg>(r#"{"action":"move","direction":"up"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_action_is_rejected_at_parse() {
        let result = serde_json::from_str::<ClientMsg>(r#"{"action":"teleport"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn ping_parses_with_timestamp() {
        let msg: ClientMsg = serde_json::from_str(r#"{"action":"ping","t":123}"#).unwrap();
        assert!(matches!(msg, ClientMsg::Ping { t: 123 }));
    }

    #[test]
    fn world_update_serializes_with_kebab_tag() {
        let msg = ServerMsg::WorldUpdate {
            user_id: Uuid::nil(),
            tick: 7,
            surroundings: "vvvv  v  ".to_string(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "world-update");
        assert_eq!(json["tick"], 7);
        assert_eq!(json["surroundings"], "vvvv  v  ");
    }

    #[test]
    fn lifecycle_messages_round_trip() {
        let msg = ServerMsg::PlayerLeft {
            user_id: Uuid::new_v4(),
            reason: "disconnected".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"player-left""#));
        let back: ServerMsg = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, ServerMsg::PlayerLeft { .. }));
    }
}
