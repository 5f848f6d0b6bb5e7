//! Inbound wire messages (§6). Matches the spec's own wire shape —
//! `{event: <string>, data: <object>}` — via serde's internally-tagged
//! representation with a separate content field.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateRoom,
    JoinRoom { room_id: String, player_name: String },
    LeaveRoom,
    LeaveGame,
    AddBot { slot: u8 },
    RemovePlayer { player_id: PlayerId },
    StartGame,
    Declare { value: u8 },
    Play { piece_indices: Vec<usize> },
    RequestRedeal,
    AcceptRedeal,
    DeclineRedeal,
    RedealDecision { accept: bool },
    ClientReady { player_name: String },
    Ping,
    Ack,
    SyncRequest,
}

impl ClientMessage {
    /// Discriminant name, used as part of the action-queue dedup key
    /// (§4.3) — distinct from the payload so two `Declare`s with different
    /// values still collide within the dedup window, matching "identical
    /// (player_id, action_type, relevant-state-hash)".
    pub fn action_type(&self) -> &'static str {
        match self {
            ClientMessage::CreateRoom => "create_room",
            ClientMessage::JoinRoom { .. } => "join_room",
            ClientMessage::LeaveRoom => "leave_room",
            ClientMessage::LeaveGame => "leave_game",
            ClientMessage::AddBot { .. } => "add_bot",
            ClientMessage::RemovePlayer { .. } => "remove_player",
            ClientMessage::StartGame => "start_game",
            ClientMessage::Declare { .. } => "declare",
            ClientMessage::Play { .. } => "play",
            ClientMessage::RequestRedeal => "request_redeal",
            ClientMessage::AcceptRedeal => "accept_redeal",
            ClientMessage::DeclineRedeal => "decline_redeal",
            ClientMessage::RedealDecision { .. } => "redeal_decision",
            ClientMessage::ClientReady { .. } => "client_ready",
            ClientMessage::Ping => "ping",
            ClientMessage::Ack => "ack",
            ClientMessage::SyncRequest => "sync_request",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_event_and_data() {
        let msg = ClientMessage::Declare { value: 3 };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], "declare");
        assert_eq!(json["data"]["value"], 3);
    }

    #[test]
    fn unit_variants_round_trip() {
        let msg = ClientMessage::StartGame;
        let json = serde_json::to_string(&msg).unwrap();
        let back: ClientMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.action_type(), "start_game");
    }
}
