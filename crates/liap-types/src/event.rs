//! Outbound wire messages (§6) — the broadcast and targeted events the room
//! layer produces. Same `{event, data}` wire shape as `ClientMessage`.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;
use crate::phase::{PhaseData, PhaseTag};
use crate::piece::Piece;

/// The sanitized, publicly-visible slice of one player — no hand contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
    pub seat: u8,
    pub is_bot: bool,
    pub connected: bool,
    pub score: i32,
    pub declared: Option<u8>,
    pub captured_piles: u32,
    pub hand_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerScoreLine {
    pub player: PlayerId,
    pub declared: u8,
    pub captured: u32,
    pub round_score: i32,
    pub total_score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    RoomListUpdate { rooms: Vec<RoomSummary> },
    RoomUpdate { room_id: String, players: Vec<PlayerPublic>, host: PlayerId },
    RoomClosed { room_id: String, reason: String },

    PlayerJoined { player: PlayerPublic },
    PlayerLeft { player_id: PlayerId },
    PlayerDisconnected { player_name: String, can_reconnect: bool, is_bot: bool },
    PlayerReconnected { player_name: String },
    HostChanged { old_host: PlayerId, new_host: PlayerId },

    PhaseChange {
        phase: PhaseTag,
        round_number: u32,
        turn_number: u32,
        phase_data: PhaseData,
        players_public: Vec<PlayerPublic>,
        #[serde(skip_serializing_if = "Option::is_none")]
        my_hand: Option<Vec<Piece>>,
        version: u64,
        checksum: u64,
    },
    TurnResolved {
        turn_number: u32,
        winner: PlayerId,
        pieces_won: u32,
        version: u64,
    },
    RoundComplete {
        round_number: u32,
        scores: Vec<PlayerScoreLine>,
        version: u64,
    },
    ScoreUpdate {
        scores: Vec<PlayerScoreLine>,
        version: u64,
    },
    GameOver {
        winner: PlayerId,
        final_scores: Vec<PlayerScoreLine>,
    },
    QueuedMessages { messages: Vec<ServerMessage> },
    Error { code: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: String,
    pub occupied_seats: u8,
    pub in_progress: bool,
}

/// Whether a given event must be queued for a disconnected player (§4.6).
pub fn is_critical(msg: &ServerMessage) -> bool {
    matches!(
        msg,
        ServerMessage::PhaseChange { .. }
            | ServerMessage::TurnResolved { .. }
            | ServerMessage::RoundComplete { .. }
            | ServerMessage::ScoreUpdate { .. }
            | ServerMessage::GameOver { .. }
            | ServerMessage::HostChanged { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_event_wire_shape() {
        let msg = ServerMessage::Error { code: "validation".into(), message: "bad play".into() };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], "error");
        assert_eq!(json["data"]["code"], "validation");
    }

    #[test]
    fn critical_events_classified_per_spec() {
        let phase_change = ServerMessage::PhaseChange {
            phase: PhaseTag::Turn,
            round_number: 1,
            turn_number: 1,
            phase_data: PhaseData::Turn(Default::default()),
            players_public: vec![],
            my_hand: None,
            version: 1,
            checksum: 0,
        };
        assert!(is_critical(&phase_change));
        assert!(!is_critical(&ServerMessage::RoomListUpdate { rooms: vec![] }));
    }
}
