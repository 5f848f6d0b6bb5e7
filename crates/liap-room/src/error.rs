//! Orchestration-layer errors (§7.1): `thiserror`-derived, unlike
//! `liap-engine::ActionError` which stays a plain enum since it never
//! crosses a process boundary. These do — they become `ServerMessage::Error`
//! at the actor boundary in `room.rs`.

use liap_types::ids::{PlayerId, RoomId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("room {0} does not exist")]
    NotFound(RoomId),
    #[error("room {0} is full")]
    RoomFull(RoomId),
    #[error("name {0:?} is already taken in this room")]
    NameTaken(String),
    #[error("only the host can do that")]
    NotHost,
    #[error("the game has already started")]
    AlreadyStarted,
    #[error("not enough players to start")]
    NotEnoughPlayers,
    #[error("no player {0} in this room")]
    UnknownPlayer(PlayerId),
}

impl RoomError {
    pub fn code(&self) -> &'static str {
        match self {
            RoomError::NotFound(_) => "room_not_found",
            RoomError::RoomFull(_) => "room_full",
            RoomError::NameTaken(_) => "name_taken",
            RoomError::NotHost => "not_host",
            RoomError::AlreadyStarted => "already_started",
            RoomError::NotEnoughPlayers => "not_enough_players",
            RoomError::UnknownPlayer(_) => "unknown_player",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    MalformedJson(String),
    #[error("unexpected message for the current state")]
    UnexpectedMessage,
}

impl ProtocolError {
    pub fn code(&self) -> &'static str {
        match self {
            ProtocolError::MalformedJson(_) => "malformed_json",
            ProtocolError::UnexpectedMessage => "unexpected_message",
        }
    }
}
