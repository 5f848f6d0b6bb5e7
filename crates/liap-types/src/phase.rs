//! The phase tag plus each phase's auxiliary state (§4.4).
//!
//! A tagged union rather than a class hierarchy with virtual `on_enter`/
//! `handle_action` methods — the dispatch table lives in `liap-engine`, this
//! crate only holds the data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;
use crate::piece::Piece;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTag {
    Waiting,
    Preparation,
    Declaration,
    Turn,
    Scoring,
    GameOver,
}

/// A pending redeal decision from one weak-handed player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedealDecision {
    Accept,
    Decline,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreparationData {
    /// Seats with a weak hand, awaiting a decision.
    pub weak_players: Vec<PlayerId>,
    /// Decisions received so far, in arrival order.
    pub decisions: BTreeMap<PlayerId, RedealDecision>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationData {
    /// Seats in declaration order, starting from the round starter.
    pub order: Vec<PlayerId>,
    /// Index into `order` of the player who must declare next.
    pub current_index: usize,
}

impl DeclarationData {
    pub fn current_declarer(&self) -> Option<&PlayerId> {
        self.order.get(self.current_index)
    }

    pub fn is_last_declarer(&self) -> bool {
        self.current_index + 1 == self.order.len()
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.order.len()
    }
}

/// One player's play within the current turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnPlay {
    pub player: PlayerId,
    pub pieces: Vec<Piece>,
    pub order: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnData {
    pub turn_number: u32,
    pub starter: Option<PlayerId>,
    /// Set once the starter plays; every follower must match it.
    pub required_count: Option<usize>,
    pub plays: Vec<TurnPlay>,
    /// Seats still expected to play this turn, in seat order starting after
    /// the starter.
    pub pending: Vec<PlayerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PhaseData {
    Waiting,
    Preparation(PreparationData),
    Declaration(DeclarationData),
    Turn(TurnData),
    Scoring,
    GameOver { winner: PlayerId },
}

impl PhaseData {
    pub fn tag(&self) -> PhaseTag {
        match self {
            PhaseData::Waiting => PhaseTag::Waiting,
            PhaseData::Preparation(_) => PhaseTag::Preparation,
            PhaseData::Declaration(_) => PhaseTag::Declaration,
            PhaseData::Turn(_) => PhaseTag::Turn,
            PhaseData::Scoring => PhaseTag::Scoring,
            PhaseData::GameOver { .. } => PhaseTag::GameOver,
        }
    }
}
