//! A seated player and its per-round state.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;
use crate::piece::Piece;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub seat: u8,
    pub is_bot: bool,
    pub connected: bool,
    /// What `is_bot` should revert to on reconnect — see §4.6.
    pub original_is_bot: bool,

    pub score: i32,
    pub hand: Vec<Piece>,
    pub declared: Option<u8>,
    pub captured_piles: u32,
    pub zero_declare_streak: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: String, seat: u8, is_bot: bool) -> Self {
        Self {
            id,
            name,
            seat,
            is_bot,
            connected: !is_bot,
            original_is_bot: is_bot,
            score: 0,
            hand: Vec::new(),
            declared: None,
            captured_piles: 0,
            zero_declare_streak: 0,
        }
    }

    /// Max point value in hand, or 0 for an empty hand.
    pub fn max_piece_points(&self) -> u8 {
        self.hand.iter().map(|p| p.points).max().unwrap_or(0)
    }

    /// A weak hand has no piece above 9 points (see GLOSSARY).
    pub fn is_weak_hand(&self) -> bool {
        self.max_piece_points() <= 9
    }

    /// Reset the fields that don't carry across rounds.
    pub fn reset_for_new_round(&mut self) {
        self.hand.clear();
        self.declared = None;
        self.captured_piles = 0;
    }

    /// Open Question decision (DESIGN.md): reset on any non-zero declaration,
    /// increment only on a declared-0.
    pub fn record_declaration(&mut self, value: u8) {
        self.declared = Some(value);
        if value == 0 {
            self.zero_declare_streak += 1;
        } else {
            self.zero_declare_streak = 0;
        }
    }

    pub fn must_declare_nonzero(&self) -> bool {
        self.zero_declare_streak >= 2
    }

    /// Disconnect: becomes a bot, stashing what it was before.
    pub fn mark_disconnected(&mut self) {
        self.original_is_bot = self.is_bot;
        self.is_bot = true;
        self.connected = false;
    }

    /// Reconnect: restore the pre-disconnect bot flag.
    pub fn mark_reconnected(&mut self) {
        self.is_bot = self.original_is_bot;
        self.connected = true;
    }
}
