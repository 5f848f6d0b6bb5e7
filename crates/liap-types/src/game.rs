//! `Game` — the aggregate root, mirroring `mk-types::state::GameState` as the
//! single root struct a state machine mutates.

use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;
use crate::phase::PhaseData;
use crate::player::Player;
use crate::rng::RngState;

pub const MAX_PLAYERS: usize = 4;
pub const WIN_SCORE: i32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub players: Vec<Player>,
    pub round_number: u32,
    pub round_starter: u8,
    pub current_turn_starter: u8,
    pub redeal_multiplier: u32,
    pub phase: PhaseData,

    /// Incremented on every broadcast-worthy mutation; see `liap-room::broadcast`.
    pub version: u64,

    pub rng: RngState,
}

impl Game {
    pub fn new(players: Vec<Player>, seed: u32) -> Self {
        assert_eq!(players.len(), MAX_PLAYERS, "a game seats exactly 4 players");
        Self {
            players,
            round_number: 0,
            round_starter: 0,
            current_turn_starter: 0,
            redeal_multiplier: 1,
            phase: PhaseData::Waiting,
            version: 0,
            rng: RngState::new(seed),
        }
    }

    pub fn player_by_id(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn player_by_id_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    pub fn player_by_seat(&self, seat: u8) -> Option<&Player> {
        self.players.iter().find(|p| p.seat == seat)
    }

    pub fn player_by_seat_mut(&mut self, seat: u8) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.seat == seat)
    }

    /// Seats in clockwise declaration/turn order starting from `seat`.
    pub fn seat_order_from(&self, seat: u8) -> Vec<u8> {
        (0..MAX_PLAYERS as u8).map(|i| (seat + i) % MAX_PLAYERS as u8).collect()
    }

    pub fn player_id_at_seat(&self, seat: u8) -> PlayerId {
        self.player_by_seat(seat)
            .expect("every seat 0..4 is occupied once the game has started")
            .id
            .clone()
    }

    pub fn sum_declared(&self) -> u32 {
        self.players.iter().filter_map(|p| p.declared).map(u32::from).sum()
    }

    pub fn winner(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.score >= WIN_SCORE)
    }

    pub fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }
}
