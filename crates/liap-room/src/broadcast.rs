//! Broadcast hub (§4.6): pure functions turning `Game` state into the
//! `ServerMessage`s players receive. No I/O here — `room.rs` feeds these
//! into `ConnectionManager`.

use liap_types::event::{PlayerPublic, PlayerScoreLine, ServerMessage};
use liap_types::game::Game;
use liap_types::ids::PlayerId;
use liap_types::phase::PhaseData;

pub fn players_public(game: &Game) -> Vec<PlayerPublic> {
    game.players
        .iter()
        .map(|p| PlayerPublic {
            id: p.id.clone(),
            name: p.name.clone(),
            seat: p.seat,
            is_bot: p.is_bot,
            connected: p.connected,
            score: p.score,
            declared: p.declared,
            captured_piles: p.captured_piles,
            hand_count: p.hand.len(),
        })
        .collect()
}

/// A deterministic combination of the fields that must agree across clients,
/// used to catch desync without shipping a full state diff. `PhaseTag`
/// doesn't derive `Hash`, so this folds in its discriminant by hand rather
/// than reaching for `std::hash`.
pub fn checksum(game: &Game) -> u64 {
    let mut acc: u64 = 0xcbf29ce484222325;
    let mut mix = |value: u64| {
        acc ^= value;
        acc = acc.wrapping_mul(0x100000001b3);
    };

    mix(game.version);
    mix(game.round_number as u64);
    mix(game.redeal_multiplier as u64);
    mix(phase_discriminant(&game.phase));
    for player in &game.players {
        mix(player.seat as u64);
        mix(player.score as u64);
        mix(player.declared.unwrap_or(255) as u64);
        mix(player.captured_piles as u64);
        mix(player.hand.len() as u64);
    }
    acc
}

fn phase_discriminant(phase: &PhaseData) -> u64 {
    match phase {
        PhaseData::Waiting => 0,
        PhaseData::Preparation(_) => 1,
        PhaseData::Declaration(_) => 2,
        PhaseData::Turn(_) => 3,
        PhaseData::Scoring => 4,
        PhaseData::GameOver { .. } => 5,
    }
}

fn turn_number(phase: &PhaseData) -> u32 {
    match phase {
        PhaseData::Turn(data) => data.turn_number,
        _ => 0,
    }
}

/// The `PhaseChange` payload for one specific player — `my_hand` is only
/// populated for the player it's addressed to.
pub fn phase_change_for(game: &Game, player_id: &PlayerId) -> ServerMessage {
    let my_hand = game.player_by_id(player_id).map(|p| p.hand.clone());
    ServerMessage::PhaseChange {
        phase: game.phase.tag(),
        round_number: game.round_number,
        turn_number: turn_number(&game.phase),
        phase_data: game.phase.clone(),
        players_public: players_public(game),
        my_hand,
        version: game.version,
        checksum: checksum(game),
    }
}

pub fn turn_resolved_message(game: &Game, turn_number: u32, winner: PlayerId, pieces_won: u32) -> ServerMessage {
    ServerMessage::TurnResolved { turn_number, winner, pieces_won, version: game.version }
}

pub fn round_complete_message(game: &Game, round_number: u32, scores: Vec<PlayerScoreLine>) -> ServerMessage {
    ServerMessage::RoundComplete { round_number, scores, version: game.version }
}

pub fn score_update_message(game: &Game, scores: Vec<PlayerScoreLine>) -> ServerMessage {
    ServerMessage::ScoreUpdate { scores, version: game.version }
}

pub fn game_over_message(winner: PlayerId, final_scores: Vec<PlayerScoreLine>) -> ServerMessage {
    ServerMessage::GameOver { winner, final_scores }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liap_types::ids::PlayerId;
    use liap_types::player::Player;

    fn four_players() -> Vec<Player> {
        (0..4)
            .map(|seat| Player::new(PlayerId::from(format!("p{seat}")), format!("P{seat}"), seat, false))
            .collect()
    }

    #[test]
    fn phase_change_includes_hand_only_for_addressed_player() {
        let mut players = four_players();
        players[0].hand = vec![];
        let game = Game::new(players, 1);
        let target = game.players[0].id.clone();
        let ServerMessage::PhaseChange { my_hand, .. } = phase_change_for(&game, &target) else {
            panic!("wrong variant")
        };
        assert!(my_hand.is_some());
    }

    #[test]
    fn checksum_changes_when_version_bumps() {
        let mut game = Game::new(four_players(), 1);
        let before = checksum(&game);
        game.bump_version();
        let after = checksum(&game);
        assert_ne!(before, after);
    }

    #[test]
    fn checksum_is_stable_for_identical_state() {
        let game = Game::new(four_players(), 1);
        assert_eq!(checksum(&game), checksum(&game));
    }
}
