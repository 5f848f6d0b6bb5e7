//! Round setup: shuffle, deal, weak-hand detection (§4.4 PREPARATION).

use liap_types::game::Game;
use liap_types::ids::PlayerId;
use liap_types::piece::{shuffled_deck, Color, PieceKind};

pub const HAND_SIZE: usize = 8;

/// Deals a fresh 8-piece hand to every player from a freshly shuffled deck,
/// drawn through the game's own seeded RNG so the deal is reproducible given
/// the same seed and draw sequence.
pub fn deal(game: &mut Game) {
    let mut deck = shuffled_deck(&mut game.rng);
    for player in game.players.iter_mut() {
        player.reset_for_new_round();
        player.hand = deck.drain(..HAND_SIZE).collect();
    }
}

/// Players whose hand has no piece above 9 points (see GLOSSARY).
pub fn weak_players(game: &Game) -> Vec<PlayerId> {
    game.players.iter().filter(|p| p.is_weak_hand()).map(|p| p.id.clone()).collect()
}

/// Whoever holds GENERAL_RED, used to assign round 1's starter.
pub fn general_red_holder(game: &Game) -> Option<PlayerId> {
    game.players
        .iter()
        .find(|p| p.hand.iter().any(|piece| piece.kind == PieceKind::General && piece.color == Color::Red))
        .map(|p| p.id.clone())
}
