//! PREPARATION phase (§4.4): deal, detect weak hands, collect redeal
//! decisions, and redeal (with an incremented score multiplier) on the
//! first accept in seat order.

use std::collections::BTreeMap;

use liap_types::game::Game;
use liap_types::ids::PlayerId;
use liap_types::phase::{PhaseData, PreparationData, RedealDecision};

use crate::errors::ActionError;
use crate::phases::declaration;
use crate::setup;

/// Deals a fresh round and enters either DECLARATION (no weak hands) or
/// PREPARATION (awaiting redeal decisions). Round 1 additionally assigns
/// the starter to whoever holds GENERAL_RED once the deal is known.
pub fn enter(game: &mut Game) {
    setup::deal(game);

    if game.round_number == 0 {
        if let Some(holder) = setup::general_red_holder(game) {
            let seat = game.player_by_id(&holder).expect("holder is seated").seat;
            game.round_starter = seat;
            game.current_turn_starter = seat;
        }
    }

    let weak = setup::weak_players(game);
    game.phase = if weak.is_empty() {
        PhaseData::Declaration(declaration::initial_data(game))
    } else {
        PhaseData::Preparation(PreparationData { weak_players: weak, decisions: BTreeMap::new() })
    };
}

pub fn handle_redeal_decision(
    game: &mut Game,
    player_id: &PlayerId,
    accept: bool,
) -> Result<(), ActionError> {
    let data = match &mut game.phase {
        PhaseData::Preparation(d) => d,
        _ => return Err(ActionError::WrongPhase { expected: "preparation" }),
    };
    if !data.weak_players.iter().any(|id| id == player_id) {
        return Err(ActionError::NoRedealPending);
    }
    if data.decisions.contains_key(player_id) {
        return Err(ActionError::AlreadyDecided);
    }
    data.decisions.insert(
        player_id.clone(),
        if accept { RedealDecision::Accept } else { RedealDecision::Decline },
    );
    Ok(())
}

/// Re-checked after every decision: redeal on the first (lowest-seat)
/// accept, proceed to DECLARATION once every weak player has declined,
/// otherwise keep waiting.
pub fn check_transition(game: &mut Game) -> bool {
    let data = match &game.phase {
        PhaseData::Preparation(d) => d.clone(),
        _ => return false,
    };

    let mut accepters: Vec<PlayerId> = data
        .weak_players
        .iter()
        .filter(|id| matches!(data.decisions.get(*id), Some(RedealDecision::Accept)))
        .cloned()
        .collect();
    accepters.sort_by_key(|id| game.player_by_id(id).map(|p| p.seat).unwrap_or(u8::MAX));

    if let Some(first) = accepters.first() {
        let seat = game.player_by_id(first).expect("accepter is seated").seat;
        game.redeal_multiplier += 1;
        game.round_starter = seat;
        game.current_turn_starter = seat;
        enter(game);
        return true;
    }

    if data.decisions.len() == data.weak_players.len() {
        game.phase = PhaseData::Declaration(declaration::initial_data(game));
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use liap_types::piece::{Color, Piece, PieceKind};
    use liap_types::player::Player;

    fn four_players() -> Vec<Player> {
        (0..4)
            .map(|seat| Player::new(PlayerId::from(format!("p{seat}")), format!("P{seat}"), seat, false))
            .collect()
    }

    fn weak_hand() -> Vec<Piece> {
        (0..8).map(|_| Piece::new(PieceKind::Soldier, Color::Black)).collect()
    }

    /// S2 — accepting a redeal bumps the multiplier and sets the accepter as
    /// starter, then re-enters weak-hand detection on the fresh deal.
    #[test]
    fn accepting_redeal_bumps_multiplier_and_sets_starter() {
        let mut game = Game::new(four_players(), 42);
        game.players[0].hand = weak_hand();
        let weak_id = game.players[0].id.clone();
        game.phase = PhaseData::Preparation(PreparationData {
            weak_players: vec![weak_id.clone()],
            decisions: BTreeMap::new(),
        });

        handle_redeal_decision(&mut game, &weak_id, true).unwrap();
        assert!(check_transition(&mut game));

        assert_eq!(game.redeal_multiplier, 2);
        assert_eq!(game.round_starter, 0);
    }

    #[test]
    fn declining_all_weak_hands_proceeds_to_declaration() {
        let mut game = Game::new(four_players(), 42);
        game.players[1].hand = weak_hand();
        let weak_id = game.players[1].id.clone();
        game.phase = PhaseData::Preparation(PreparationData {
            weak_players: vec![weak_id.clone()],
            decisions: BTreeMap::new(),
        });

        handle_redeal_decision(&mut game, &weak_id, false).unwrap();
        assert!(check_transition(&mut game));
        assert!(matches!(game.phase, PhaseData::Declaration(_)));
    }

    #[test]
    fn cannot_decide_twice() {
        let mut game = Game::new(four_players(), 42);
        let weak_id = game.players[0].id.clone();
        game.phase = PhaseData::Preparation(PreparationData {
            weak_players: vec![weak_id.clone()],
            decisions: BTreeMap::new(),
        });
        handle_redeal_decision(&mut game, &weak_id, false).unwrap();
        assert_eq!(handle_redeal_decision(&mut game, &weak_id, true), Err(ActionError::AlreadyDecided));
    }

    #[test]
    fn unrelated_player_cannot_decide() {
        let mut game = Game::new(four_players(), 42);
        let weak_id = game.players[0].id.clone();
        let other_id = game.players[1].id.clone();
        game.phase = PhaseData::Preparation(PreparationData {
            weak_players: vec![weak_id],
            decisions: BTreeMap::new(),
        });
        assert_eq!(
            handle_redeal_decision(&mut game, &other_id, true),
            Err(ActionError::NoRedealPending)
        );
    }
}
