//! DECLARATION phase (§4.4): seated players declare a pile count in turn
//! order, with two carried-over constraints: a player with two zero
//! declarations in a row must declare nonzero, and the last declarer may
//! not make the declared total equal 8.

use liap_types::game::Game;
use liap_types::ids::PlayerId;
use liap_types::phase::{DeclarationData, PhaseData};

use crate::errors::ActionError;
use crate::phases::turn;

pub fn initial_data(game: &Game) -> DeclarationData {
    let order = game
        .seat_order_from(game.round_starter)
        .into_iter()
        .map(|seat| game.player_id_at_seat(seat))
        .collect();
    DeclarationData { order, current_index: 0 }
}

/// The one value the current declarer may not pick, if they're last and
/// picking it would bring the declared total to exactly 8.
pub fn forbidden_value(game: &Game, data: &DeclarationData) -> Option<u8> {
    if !data.is_last_declarer() {
        return None;
    }
    let sum = game.sum_declared();
    (sum <= 8).then_some((8 - sum) as u8)
}

pub fn handle_declare(game: &mut Game, player_id: &PlayerId, value: u8) -> Result<(), ActionError> {
    if value > 8 {
        return Err(ActionError::InvalidDeclareValue { value });
    }

    let data = match &game.phase {
        PhaseData::Declaration(d) => d.clone(),
        _ => return Err(ActionError::WrongPhase { expected: "declaration" }),
    };
    let current = data
        .current_declarer()
        .cloned()
        .ok_or(ActionError::WrongPhase { expected: "declaration" })?;
    if &current != player_id {
        return Err(ActionError::NotYourTurn { expected: current });
    }

    let player = game.player_by_id(player_id).ok_or(ActionError::UnknownPlayer)?;
    if player.must_declare_nonzero() && value == 0 {
        return Err(ActionError::MustDeclareNonzero);
    }

    if let Some(forbidden) = forbidden_value(game, &data) {
        if value == forbidden {
            return Err(ActionError::ForbiddenDeclareValue { value });
        }
    }

    game.player_by_id_mut(player_id).expect("checked above").record_declaration(value);
    if let PhaseData::Declaration(d) = &mut game.phase {
        d.current_index += 1;
    }
    Ok(())
}

pub fn check_transition(game: &mut Game) -> bool {
    let complete = matches!(&game.phase, PhaseData::Declaration(d) if d.is_complete());
    if complete {
        game.phase = PhaseData::Turn(turn::initial_data(game));
    }
    complete
}
