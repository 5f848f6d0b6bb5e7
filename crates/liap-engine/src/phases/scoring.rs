//! SCORING phase (§4.4): a single-tick phase with no player action — it
//! applies this round's score to every player, then decides whether the
//! next round starts or the game is over.

use liap_types::event::PlayerScoreLine;
use liap_types::game::Game;
use liap_types::phase::PhaseData;

use liap_rules::score::final_round_score;

use crate::machine::RoundComplete;
use crate::phases::preparation;

/// Applies this round's score to every player and marks the phase SCORING.
/// Declared/captured values are still intact at this point; `check_transition`
/// resets them after building the round-complete summary.
pub fn enter(game: &mut Game) -> PhaseData {
    for player in game.players.iter_mut() {
        let declared = player.declared.unwrap_or(0);
        let round_score = final_round_score(declared, player.captured_piles, game.redeal_multiplier);
        player.score += round_score;
    }
    PhaseData::Scoring
}

fn score_lines(game: &Game) -> Vec<PlayerScoreLine> {
    game.players
        .iter()
        .map(|p| {
            let declared = p.declared.unwrap_or(0);
            let round_score = final_round_score(declared, p.captured_piles, game.redeal_multiplier);
            PlayerScoreLine {
                player: p.id.clone(),
                declared,
                captured: p.captured_piles,
                round_score,
                total_score: p.score,
            }
        })
        .collect()
}

pub fn check_transition(game: &mut Game) -> Option<RoundComplete> {
    if !matches!(game.phase, PhaseData::Scoring) {
        return None;
    }

    let scores = score_lines(game);
    let round_number = game.round_number;

    for player in game.players.iter_mut() {
        player.reset_for_new_round();
    }

    if let Some(winner) = game.winner() {
        let winner_id = winner.id.clone();
        game.phase = PhaseData::GameOver { winner: winner_id };
    } else {
        game.round_number += 1;
        game.redeal_multiplier = 1;
        preparation::enter(game);
    }

    Some(RoundComplete { round_number, scores })
}
