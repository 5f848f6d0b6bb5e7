//! Bot decision-making (§4.5): for each phase, works out which bot-controlled
//! seats currently have a pending decision and what they'd send. Pure aside
//! from the injected RNG, so the delay/re-enqueue timing in `room.rs` can be
//! tested separately from the decisions themselves.

use liap_types::action::ClientMessage;
use liap_types::game::Game;
use liap_types::ids::PlayerId;
use liap_types::phase::{DeclarationData, PhaseData};
use liap_types::player::Player;

use liap_ai::context::DeclarationContext;
use liap_ai::{declare, play, redeal};

pub struct DueAction {
    pub player_id: PlayerId,
    pub message: ClientMessage,
}

/// Every bot-seat decision the current phase has waiting, in no particular
/// priority order — `room.rs` staggers their submission with its own delay.
pub fn due_actions(game: &Game, rng: &mut impl rand::Rng) -> Vec<DueAction> {
    match &game.phase {
        PhaseData::Preparation(data) => data
            .weak_players
            .iter()
            .filter(|id| !data.decisions.contains_key(id))
            .filter_map(|id| game.player_by_id(id))
            .filter(|p| p.is_bot)
            .map(|p| {
                let lead = score_lead(game, p);
                let accept = redeal::decide_redeal(&p.hand, lead, rng.random());
                DueAction { player_id: p.id.clone(), message: ClientMessage::RedealDecision { accept } }
            })
            .collect(),

        PhaseData::Declaration(data) => match data.current_declarer().and_then(|id| game.player_by_id(id)) {
            Some(player) if player.is_bot => {
                let ctx = declaration_context(game, data, player);
                let value = declare::declare_decision(&player.hand, &ctx);
                vec![DueAction { player_id: player.id.clone(), message: ClientMessage::Declare { value } }]
            }
            _ => Vec::new(),
        },

        PhaseData::Turn(data) => {
            let expected = if data.plays.is_empty() { data.starter.clone() } else { data.pending.first().cloned() };
            match expected.and_then(|id| game.player_by_id(&id)) {
                Some(player) if player.is_bot => {
                    let piece_indices = play::choose_play(&player.hand, data.required_count);
                    vec![DueAction { player_id: player.id.clone(), message: ClientMessage::Play { piece_indices } }]
                }
                _ => Vec::new(),
            }
        }

        PhaseData::Waiting | PhaseData::Scoring | PhaseData::GameOver { .. } => Vec::new(),
    }
}

fn declaration_context(game: &Game, data: &DeclarationData, player: &Player) -> DeclarationContext {
    let previous_declarations = data.order[..data.current_index]
        .iter()
        .filter_map(|id| game.player_by_id(id))
        .filter_map(|p| p.declared)
        .collect();

    DeclarationContext {
        position: data.current_index,
        previous_declarations,
        must_declare_nonzero: player.must_declare_nonzero(),
        redeal_multiplier: game.redeal_multiplier,
        own_score: player.score,
        opponent_scores: game.players.iter().filter(|p| p.id != player.id).map(|p| p.score).collect(),
    }
}

fn score_lead(game: &Game, player: &Player) -> i32 {
    let best_opponent = game.players.iter().filter(|p| p.id != player.id).map(|p| p.score).max().unwrap_or(0);
    player.score - best_opponent
}

#[cfg(test)]
mod tests {
    use super::*;
    use liap_types::phase::PreparationData;

    fn four_players() -> Vec<Player> {
        (0..4)
            .map(|seat| {
                let mut p = Player::new(PlayerId::from(format!("p{seat}")), format!("P{seat}"), seat, seat != 0);
                p.is_bot = seat != 0;
                p
            })
            .collect()
    }

    #[test]
    fn only_undecided_bot_weak_players_get_a_due_action() {
        let mut players = four_players();
        players[1].hand.truncate(2);
        players[2].hand.truncate(2);
        let bot1 = players[1].id.clone();
        let bot2 = players[2].id.clone();
        let mut game = Game::new(players, 1);
        game.phase = PhaseData::Preparation(PreparationData {
            weak_players: vec![bot1.clone(), bot2.clone()],
            decisions: Default::default(),
        });

        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let due = due_actions(&game, &mut rng);
        let ids: Vec<&PlayerId> = due.iter().map(|d| &d.player_id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&&bot1));
        assert!(ids.contains(&&bot2));
    }

    #[test]
    fn human_declarer_is_not_scheduled() {
        let players = four_players();
        let mut game = Game::new(players, 1);
        game.phase = PhaseData::Declaration(DeclarationData {
            order: game.players.iter().map(|p| p.id.clone()).collect(),
            current_index: 0,
        });
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        assert!(due_actions(&game, &mut rng).is_empty());
    }

    #[test]
    fn bot_declarer_gets_a_due_action() {
        let players = four_players();
        let mut game = Game::new(players, 1);
        game.phase = PhaseData::Declaration(DeclarationData {
            order: game.players.iter().map(|p| p.id.clone()).collect(),
            current_index: 1,
        });
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        let due = due_actions(&game, &mut rng);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].player_id, game.players[1].id);
        assert!(matches!(due[0].message, ClientMessage::Declare { .. }));
    }
}
