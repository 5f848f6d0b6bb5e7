//! TURN phase (§4.4): the starter sets the play type and piece count for
//! the turn, every other seat must match that count, and the turn resolves
//! once all four seats have played.

use liap_types::game::Game;
use liap_types::ids::PlayerId;
use liap_types::phase::{PhaseData, TurnData, TurnPlay};
use liap_types::piece::Piece;

use liap_rules::compare::{winner_of, Candidate};
use liap_rules::play_type::classify;

use crate::errors::ActionError;
use crate::machine::TurnResolved;
use crate::phases::scoring;

pub fn initial_data(game: &Game) -> TurnData {
    let order = game.seat_order_from(game.current_turn_starter);
    TurnData {
        turn_number: 1,
        starter: Some(game.player_id_at_seat(game.current_turn_starter)),
        required_count: None,
        plays: Vec::new(),
        pending: order.into_iter().skip(1).map(|seat| game.player_id_at_seat(seat)).collect(),
    }
}

fn current_expected(data: &TurnData) -> Option<PlayerId> {
    if data.plays.is_empty() {
        data.starter.clone()
    } else {
        data.pending.first().cloned()
    }
}

pub fn handle_play(
    game: &mut Game,
    player_id: &PlayerId,
    piece_indices: &[usize],
) -> Result<(), ActionError> {
    let data = match &game.phase {
        PhaseData::Turn(d) => d.clone(),
        _ => return Err(ActionError::WrongPhase { expected: "turn" }),
    };
    let expected = current_expected(&data).ok_or(ActionError::WrongPhase { expected: "turn" })?;
    if expected != *player_id {
        return Err(ActionError::NotYourTurn { expected });
    }

    let mut sorted = piece_indices.to_vec();
    sorted.sort_unstable();
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            return Err(ActionError::DuplicatePieceIndex { index: pair[0] });
        }
    }

    let player = game.player_by_id(player_id).ok_or(ActionError::UnknownPlayer)?;
    for &i in piece_indices {
        if i >= player.hand.len() {
            return Err(ActionError::UnknownPieceIndex { index: i });
        }
    }

    if let Some(required) = data.required_count {
        if piece_indices.len() != required {
            return Err(ActionError::WrongPieceCount { expected: required, got: piece_indices.len() });
        }
    }

    let pieces: Vec<Piece> = piece_indices.iter().map(|&i| player.hand[i]).collect();
    let is_starter_play = data.plays.is_empty();
    if is_starter_play && classify(&pieces).is_none() {
        return Err(ActionError::InvalidPlayType);
    }

    let mut descending = sorted;
    descending.sort_unstable_by(|a, b| b.cmp(a));
    let player_mut = game.player_by_id_mut(player_id).expect("checked above");
    for &i in &descending {
        player_mut.hand.remove(i);
    }

    let order = data.plays.len() as u32;
    if let PhaseData::Turn(d) = &mut game.phase {
        if d.plays.is_empty() {
            d.required_count = Some(pieces.len());
        }
        d.plays.push(TurnPlay { player: player_id.clone(), pieces, order });
        d.pending.retain(|p| p != player_id);
    }

    Ok(())
}

/// Resolves the turn once every seat has played: scores the winner, starts
/// the next turn, or moves on to SCORING if every hand is now empty.
pub fn check_transition(game: &mut Game) -> Option<TurnResolved> {
    let data = match &game.phase {
        PhaseData::Turn(d) if d.pending.is_empty() && !d.plays.is_empty() => d.clone(),
        _ => return None,
    };

    // Only plays matching the starter's type (always `plays[0]`, the first
    // submission) are eligible to win — a follower who plays a different,
    // even higher-priority type of the same count scores 0 and cannot win
    // (§4.4). If nobody else matches, the starter is the sole eligible play
    // and wins by default.
    let starter_type = classify(&data.plays[0].pieces);
    let eligible: Vec<&TurnPlay> = data.plays.iter().filter(|p| classify(&p.pieces) == starter_type).collect();
    let candidates: Vec<Candidate> = eligible.iter().map(|p| Candidate { pieces: &p.pieces, order: p.order }).collect();
    let winner_index = winner_of(&candidates);
    let winner_id = eligible[winner_index].player.clone();
    let pieces_won = data.plays.iter().map(|p| p.pieces.len() as u32).sum::<u32>();

    game.player_by_id_mut(&winner_id).expect("winner is seated").captured_piles += pieces_won;
    let winner_seat = game.player_by_id(&winner_id).expect("winner is seated").seat;
    game.current_turn_starter = winner_seat;

    let hands_empty = game.players.iter().all(|p| p.hand.is_empty());
    if hands_empty {
        game.phase = scoring::enter(game);
    } else {
        game.phase = PhaseData::Turn(TurnData {
            turn_number: data.turn_number + 1,
            starter: Some(winner_id.clone()),
            required_count: None,
            plays: Vec::new(),
            pending: game
                .seat_order_from(winner_seat)
                .into_iter()
                .skip(1)
                .map(|seat| game.player_id_at_seat(seat))
                .collect(),
        });
    }

    Some(TurnResolved { turn_number: data.turn_number, winner: winner_id, pieces_won })
}

#[cfg(test)]
mod tests {
    use super::*;
    use liap_types::piece::{Color, PieceKind};
    use liap_types::player::Player;

    fn four_players() -> Vec<Player> {
        (0..4)
            .map(|seat| Player::new(PlayerId::from(format!("p{seat}")), format!("P{seat}"), seat, false))
            .collect()
    }

    #[test]
    fn starter_play_must_classify() {
        let mut players = four_players();
        players[0].hand = vec![Piece::new(PieceKind::Chariot, Color::Red), Piece::new(PieceKind::Horse, Color::Black)];
        let mut game = Game::new(players, 1);
        game.phase = PhaseData::Turn(initial_data(&game));

        let starter = game.players[0].id.clone();
        let result = handle_play(&mut game, &starter, &[0, 1]);
        assert_eq!(result, Err(ActionError::InvalidPlayType));
    }

    #[test]
    fn followers_must_match_required_count() {
        let mut players = four_players();
        players[0].hand = vec![Piece::new(PieceKind::Chariot, Color::Black)];
        players[1].hand = vec![
            Piece::new(PieceKind::Horse, Color::Black),
            Piece::new(PieceKind::Horse, Color::Black),
        ];
        let mut game = Game::new(players, 1);
        game.phase = PhaseData::Turn(initial_data(&game));
        let ids: Vec<PlayerId> = game.players.iter().map(|p| p.id.clone()).collect();

        handle_play(&mut game, &ids[0], &[0]).unwrap();
        assert_eq!(
            handle_play(&mut game, &ids[1], &[0, 1]),
            Err(ActionError::WrongPieceCount { expected: 1, got: 2 })
        );
    }

    /// S3-shaped: four singles resolve by priority, then points, then order.
    #[test]
    fn turn_resolves_to_highest_single_with_order_tiebreak() {
        let mut players = four_players();
        players[0].hand = vec![Piece::new(PieceKind::Chariot, Color::Black)];
        players[1].hand = vec![Piece::new(PieceKind::Chariot, Color::Black)];
        players[2].hand = vec![Piece::new(PieceKind::Horse, Color::Black)];
        players[3].hand = vec![Piece::new(PieceKind::Cannon, Color::Black)];
        let mut game = Game::new(players, 1);
        game.phase = PhaseData::Turn(initial_data(&game));
        let ids: Vec<PlayerId> = game.players.iter().map(|p| p.id.clone()).collect();

        handle_play(&mut game, &ids[0], &[0]).unwrap();
        handle_play(&mut game, &ids[1], &[0]).unwrap();
        handle_play(&mut game, &ids[2], &[0]).unwrap();
        handle_play(&mut game, &ids[3], &[0]).unwrap();

        let resolved = check_transition(&mut game).expect("turn is complete");
        assert_eq!(resolved.winner, ids[0]);
        assert_eq!(resolved.pieces_won, 4);
        assert_eq!(game.player_by_id(&ids[0]).unwrap().captured_piles, 4);
        assert!(matches!(game.phase, PhaseData::Scoring));
    }

    /// A follower playing a different, higher-priority type of the same
    /// count never beats the starter's type — starter plays three SOLDIERs
    /// (THREE_OF_A_KIND), a follower plays a three-piece STRAIGHT (higher
    /// priority). The straight is ineligible; the starter still wins.
    #[test]
    fn follower_with_non_matching_higher_priority_type_cannot_win() {
        let mut players = four_players();
        players[0].hand = vec![
            Piece::new(PieceKind::Soldier, Color::Black),
            Piece::new(PieceKind::Soldier, Color::Black),
            Piece::new(PieceKind::Soldier, Color::Black),
        ];
        players[1].hand = vec![
            Piece::new(PieceKind::Chariot, Color::Red),
            Piece::new(PieceKind::Horse, Color::Red),
            Piece::new(PieceKind::Cannon, Color::Red),
        ];
        players[2].hand = vec![Piece::new(PieceKind::Soldier, Color::Red); 3];
        players[3].hand = vec![Piece::new(PieceKind::Soldier, Color::Red); 3];
        let mut game = Game::new(players, 1);
        game.phase = PhaseData::Turn(initial_data(&game));
        let ids: Vec<PlayerId> = game.players.iter().map(|p| p.id.clone()).collect();

        handle_play(&mut game, &ids[0], &[0, 1, 2]).unwrap();
        handle_play(&mut game, &ids[1], &[0, 1, 2]).unwrap();
        handle_play(&mut game, &ids[2], &[0, 1, 2]).unwrap();
        handle_play(&mut game, &ids[3], &[0, 1, 2]).unwrap();

        let resolved = check_transition(&mut game).expect("turn is complete");
        assert_eq!(resolved.winner, ids[0]);
    }
}
