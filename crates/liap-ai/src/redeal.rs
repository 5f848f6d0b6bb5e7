//! Redeal-acceptance heuristic (§4.2, weak-hand decisions).

use liap_types::piece::Piece;

/// Probability (out of 1.0) that a bot accepts a redeal, given its own weak
/// hand and its current point gap over the best opponent.
///
/// * A hand whose strongest piece is very weak (<=9 pts) almost always
///   takes the redeal.
/// * A hand with low total strength (<60 pts across 8 pieces) usually
///   takes it.
/// * Otherwise a redeal is taken only occasionally, since it doubles the
///   round's score multiplier for every player, not just the requester.
/// * A bot already leading by 10+ points declines outright: doubling the
///   multiplier mostly helps whoever is behind.
pub fn accept_probability(hand: &[Piece], score_lead: i32) -> f64 {
    if score_lead >= 10 {
        return 0.0;
    }

    let max_points = hand.iter().map(|p| p.points).max().unwrap_or(0);
    let total_points: u32 = hand.iter().map(|p| p.points as u32).sum();

    if max_points <= 9 {
        0.8
    } else if total_points < 60 {
        0.6
    } else {
        0.3
    }
}

/// Deterministic accept/decline given a `[0, 1)` random draw (the caller
/// supplies the draw so this stays pure and testable).
pub fn decide_redeal(hand: &[Piece], score_lead: i32, roll: f64) -> bool {
    roll < accept_probability(hand, score_lead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use liap_types::piece::{Color, PieceKind};

    fn weak_hand() -> Vec<Piece> {
        (0..8).map(|_| Piece::new(PieceKind::Soldier, Color::Black)).collect()
    }

    fn strong_hand() -> Vec<Piece> {
        vec![
            Piece::new(PieceKind::General, Color::Red),
            Piece::new(PieceKind::General, Color::Black),
            Piece::new(PieceKind::Advisor, Color::Red),
            Piece::new(PieceKind::Advisor, Color::Black),
            Piece::new(PieceKind::Elephant, Color::Red),
            Piece::new(PieceKind::Elephant, Color::Black),
            Piece::new(PieceKind::Chariot, Color::Red),
            Piece::new(PieceKind::Chariot, Color::Black),
        ]
    }

    #[test]
    fn weak_hand_almost_always_accepts() {
        assert_eq!(accept_probability(&weak_hand(), 0), 0.8);
    }

    #[test]
    fn big_lead_always_declines() {
        assert_eq!(accept_probability(&strong_hand(), 10), 0.0);
        assert!(!decide_redeal(&strong_hand(), 15, 0.0));
    }

    #[test]
    fn strong_hand_rarely_accepts() {
        assert_eq!(accept_probability(&strong_hand(), 0), 0.3);
    }

    #[test]
    fn roll_below_probability_accepts() {
        assert!(decide_redeal(&weak_hand(), 0, 0.1));
        assert!(!decide_redeal(&weak_hand(), 0, 0.95));
    }
}
