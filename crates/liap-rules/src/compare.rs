//! Play comparison (§4.1): type priority first, then points, then order.

use liap_types::piece::Piece;

use crate::play_type::{classify, PlayType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    First,
    Second,
}

/// A single candidate play: its pieces and the sequence position it was
/// made in (lower `order` = earlier).
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub pieces: &'a [Piece],
    pub order: u32,
}

/// Sum used for same-type comparison. For `ExtendedStraight` and
/// `ExtendedStraight5`, only the three distinct kinds count — duplicated
/// kinds contribute once (they always have the same point value as the
/// other copy, so this is just "sum of distinct-kind point values").
fn comparison_sum(play_type: PlayType, pieces: &[Piece]) -> u32 {
    match play_type {
        PlayType::ExtendedStraight | PlayType::ExtendedStraight5 => {
            let mut seen = Vec::new();
            let mut total = 0u32;
            for p in pieces {
                if !seen.contains(&p.kind) {
                    seen.push(p.kind);
                    total += p.points as u32;
                }
            }
            total
        }
        _ => pieces.iter().map(|p| p.points as u32).sum(),
    }
}

/// Compares two plays of (normally) equal piece count. A play that fails to
/// classify (INVALID) always loses to one that does; between two invalid
/// plays the earlier one "wins" only as a degenerate tie-break, since the
/// turn handler never lets two invalid plays both stand.
pub fn compare(a: Candidate, b: Candidate) -> Winner {
    match (classify(a.pieces), classify(b.pieces)) {
        (None, None) => {
            if a.order <= b.order {
                Winner::First
            } else {
                Winner::Second
            }
        }
        (Some(_), None) => Winner::First,
        (None, Some(_)) => Winner::Second,
        (Some(ta), Some(tb)) => {
            if ta.priority() != tb.priority() {
                return if ta.priority() > tb.priority() { Winner::First } else { Winner::Second };
            }
            let sa = comparison_sum(ta, a.pieces);
            let sb = comparison_sum(tb, b.pieces);
            if sa != sb {
                if sa > sb { Winner::First } else { Winner::Second }
            } else if a.order <= b.order {
                Winner::First
            } else {
                Winner::Second
            }
        }
    }
}

/// Finds the winner among a non-empty list of candidates already known to
/// be comparable (matching piece count and play type against the starter's
/// play — callers are responsible for filtering out non-matching plays
/// before calling this).
pub fn winner_of<'a>(candidates: &[Candidate<'a>]) -> usize {
    let mut best = 0;
    for i in 1..candidates.len() {
        if compare(candidates[i], candidates[best]) == Winner::First {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use liap_types::piece::{Color, Piece, PieceKind};

    fn p(kind: PieceKind, color: Color) -> Piece {
        Piece::new(kind, color)
    }

    /// S3 — Turn comparison tie on order.
    #[test]
    fn tie_on_points_goes_to_earlier_order() {
        let starter = [p(PieceKind::Chariot, Color::Black)];
        let follower1 = [p(PieceKind::Chariot, Color::Black)];
        let follower2 = [p(PieceKind::Horse, Color::Black)];
        let follower3 = [p(PieceKind::Cannon, Color::Black)];

        let candidates = [
            Candidate { pieces: &starter, order: 0 },
            Candidate { pieces: &follower1, order: 1 },
            Candidate { pieces: &follower2, order: 2 },
            Candidate { pieces: &follower3, order: 3 },
        ];
        assert_eq!(winner_of(&candidates), 0);
    }

    /// S4 — EXTENDED_STRAIGHT scoring: distinct-kind sum, higher wins.
    #[test]
    fn extended_straight_compares_by_distinct_kind_sum() {
        let starter = [
            p(PieceKind::Chariot, Color::Black),
            p(PieceKind::Chariot, Color::Black),
            p(PieceKind::Horse, Color::Black),
            p(PieceKind::Cannon, Color::Black),
        ];
        let follower = [
            p(PieceKind::Chariot, Color::Red),
            p(PieceKind::Horse, Color::Red),
            p(PieceKind::Cannon, Color::Red),
            p(PieceKind::Cannon, Color::Red),
        ];
        let candidates = [
            Candidate { pieces: &starter, order: 0 },
            Candidate { pieces: &follower, order: 1 },
        ];
        assert_eq!(winner_of(&candidates), 1);
    }

    #[test]
    fn higher_priority_type_wins_regardless_of_points() {
        let pair = [p(PieceKind::Soldier, Color::Red), p(PieceKind::Soldier, Color::Red)];
        let triple = [
            p(PieceKind::Soldier, Color::Black),
            p(PieceKind::Soldier, Color::Black),
            p(PieceKind::Soldier, Color::Black),
        ];
        // Different sizes never actually compete in a real turn, but
        // `compare` itself is total over any two classifiable plays.
        let a = Candidate { pieces: &pair, order: 0 };
        let b = Candidate { pieces: &triple, order: 1 };
        assert_eq!(compare(a, b), Winner::Second);
    }

    #[test]
    fn invalid_play_always_loses() {
        let valid = [p(PieceKind::Soldier, Color::Red)];
        let invalid: Vec<Piece> = (0..7).map(|_| p(PieceKind::Soldier, Color::Red)).collect();
        let a = Candidate { pieces: &valid, order: 0 };
        let b = Candidate { pieces: &invalid, order: 1 };
        assert_eq!(compare(a, b), Winner::First);
    }
}
