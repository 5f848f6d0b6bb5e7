//! The fixed 32-piece deck. `Piece` is an immutable value type: two pieces
//! with the same kind and color are interchangeable, so equality and
//! ordering are both by `points`.

use serde::{Deserialize, Serialize};

use crate::rng::RngState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Chariot,
    Horse,
    Cannon,
    Soldier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Black,
}

/// A group is a set of kinds that can form a STRAIGHT / EXTENDED_STRAIGHT
/// (see `liap-rules::play_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Chariots, // GENERAL, ADVISOR, ELEPHANT
    Horses,   // CHARIOT, HORSE, CANNON
}

impl PieceKind {
    /// The straight-group this kind belongs to, or `None` for SOLDIER
    /// (which only forms same-kind multiples).
    pub fn group(self) -> Option<Group> {
        match self {
            PieceKind::General | PieceKind::Advisor | PieceKind::Elephant => {
                Some(Group::Chariots)
            }
            PieceKind::Chariot | PieceKind::Horse | PieceKind::Cannon => Some(Group::Horses),
            PieceKind::Soldier => None,
        }
    }

    fn base_points(self) -> u8 {
        match self {
            PieceKind::General => 14,
            PieceKind::Advisor => 12,
            PieceKind::Elephant => 10,
            PieceKind::Chariot => 8,
            PieceKind::Horse => 6,
            PieceKind::Cannon => 4,
            PieceKind::Soldier => 2,
        }
    }
}

/// Immutable piece value. `points` is derived from `(kind, color)` and fixed
/// for the lifetime of the piece — see `Piece::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub points: u8,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        let points = match color {
            Color::Red => kind.base_points(),
            Color::Black => kind.base_points() - 1,
        };
        Self { kind, color, points }
    }
}

impl PartialOrd for Piece {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Piece {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.points.cmp(&other.points)
    }
}

/// Builds the fixed 32-piece deck, unshuffled, in a stable canonical order
/// (highest points first).
pub fn full_deck() -> Vec<Piece> {
    use Color::*;
    use PieceKind::*;

    let mut deck = Vec::with_capacity(32);
    for kind in [General, Advisor, Elephant, Chariot, Horse, Cannon] {
        for color in [Red, Black] {
            deck.push(Piece::new(kind, color));
            deck.push(Piece::new(kind, color));
        }
    }
    for color in [Red, Black] {
        for _ in 0..5 {
            deck.push(Piece::new(Soldier, color));
        }
    }
    deck
}

/// Shuffles a fresh copy of the 32-piece deck using the game's seeded RNG.
pub fn shuffled_deck(rng: &mut RngState) -> Vec<Piece> {
    let mut deck = full_deck();
    rng.shuffle(&mut deck);
    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_has_32_pieces() {
        assert_eq!(full_deck().len(), 32);
    }

    #[test]
    fn points_match_the_fixed_table() {
        assert_eq!(Piece::new(PieceKind::General, Color::Red).points, 14);
        assert_eq!(Piece::new(PieceKind::General, Color::Black).points, 13);
        assert_eq!(Piece::new(PieceKind::Advisor, Color::Red).points, 12);
        assert_eq!(Piece::new(PieceKind::Advisor, Color::Black).points, 11);
        assert_eq!(Piece::new(PieceKind::Elephant, Color::Red).points, 10);
        assert_eq!(Piece::new(PieceKind::Elephant, Color::Black).points, 9);
        assert_eq!(Piece::new(PieceKind::Chariot, Color::Red).points, 8);
        assert_eq!(Piece::new(PieceKind::Chariot, Color::Black).points, 7);
        assert_eq!(Piece::new(PieceKind::Horse, Color::Red).points, 6);
        assert_eq!(Piece::new(PieceKind::Horse, Color::Black).points, 5);
        assert_eq!(Piece::new(PieceKind::Cannon, Color::Red).points, 4);
        assert_eq!(Piece::new(PieceKind::Cannon, Color::Black).points, 3);
        assert_eq!(Piece::new(PieceKind::Soldier, Color::Red).points, 2);
        assert_eq!(Piece::new(PieceKind::Soldier, Color::Black).points, 1);
    }

    #[test]
    fn duplicate_counts_match_spec() {
        let deck = full_deck();
        let count = |kind: PieceKind| deck.iter().filter(|p| p.kind == kind).count();
        assert_eq!(count(PieceKind::General), 4); // 2 red + 2 black
        assert_eq!(count(PieceKind::Soldier), 10); // 5 red + 5 black
    }

    #[test]
    fn shuffle_preserves_multiset() {
        let mut rng = RngState::new(42);
        let shuffled = shuffled_deck(&mut rng);
        let mut sorted_points: Vec<u8> = shuffled.iter().map(|p| p.points).collect();
        sorted_points.sort_unstable();
        let mut expected: Vec<u8> = full_deck().iter().map(|p| p.points).collect();
        expected.sort_unstable();
        assert_eq!(sorted_points, expected);
    }
}
