//! Play-type classification (§4.1). Pure, total, deterministic: every finite
//! slice of pieces maps to exactly one `PlayType` or `None` (INVALID).

use std::collections::BTreeMap;

use liap_types::piece::{Group, Piece, PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlayType {
    Single,
    Pair,
    ThreeOfAKind,
    Straight,
    FourOfAKind,
    ExtendedStraight,
    ExtendedStraight5,
    FiveOfAKind,
    DoubleStraight,
}

impl PlayType {
    /// Priority order, low to high, per spec §4.1. Derived `Ord` on the
    /// declaration order above already matches this, but the named accessor
    /// documents the intent at call sites.
    pub fn priority(self) -> u8 {
        self as u8
    }
}

fn same_color(pieces: &[Piece]) -> bool {
    match pieces.first() {
        None => false,
        Some(first) => pieces.iter().all(|p| p.color == first.color),
    }
}

fn kind_counts(pieces: &[Piece]) -> BTreeMap<PieceKind, usize> {
    let mut counts = BTreeMap::new();
    for p in pieces {
        *counts.entry(p.kind).or_insert(0) += 1;
    }
    counts
}

fn is_all_soldiers(pieces: &[Piece]) -> bool {
    pieces.iter().all(|p| p.kind == PieceKind::Soldier)
}

/// All pieces belong to the same straight-group (GENERAL/ADVISOR/ELEPHANT or
/// CHARIOT/HORSE/CANNON).
fn common_group(pieces: &[Piece]) -> Option<Group> {
    let mut groups = pieces.iter().map(|p| p.kind.group());
    let first = groups.next()??;
    if groups.all(|g| g == Some(first)) {
        Some(first)
    } else {
        None
    }
}

/// Classify a candidate play. Returns `None` for any combination not listed
/// in §4.1 (INVALID).
pub fn classify(pieces: &[Piece]) -> Option<PlayType> {
    match pieces.len() {
        1 => Some(PlayType::Single),

        2 => {
            let [a, b] = pieces else { unreachable!() };
            (a.kind == b.kind && a.color == b.color).then_some(PlayType::Pair)
        }

        3 => {
            if !same_color(pieces) {
                return None;
            }
            if is_all_soldiers(pieces) {
                return Some(PlayType::ThreeOfAKind);
            }
            let counts = kind_counts(pieces);
            if counts.len() == 3 && counts.values().all(|&c| c == 1) && common_group(pieces).is_some() {
                Some(PlayType::Straight)
            } else {
                None
            }
        }

        4 => {
            if !same_color(pieces) {
                return None;
            }
            if is_all_soldiers(pieces) {
                return Some(PlayType::FourOfAKind);
            }
            // EXTENDED_STRAIGHT: all one group, 3 distinct kinds, exactly
            // one kind duplicated (counts {2,1,1}).
            if common_group(pieces).is_some() {
                let counts = kind_counts(pieces);
                let mut values: Vec<usize> = counts.values().copied().collect();
                values.sort_unstable();
                if counts.len() == 3 && values == [1, 1, 2] {
                    return Some(PlayType::ExtendedStraight);
                }
            }
            None
        }

        5 => {
            if !same_color(pieces) {
                return None;
            }
            if is_all_soldiers(pieces) {
                return Some(PlayType::FiveOfAKind);
            }
            // EXTENDED_STRAIGHT_5: same group, exactly 3 distinct kinds
            // (counts {2,2,1} — each kind has only 2 copies in the deck).
            if common_group(pieces).is_some() {
                let counts = kind_counts(pieces);
                let mut values: Vec<usize> = counts.values().copied().collect();
                values.sort_unstable();
                if counts.len() == 3 && values == [1, 2, 2] {
                    return Some(PlayType::ExtendedStraight5);
                }
            }
            None
        }

        6 => {
            if !same_color(pieces) {
                return None;
            }
            let counts = kind_counts(pieces);
            let wanted = [PieceKind::Chariot, PieceKind::Horse, PieceKind::Cannon];
            let is_double_straight = counts.len() == 3
                && wanted.iter().all(|k| counts.get(k) == Some(&2));
            is_double_straight.then_some(PlayType::DoubleStraight)
        }

        _ => None,
    }
}
