//! Enumerates every valid non-SINGLE combination in a hand. Shared by the
//! declaration heuristic (§4.2 step 3) and could be reused by a future play
//! heuristic that wants "best strong combo" rather than "best N-of-a-kind".

use liap_types::piece::Piece;
use liap_rules::play_type::{classify, PlayType};

/// A classified combination of pieces drawn from the hand by index.
pub struct Combo {
    pub play_type: PlayType,
    pub indices: Vec<usize>,
}

impl Combo {
    pub fn pieces<'a>(&self, hand: &'a [Piece]) -> Vec<Piece> {
        self.indices.iter().map(|&i| hand[i]).collect()
    }

    pub fn total_points(&self, hand: &[Piece]) -> u32 {
        self.indices.iter().map(|&i| hand[i].points as u32).sum()
    }
}

/// All non-SINGLE valid combos of size 2..=6, by index into `hand`.
///
/// Hands are at most 8 pieces, so the full subset enumeration (at most
/// `C(8,2)+...+C(8,6) = 238` candidates) is cheap.
pub fn enumerate_combos(hand: &[Piece]) -> Vec<Combo> {
    let mut out = Vec::new();
    let n = hand.len();
    for size in 2..=6.min(n) {
        let mut indices: Vec<usize> = (0..size).collect();
        if indices.len() > n {
            continue;
        }
        loop {
            let pieces: Vec<Piece> = indices.iter().map(|&i| hand[i]).collect();
            if let Some(play_type) = classify(&pieces) {
                out.push(Combo { play_type, indices: indices.clone() });
            }
            if !advance(&mut indices, n) {
                break;
            }
        }
    }
    out
}

/// Advances `indices` (a strictly increasing combination) to the next
/// combination in lexicographic order. Returns `false` when exhausted.
fn advance(indices: &mut [usize], n: usize) -> bool {
    let k = indices.len();
    let mut i = k;
    loop {
        if i == 0 {
            return false;
        }
        i -= 1;
        if indices[i] != i + n - k {
            indices[i] += 1;
            for j in (i + 1)..k {
                indices[j] = indices[j - 1] + 1;
            }
            return true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liap_types::piece::{Color, PieceKind};

    #[test]
    fn finds_pairs_and_straights() {
        let hand = vec![
            Piece::new(PieceKind::General, Color::Black),
            Piece::new(PieceKind::Advisor, Color::Black),
            Piece::new(PieceKind::Elephant, Color::Black),
            Piece::new(PieceKind::Soldier, Color::Red),
            Piece::new(PieceKind::Soldier, Color::Red),
        ];
        let combos = enumerate_combos(&hand);
        assert!(combos.iter().any(|c| c.play_type == PlayType::Straight));
        assert!(combos.iter().any(|c| c.play_type == PlayType::Pair));
    }

    #[test]
    fn empty_hand_has_no_combos() {
        assert!(enumerate_combos(&[]).is_empty());
    }
}
