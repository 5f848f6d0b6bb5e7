//! Play-choice heuristic (§4.2). Given a hand, the pieces the current
//! player is allowed to play and the count they must match, pick indices
//! into the hand.

use liap_types::piece::Piece;
use liap_rules::play_type::classify;

use crate::combos::enumerate_combos;

/// Chooses which pieces to play.
///
/// * `required_count` — `Some(n)` when following (must match the starter's
///   play size exactly), `None` when starting a turn (free choice of size).
///
/// Strategy: among all valid combinations of the required size, prefer the
/// one with the highest total points (spend strength early rather than
/// hoard it — see spec §4.2). When no valid combination of that size
/// exists and a match is mandatory, discard the lowest-value pieces of
/// that size to forfeit the trick as cheaply as possible.
pub fn choose_play(hand: &[Piece], required_count: Option<usize>) -> Vec<usize> {
    match required_count {
        None => best_opening_combo(hand),
        Some(count) => best_matching_combo(hand, count)
            .unwrap_or_else(|| cheapest_indices(hand, count)),
    }
}

fn best_opening_combo(hand: &[Piece]) -> Vec<usize> {
    let combos = enumerate_combos(hand);
    combos
        .into_iter()
        .max_by_key(|c| (c.play_type, c.total_points(hand)))
        .map(|c| c.indices)
        .unwrap_or_else(|| vec![highest_index(hand)])
}

fn best_matching_combo(hand: &[Piece], count: usize) -> Option<Vec<usize>> {
    if count == 1 {
        return Some(vec![highest_index(hand)]);
    }
    enumerate_combos(hand)
        .into_iter()
        .filter(|c| c.indices.len() == count)
        .max_by_key(|c| c.total_points(hand))
        .map(|c| c.indices)
}

fn highest_index(hand: &[Piece]) -> usize {
    (0..hand.len())
        .max_by_key(|&i| hand[i].points)
        .expect("hand must be non-empty when a play is required")
}

/// Discards the `count` lowest-value pieces — used when forced to match a
/// size with no classifiable combination available.
fn cheapest_indices(hand: &[Piece], count: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..hand.len()).collect();
    indices.sort_by_key(|&i| hand[i].points);
    indices.truncate(count);
    indices.sort_unstable();
    indices
}

/// Validates that `indices` select a classifiable play from `hand`, for
/// callers that need to check a heuristic result before submitting it.
pub fn is_playable(hand: &[Piece], indices: &[usize]) -> bool {
    let pieces: Vec<Piece> = indices.iter().map(|&i| hand[i]).collect();
    classify(&pieces).is_some()
}
