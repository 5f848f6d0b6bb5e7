//! Declaration heuristic (§4.2). Deterministic given `(hand, context)`.

use liap_types::piece::{Color, Piece, PieceKind};
use liap_rules::play_type::PlayType;

use crate::combos::{enumerate_combos, Combo};
use crate::context::{DeclarationContext, FieldStrength};

fn is_strong_combo(combo: &Combo, hand: &[Piece]) -> bool {
    combo.play_type >= PlayType::ThreeOfAKind
        || (combo.play_type == PlayType::Pair && combo.total_points(hand) > 12)
}

fn has_general_red(hand: &[Piece]) -> bool {
    hand.iter().any(|p| p.kind == PieceKind::General && p.color == Color::Red)
}

/// Opener contribution of a single piece (step 4).
fn opener_contribution(points: u8, field: FieldStrength) -> f64 {
    if points >= 13 {
        1.0
    } else if points >= 11 {
        match field {
            FieldStrength::Weak => 1.0,
            FieldStrength::Normal => 0.85,
            FieldStrength::Strong => 0.7,
        }
    } else {
        0.0
    }
}

fn opener_score(hand: &[Piece], field: FieldStrength) -> f64 {
    hand.iter().map(|p| opener_contribution(p.points, field)).sum()
}

/// Choose a declaration value for `hand` given `ctx`. Never returns the
/// forbidden value for the last declarer, never returns 0 when
/// `must_declare_nonzero`.
pub fn declare_decision(hand: &[Piece], ctx: &DeclarationContext) -> u8 {
    let pile_room = ctx.pile_room();
    let field = ctx.field_strength();

    let all_combos = enumerate_combos(hand);
    let strong_combos: Vec<&Combo> =
        all_combos.iter().filter(|c| is_strong_combo(c, hand)).collect();

    let opener = opener_score(hand, field);
    let has_reliable_opener = opener > 0.0;
    let general_red = has_general_red(hand);

    let gate_open = ctx.is_starter()
        || has_reliable_opener
        || general_red
        || ctx.opponent_combo_opportunity();

    let mut viable_sizes: Vec<usize> = if gate_open {
        strong_combos
            .iter()
            .filter(|c| c.indices.len() as u32 <= pile_room)
            .map(|c| c.indices.len())
            .collect()
    } else {
        Vec::new()
    };

    // Step 7: GENERAL_RED-in-hand adjustments.
    if general_red && field == FieldStrength::Weak {
        viable_sizes = all_combos
            .iter()
            .filter(|c| c.indices.len() as u32 <= pile_room)
            .map(|c| c.indices.len())
            .collect();
    }

    let mut score = viable_sizes.iter().sum::<usize>() as f64 + opener.floor();

    if general_red {
        let premium_openers = hand.iter().filter(|p| p.points >= 11).count();
        let bonus = match premium_openers {
            0 | 1 => 0.0,
            2 => 0.6,
            3 => 0.8,
            _ => 1.0,
        };
        score += bonus;
    }

    score = score.clamp(0.0, pile_room as f64);

    // Step 8: cap extremes.
    if !hand.is_empty() {
        if hand.iter().all(|p| p.points >= 8) {
            score = score.min(5.0);
        } else if hand.iter().all(|p| p.points <= 2) {
            score = score.min(2.0);
        }
    }

    let mut value = score.round().clamp(0.0, 8.0) as u8;

    if ctx.must_declare_nonzero && value == 0 {
        value = 1;
    }

    if let Some(forbidden) = ctx.forbidden_value() {
        if value == forbidden {
            value = nearest_alternative(value, forbidden, field == FieldStrength::Strong, ctx);
        }
    }

    value
}

/// Picks the closest legal value to `value` when `value == forbidden`.
/// Strong hands prefer the higher neighbor first (step 9).
fn nearest_alternative(value: u8, forbidden: u8, prefer_higher: bool, ctx: &DeclarationContext) -> u8 {
    let higher = value.checked_add(1).filter(|&v| v <= 8 && v != forbidden);
    let lower = value.checked_sub(1).filter(|&v| v != forbidden || v == 0);
    let lower = lower.filter(|_| !(ctx.must_declare_nonzero && value == 1));

    let (first, second) = if prefer_higher { (higher, lower) } else { (lower, higher) };
    first.or(second).unwrap_or(if forbidden == 0 { 1 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(position: usize, previous: &[u8]) -> DeclarationContext {
        DeclarationContext {
            position,
            previous_declarations: previous.to_vec(),
            must_declare_nonzero: false,
            redeal_multiplier: 1,
            own_score: 0,
            opponent_scores: vec![0, 0, 0],
        }
    }

    /// S1 — Basic declaration validity.
    #[test]
    fn s1_last_declarer_never_makes_sum_eight() {
        let weak_hand: Vec<Piece> =
            (0..8).map(|_| Piece::new(PieceKind::Soldier, Color::Black)).collect();
        let c = ctx(3, &[3, 2, 3]);
        assert_eq!(c.forbidden_value(), Some(0));
        let value = declare_decision(&weak_hand, &c);
        assert_ne!(value, 0);
    }

    #[test]
    fn must_declare_nonzero_is_honored() {
        let weak_hand: Vec<Piece> =
            (0..8).map(|_| Piece::new(PieceKind::Soldier, Color::Black)).collect();
        let mut c = ctx(1, &[0]);
        c.must_declare_nonzero = true;
        let value = declare_decision(&weak_hand, &c);
        assert!(value >= 1);
    }

    #[test]
    fn strong_hand_with_general_red_declares_above_zero() {
        let hand = vec![
            Piece::new(PieceKind::General, Color::Red),
            Piece::new(PieceKind::Advisor, Color::Red),
            Piece::new(PieceKind::Elephant, Color::Red),
            Piece::new(PieceKind::Chariot, Color::Red),
            Piece::new(PieceKind::Chariot, Color::Red),
            Piece::new(PieceKind::Horse, Color::Red),
            Piece::new(PieceKind::Cannon, Color::Red),
            Piece::new(PieceKind::Soldier, Color::Black),
        ];
        let value = declare_decision(&hand, &ctx(0, &[]));
        assert!(value > 0);
    }

    #[test]
    fn value_always_in_range() {
        let hand: Vec<Piece> =
            (0..8).map(|_| Piece::new(PieceKind::Soldier, Color::Black)).collect();
        for position in 0..4 {
            let c = ctx(position, &[2, 2, 2][..position.min(3)]);
            let value = declare_decision(&hand, &c);
            assert!(value <= 8);
        }
    }
}
