//! Shared context structs the pure decision functions take as input.

/// Aggregate strength of the declarations made so far in the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStrength {
    Weak,
    Normal,
    Strong,
}

impl FieldStrength {
    pub fn from_previous(previous_declarations: &[u8]) -> Self {
        if previous_declarations.is_empty() {
            return FieldStrength::Normal;
        }
        let avg = previous_declarations.iter().map(|&v| v as f64).sum::<f64>()
            / previous_declarations.len() as f64;
        if avg <= 1.0 {
            FieldStrength::Weak
        } else if avg >= 3.5 {
            FieldStrength::Strong
        } else {
            FieldStrength::Normal
        }
    }
}

/// Everything the declaration heuristic needs besides the hand itself.
#[derive(Debug, Clone)]
pub struct DeclarationContext {
    /// 0-indexed position in this round's declaration order.
    pub position: usize,
    pub previous_declarations: Vec<u8>,
    pub must_declare_nonzero: bool,
    pub redeal_multiplier: u32,
    pub own_score: i32,
    pub opponent_scores: Vec<i32>,
}

impl DeclarationContext {
    pub fn is_starter(&self) -> bool {
        self.position == 0
    }

    pub fn is_last_declarer(&self) -> bool {
        self.position == 3
    }

    pub fn pile_room(&self) -> u32 {
        let sum: u32 = self.previous_declarations.iter().map(|&v| v as u32).sum();
        8u32.saturating_sub(sum)
    }

    pub fn field_strength(&self) -> FieldStrength {
        FieldStrength::from_previous(&self.previous_declarations)
    }

    pub fn forbidden_value(&self) -> Option<u8> {
        if !self.is_last_declarer() {
            return None;
        }
        let sum: u32 = self.previous_declarations.iter().map(|&v| v as u32).sum();
        if sum <= 8 {
            Some((8 - sum) as u8)
        } else {
            None
        }
    }

    pub fn opponent_combo_opportunity(&self) -> bool {
        self.previous_declarations.iter().any(|&v| v >= 3)
    }
}
