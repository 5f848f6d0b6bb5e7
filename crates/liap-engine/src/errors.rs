//! Validation errors a phase handler can produce (§7 — Validation taxonomy).
//! Reported to the originating player as an `error` event; state is
//! unchanged whenever one of these is returned.

use liap_types::ids::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    WrongPhase { expected: &'static str },
    NotYourTurn { expected: PlayerId },
    UnknownPlayer,
    InvalidDeclareValue { value: u8 },
    ForbiddenDeclareValue { value: u8 },
    MustDeclareNonzero,
    NoRedealPending,
    AlreadyDecided,
    WrongPieceCount { expected: usize, got: usize },
    UnknownPieceIndex { index: usize },
    DuplicatePieceIndex { index: usize },
    InvalidPlayType,
}

impl ActionError {
    pub fn code(&self) -> &'static str {
        match self {
            ActionError::WrongPhase { .. } => "wrong_phase",
            ActionError::NotYourTurn { .. } => "not_your_turn",
            ActionError::UnknownPlayer => "unknown_player",
            ActionError::InvalidDeclareValue { .. } => "invalid_declare_value",
            ActionError::ForbiddenDeclareValue { .. } => "forbidden_declare_value",
            ActionError::MustDeclareNonzero => "must_declare_nonzero",
            ActionError::NoRedealPending => "no_redeal_pending",
            ActionError::AlreadyDecided => "already_decided",
            ActionError::WrongPieceCount { .. } => "wrong_piece_count",
            ActionError::UnknownPieceIndex { .. } => "unknown_piece_index",
            ActionError::DuplicatePieceIndex { .. } => "duplicate_piece_index",
            ActionError::InvalidPlayType => "invalid_play_type",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ActionError::WrongPhase { expected } => format!("action not valid outside {expected}"),
            ActionError::NotYourTurn { expected } => format!("waiting on {expected}"),
            ActionError::UnknownPlayer => "player not seated in this room".to_string(),
            ActionError::InvalidDeclareValue { value } => {
                format!("{value} is not a legal declaration (0..=8)")
            }
            ActionError::ForbiddenDeclareValue { value } => {
                format!("{value} would make declarations sum to 8")
            }
            ActionError::MustDeclareNonzero => {
                "two zero declarations in a row forces a nonzero declaration".to_string()
            }
            ActionError::NoRedealPending => {
                "no redeal decision is pending for this player".to_string()
            }
            ActionError::AlreadyDecided => "this player already decided on the redeal".to_string(),
            ActionError::WrongPieceCount { expected, got } => {
                format!("expected {expected} pieces, got {got}")
            }
            ActionError::UnknownPieceIndex { index } => {
                format!("hand has no piece at index {index}")
            }
            ActionError::DuplicatePieceIndex { index } => {
                format!("index {index} repeated in the same play")
            }
            ActionError::InvalidPlayType => "those pieces do not form a valid play".to_string(),
        }
    }
}
