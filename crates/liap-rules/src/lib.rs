//! Pure rule engine: play-type classification, comparison, and scoring.
//! No I/O, no game-state mutation — see `liap-engine` for the state machine
//! that calls into this crate.

pub mod compare;
pub mod play_type;
pub mod score;
