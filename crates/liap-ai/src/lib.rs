//! Pure bot decision functions for declaration, play choice, and redeal
//! acceptance. No I/O, no randomness except where explicitly threaded in by
//! the caller — every function here is a total, deterministic mapping from
//! inputs to a decision, so `liap-room`'s bot scheduler can call them
//! directly from inside an async task without blocking.

pub mod combos;
pub mod context;
pub mod declare;
pub mod play;
pub mod redeal;
