//! The phase state machine: owns a `Game`, dispatches inbound actions to the
//! phase that's currently active, and drives the cascading transitions
//! those actions make eligible. No async, no networking — `liap-room`
//! wraps a `GameMachine` per room and is where actions actually arrive from
//! a socket.

pub mod errors;
pub mod machine;
pub mod phases;
pub mod queue;
pub mod setup;

pub use errors::ActionError;
pub use machine::{EngineEvents, GameMachine, RoundComplete, TurnResolved};
