//! Async orchestration layer (§4.5-§4.7, §5): one task per room, talked to
//! only through its inbound channel. Wraps `liap-engine`'s synchronous
//! `GameMachine` with everything that needs a clock or a socket — the
//! action queue's concrete channel, connection tracking, broadcast
//! translation, and bot pacing.

pub mod bot_scheduler;
pub mod broadcast;
pub mod config;
pub mod connection;
pub mod error;
pub mod registry;
pub mod room;

pub use config::RoomConfig;
pub use error::{ProtocolError, RoomError};
pub use registry::{RoomHandle, RoomRegistry};
pub use room::{JoinAck, RoomInbound};
