//! Room registry (§5): a lock-free-ish `DashMap` of live rooms, each backed
//! by its own spawned actor task. Grounded on the casino/room-handle split
//! from the other example pack's room-hosting crate — a room is looked up
//! by id and talked to only through its inbound channel, never reached into
//! directly.

use std::sync::Arc;

use dashmap::DashMap;
use rand::Rng;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::oneshot;

use liap_types::event::RoomSummary;
use liap_types::ids::{PlayerId, RoomId};

use crate::config::RoomConfig;
use crate::error::RoomError;
use crate::room::{self, JoinAck, RoomInbound};

const ROOM_ID_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const ROOM_ID_LEN: usize = 6;

#[derive(Clone)]
pub struct RoomHandle {
    pub inbound: UnboundedSender<RoomInbound>,
}

impl RoomHandle {
    pub async fn join(&self, player_name: String) -> Result<JoinAck, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.inbound
            .send(RoomInbound::Join { player_name, reply })
            .map_err(|_| RoomError::NotFound(RoomId::from("")))?;
        rx.await.map_err(|_| RoomError::NotFound(RoomId::from("")))?
    }

    pub fn send_action(&self, player_id: PlayerId, message: liap_types::action::ClientMessage) {
        let _ = self.inbound.send(RoomInbound::Action { player_id, message });
    }

    pub fn connect(&self, player_id: PlayerId, sender: UnboundedSender<liap_types::event::ServerMessage>) {
        let _ = self.inbound.send(RoomInbound::Connect { player_id, sender });
    }

    pub fn disconnect(&self, player_id: PlayerId) {
        let _ = self.inbound.send(RoomInbound::Disconnect { player_id });
    }

    pub async fn summary(&self) -> Option<RoomSummary> {
        let (reply, rx) = oneshot::channel();
        self.inbound.send(RoomInbound::Summary { reply }).ok()?;
        rx.await.ok()
    }
}

pub struct RoomRegistry {
    rooms: DashMap<RoomId, RoomHandle>,
}

impl RoomRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { rooms: DashMap::new() })
    }

    /// Generates a fresh room code, spawns its actor task, and registers the
    /// handle. The config is read once per room so a long-lived server can
    /// still be tuned by restarting with new env vars.
    ///
    /// A second task watches the room's `done` signal (sent when the actor
    /// closes itself, e.g. the idle grace period elapsing or the host
    /// leaving an empty lobby) and removes it from the map — the actor has
    /// no reference back into the registry, only this observer does.
    pub fn create_room(self: &Arc<Self>, config: RoomConfig) -> RoomId {
        let room_id = self.generate_room_id();
        let (tx, rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(room::run(room_id.clone(), config, rx, tx.clone(), done_tx));

        let registry = self.clone();
        let cleanup_id = room_id.clone();
        tokio::spawn(async move {
            let _ = done_rx.await;
            registry.remove(&cleanup_id);
        });

        self.rooms.insert(room_id.clone(), RoomHandle { inbound: tx });
        room_id
    }

    pub fn get(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms.get(room_id).map(|r| r.value().clone())
    }

    pub fn remove(&self, room_id: &RoomId) {
        self.rooms.remove(room_id);
    }

    pub async fn list_summaries(&self) -> Vec<RoomSummary> {
        let handles: Vec<RoomHandle> = self.rooms.iter().map(|r| r.value().clone()).collect();
        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Some(summary) = handle.summary().await {
                summaries.push(summary);
            }
        }
        summaries
    }

    fn generate_room_id(&self) -> RoomId {
        let mut rng = rand::rng();
        loop {
            let code: String = (0..ROOM_ID_LEN).map(|_| ROOM_ID_ALPHABET[rng.random_range(0..ROOM_ID_ALPHABET.len())] as char).collect();
            let candidate = RoomId::from(code);
            if !self.rooms.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_room_spawns_a_reachable_actor() {
        let registry = RoomRegistry::new();
        let room_id = registry.create_room(RoomConfig::default());
        let handle = registry.get(&room_id).expect("room was just created");
        let ack = handle.join("Alice".into()).await.unwrap();
        assert!(ack.is_host);
    }

    #[tokio::test]
    async fn unknown_room_is_absent() {
        let registry = RoomRegistry::new();
        assert!(registry.get(&RoomId::from("NOPE00")).is_none());
    }
}
