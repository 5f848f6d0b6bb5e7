//! Connection manager (§4.6): tracks each seat's live outbound channel and,
//! while a seat is disconnected, queues the critical events it missed so a
//! reconnect can catch the client up without replaying the whole history.

use std::collections::{HashMap, VecDeque};

use tokio::sync::mpsc::UnboundedSender;

use liap_types::event::{is_critical, ServerMessage};
use liap_types::ids::PlayerId;

struct Slot {
    outbound: Option<UnboundedSender<ServerMessage>>,
    critical_queue: VecDeque<ServerMessage>,
}

impl Slot {
    fn new() -> Self {
        Self { outbound: None, critical_queue: VecDeque::new() }
    }
}

/// Per-room delivery state. Disconnecting a player never drops them from the
/// room roster — that's `liap-engine`'s concern — only whether messages are
/// delivered live or queued.
pub struct ConnectionManager {
    slots: HashMap<PlayerId, Slot>,
    queue_cap: usize,
}

impl ConnectionManager {
    pub fn new(queue_cap: usize) -> Self {
        Self { slots: HashMap::new(), queue_cap }
    }

    /// Registers a seat with no live connection yet (used when a bot is
    /// seated, or a human joins before its socket is wired up).
    pub fn register(&mut self, player_id: PlayerId) {
        self.slots.entry(player_id).or_insert_with(Slot::new);
    }

    /// Attaches a live sender, draining and replaying any queued critical
    /// events in arrival order.
    pub fn connect(&mut self, player_id: &PlayerId, sender: UnboundedSender<ServerMessage>) {
        let slot = self.slots.entry(player_id.clone()).or_insert_with(Slot::new);
        while let Some(queued) = slot.critical_queue.pop_front() {
            let _ = sender.send(queued);
        }
        slot.outbound = Some(sender);
    }

    pub fn disconnect(&mut self, player_id: &PlayerId) {
        if let Some(slot) = self.slots.get_mut(player_id) {
            slot.outbound = None;
        }
    }

    pub fn remove(&mut self, player_id: &PlayerId) {
        self.slots.remove(player_id);
    }

    pub fn is_connected(&self, player_id: &PlayerId) -> bool {
        self.slots.get(player_id).is_some_and(|s| s.outbound.is_some())
    }

    /// Delivers to one seat, queueing on disconnect if the event is
    /// critical; non-critical events are simply dropped.
    pub fn send(&mut self, player_id: &PlayerId, message: ServerMessage) {
        let Some(slot) = self.slots.get_mut(player_id) else {
            tracing::warn!(player = %player_id, "send to unregistered seat");
            return;
        };
        match &slot.outbound {
            Some(tx) => {
                if tx.send(message).is_err() {
                    slot.outbound = None;
                }
            }
            None if is_critical(&message) => {
                if slot.critical_queue.len() >= self.queue_cap {
                    slot.critical_queue.pop_front();
                }
                slot.critical_queue.push_back(message);
            }
            None => {}
        }
    }

    /// Broadcasts to every registered seat, calling `build` once per seat so
    /// per-player payloads (e.g. `PhaseChange.my_hand`) can differ.
    pub fn broadcast_with(&mut self, build: impl Fn(&PlayerId) -> ServerMessage) {
        let ids: Vec<PlayerId> = self.slots.keys().cloned().collect();
        for id in ids {
            let message = build(&id);
            self.send(&id, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn pid(s: &str) -> PlayerId {
        PlayerId::from(s)
    }

    fn room_closed() -> ServerMessage {
        ServerMessage::RoomClosed { room_id: "r1".into(), reason: "test".into() }
    }

    fn game_over() -> ServerMessage {
        ServerMessage::GameOver { winner: pid("p0"), final_scores: vec![] }
    }

    #[test]
    fn non_critical_event_is_dropped_when_disconnected() {
        let mut mgr = ConnectionManager::new(10);
        mgr.register(pid("p0"));
        mgr.send(&pid("p0"), room_closed());
        let (tx, mut rx) = unbounded_channel();
        mgr.connect(&pid("p0"), tx);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn critical_event_is_queued_and_replayed_on_reconnect() {
        let mut mgr = ConnectionManager::new(10);
        mgr.register(pid("p0"));
        mgr.send(&pid("p0"), game_over());
        let (tx, mut rx) = unbounded_channel();
        mgr.connect(&pid("p0"), tx);
        assert!(matches!(rx.try_recv().unwrap(), ServerMessage::GameOver { .. }));
    }

    #[test]
    fn queue_drops_oldest_beyond_cap() {
        let mut mgr = ConnectionManager::new(1);
        mgr.register(pid("p0"));
        mgr.send(&pid("p0"), ServerMessage::GameOver { winner: pid("old"), final_scores: vec![] });
        mgr.send(&pid("p0"), game_over());
        let (tx, mut rx) = unbounded_channel();
        mgr.connect(&pid("p0"), tx);
        let ServerMessage::GameOver { winner, .. } = rx.try_recv().unwrap() else { panic!("wrong variant") };
        assert_eq!(winner, pid("p0"));
        assert!(rx.try_recv().is_err());
    }
}
