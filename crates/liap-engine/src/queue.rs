//! Pure model of the action queue's dedup + ordering rules (§4.3). The
//! concrete multi-producer single-consumer channel lives in `liap-room`
//! (`tokio::sync::mpsc`); this module holds the logic that decides whether
//! an enqueue is a duplicate, so it's testable without an executor.

use std::collections::VecDeque;

use liap_types::ids::PlayerId;

/// One queued action, tagged with enough identity to dedup and order it.
#[derive(Debug, Clone)]
pub struct QueuedAction<A> {
    pub player_id: PlayerId,
    pub action_type: &'static str,
    pub state_hash: u64,
    pub payload: A,
}

/// Dedups `(player_id, action_type, state_hash)` within a sliding window.
/// Entries older than `window_ms` are pruned on every check.
pub struct DedupWindow {
    window_ms: u64,
    seen: Vec<(PlayerId, &'static str, u64, u64)>,
}

impl DedupWindow {
    pub fn new(window_ms: u64) -> Self {
        Self { window_ms, seen: Vec::new() }
    }

    /// Returns `true` if this is a duplicate (and should be dropped);
    /// otherwise records it and returns `false`.
    pub fn check_and_record(
        &mut self,
        player_id: &PlayerId,
        action_type: &'static str,
        state_hash: u64,
        now_ms: u64,
    ) -> bool {
        self.seen.retain(|(_, _, _, at)| now_ms.saturating_sub(*at) < self.window_ms);
        let is_dup = self
            .seen
            .iter()
            .any(|(p, t, h, _)| p == player_id && *t == action_type && *h == state_hash);
        if !is_dup {
            self.seen.push((player_id.clone(), action_type, state_hash, now_ms));
        }
        is_dup
    }
}

/// FIFO of queued actions. The single-consumer end; producers push from
/// wherever they run (inbound reader, bot scheduler, timeouts).
#[derive(Debug, Default)]
pub struct ActionFifo<A> {
    inner: VecDeque<QueuedAction<A>>,
}

impl<A> ActionFifo<A> {
    pub fn new() -> Self {
        Self { inner: VecDeque::new() }
    }

    pub fn push(&mut self, action: QueuedAction<A>) {
        self.inner.push_back(action);
    }

    pub fn pop(&mut self) -> Option<QueuedAction<A>> {
        self.inner.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}
