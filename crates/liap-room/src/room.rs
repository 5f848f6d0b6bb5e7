//! The room actor (§4.7, §5): one spawned task owns a room's `GameMachine`,
//! roster, `ConnectionManager`, and dedup window. Everything that touches
//! `Game` goes through this task's `inbox` loop, so the single-writer rule
//! is structural rather than a lock.
//!
//! Lobby and in-game lifecycle (join/leave/bot swap/host migration) live
//! here alongside gameplay dispatch rather than in a separate module —
//! splitting them would mean threading `RoomState` back and forth for no
//! real separation of concerns.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use liap_types::action::ClientMessage;
use liap_types::event::{PlayerPublic, RoomSummary, ServerMessage};
use liap_types::ids::{PlayerId, RoomId};
use liap_types::phase::PhaseData;
use liap_types::player::Player;

use liap_engine::queue::DedupWindow;
use liap_engine::{ActionError, EngineEvents, GameMachine};

use crate::broadcast;
use crate::bot_scheduler;
use crate::config::RoomConfig;
use crate::connection::ConnectionManager;
use crate::error::RoomError;

const SEATS: u8 = 4;

pub struct JoinAck {
    pub player_id: PlayerId,
    pub seat: u8,
    pub is_host: bool,
}

pub enum RoomInbound {
    Join { player_name: String, reply: oneshot::Sender<Result<JoinAck, RoomError>> },
    Action { player_id: PlayerId, message: ClientMessage },
    Connect { player_id: PlayerId, sender: UnboundedSender<ServerMessage> },
    Disconnect { player_id: PlayerId },
    Summary { reply: oneshot::Sender<RoomSummary> },
    /// Re-checked after the idle grace period; a no-op if a human reconnected
    /// or rejoined in the meantime.
    IdleCheck,
}

struct RoomState {
    room_id: RoomId,
    config: RoomConfig,
    host: Option<PlayerId>,
    roster: Vec<Player>,
    machine: Option<GameMachine>,
    connections: ConnectionManager,
    dedup: DedupWindow,
    rng: SmallRng,
    self_tx: UnboundedSender<RoomInbound>,
    started_at: Instant,
    closed: bool,
}

impl RoomState {
    fn now_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    fn state_hash(&self) -> u64 {
        self.machine.as_ref().map(|m| m.game.version).unwrap_or(self.roster.len() as u64)
    }

    fn in_progress(&self) -> bool {
        self.machine.is_some()
    }

    /// The roster snapshotted at `start_game` time goes stale the moment the
    /// game mutates its own copy of the players (disconnects, reconnects,
    /// bot takeover) — this always reads whichever copy is live.
    fn live_players(&self) -> &[Player] {
        match &self.machine {
            Some(machine) => &machine.game.players,
            None => &self.roster,
        }
    }

    fn has_connected_human(&self) -> bool {
        self.live_players().iter().any(|p| !p.is_bot && p.connected)
    }

    /// Arms (or re-arms) the idle-collection timer once the room has zero
    /// connected humans. Harmless to call more than once — a stale check
    /// that fires after a human reconnected just finds `has_connected_human`
    /// true again and does nothing.
    fn maybe_schedule_idle_check(&mut self) {
        if self.has_connected_human() {
            return;
        }
        let tx = self.self_tx.clone();
        let grace = self.config.idle_grace_period;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let _ = tx.send(RoomInbound::IdleCheck);
        });
    }

    fn close(&mut self, reason: &str) {
        if self.closed {
            return;
        }
        self.closed = true;
        let room_id = self.room_id.to_string();
        let reason = reason.to_string();
        self.connections.broadcast_with(move |_| ServerMessage::RoomClosed { room_id: room_id.clone(), reason: reason.clone() });
    }

    fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.room_id.to_string(),
            occupied_seats: self.roster.len() as u8,
            in_progress: self.in_progress(),
        }
    }

    fn broadcast_room_update(&mut self) {
        let players: Vec<PlayerPublic> = self.live_players().iter().map(player_public).collect();
        let room_id = self.room_id.to_string();
        let Some(host) = self.host.clone() else { return };
        self.connections.broadcast_with(|_| ServerMessage::RoomUpdate {
            room_id: room_id.clone(),
            players: players.clone(),
            host: host.clone(),
        });
    }

    fn broadcast_engine_events(&mut self, events: &EngineEvents) {
        let Some(machine) = &self.machine else { return };
        let game = &machine.game;

        if events.phase_changed {
            self.connections.broadcast_with(|pid| broadcast::phase_change_for(game, pid));
        }
        for resolved in &events.turns_resolved {
            let message =
                broadcast::turn_resolved_message(game, resolved.turn_number, resolved.winner.clone(), resolved.pieces_won);
            self.connections.broadcast_with(move |_| message.clone());
        }
        if let Some(complete) = &events.round_complete {
            let message = broadcast::round_complete_message(game, complete.round_number, complete.scores.clone());
            self.connections.broadcast_with(move |_| message.clone());
        }
        if let Some(winner) = &events.game_over {
            let scores = final_scores(game);
            let message = broadcast::game_over_message(winner.clone(), scores);
            self.connections.broadcast_with(move |_| message.clone());
        }
    }

    fn send_error(&mut self, player_id: &PlayerId, err_code: &str, err_message: String) {
        self.connections.send(player_id, ServerMessage::Error { code: err_code.into(), message: err_message });
    }

    fn join(&mut self, player_name: String) -> Result<JoinAck, RoomError> {
        if self.in_progress() {
            return Err(RoomError::AlreadyStarted);
        }
        if self.roster.len() >= SEATS as usize {
            return Err(RoomError::RoomFull(self.room_id.clone()));
        }
        if self.roster.iter().any(|p| p.name == player_name) {
            return Err(RoomError::NameTaken(player_name));
        }

        let seat = self.roster.len() as u8;
        let player_id = PlayerId::from(format!("{}-{}", self.room_id, seat));
        let player = Player::new(player_id.clone(), player_name, seat, false);
        self.connections.register(player_id.clone());
        let is_host = self.host.is_none();
        if is_host {
            self.host = Some(player_id.clone());
        }
        self.roster.push(player.clone());
        self.connections.broadcast_with(move |_| ServerMessage::PlayerJoined { player: player_public(&player) });
        self.broadcast_room_update();
        Ok(JoinAck { player_id, seat, is_host })
    }

    fn add_bot(&mut self, requester: &PlayerId, slot: u8) -> Result<(), RoomError> {
        self.require_host(requester)?;
        if self.in_progress() {
            return Err(RoomError::AlreadyStarted);
        }
        if self.roster.len() >= SEATS as usize {
            return Err(RoomError::RoomFull(self.room_id.clone()));
        }
        let seat = self.roster.len() as u8;
        let bot_id = PlayerId::from(format!("{}-bot-{}", self.room_id, slot));
        let bot = Player::new(bot_id.clone(), format!("Bot {}", slot + 1), seat, true);
        self.connections.register(bot_id);
        self.roster.push(bot.clone());
        self.connections.broadcast_with(move |_| ServerMessage::PlayerJoined { player: player_public(&bot) });
        self.broadcast_room_update();
        Ok(())
    }

    fn remove_player(&mut self, requester: &PlayerId, target: &PlayerId) -> Result<(), RoomError> {
        self.require_host(requester)?;
        if self.in_progress() {
            return Err(RoomError::AlreadyStarted);
        }
        let before = self.roster.len();
        self.roster.retain(|p| &p.id != target);
        if self.roster.len() == before {
            return Err(RoomError::UnknownPlayer(target.clone()));
        }
        for (seat, player) in self.roster.iter_mut().enumerate() {
            player.seat = seat as u8;
        }
        self.connections.remove(target);
        self.connections.broadcast_with(|_| ServerMessage::PlayerLeft { player_id: target.clone() });
        self.migrate_host_if_needed(target);
        self.broadcast_room_update();
        self.maybe_schedule_idle_check();
        Ok(())
    }

    /// In the lobby, a regular player leaving just vacates their seat; the
    /// host leaving closes the room outright rather than migrating, since
    /// nobody else has yet invested in setting it up (§4.7).
    fn leave_room(&mut self, player_id: &PlayerId) -> Result<(), RoomError> {
        if self.in_progress() {
            return self.leave_game(player_id);
        }
        let was_host = self.host.as_ref() == Some(player_id);
        let before = self.roster.len();
        self.roster.retain(|p| &p.id != player_id);
        if self.roster.len() == before {
            return Err(RoomError::UnknownPlayer(player_id.clone()));
        }
        for (seat, player) in self.roster.iter_mut().enumerate() {
            player.seat = seat as u8;
        }
        self.connections.remove(player_id);
        self.connections.broadcast_with(|_| ServerMessage::PlayerLeft { player_id: player_id.clone() });
        if was_host {
            self.close("host left the lobby");
        } else {
            self.broadcast_room_update();
            self.maybe_schedule_idle_check();
        }
        Ok(())
    }

    /// Mid-game departure converts the seat to a bot rather than vacating it
    /// (§4.7) — the round is already dealt around four fixed seats.
    fn leave_game(&mut self, player_id: &PlayerId) -> Result<(), RoomError> {
        let Some(machine) = &mut self.machine else { return Err(RoomError::UnknownPlayer(player_id.clone())) };
        let player = machine.game.player_by_id_mut(player_id).ok_or_else(|| RoomError::UnknownPlayer(player_id.clone()))?;
        player.mark_disconnected();
        self.connections.disconnect(player_id);
        let player_name = player.name.clone();
        self.connections
            .broadcast_with(move |_| ServerMessage::PlayerDisconnected { player_name: player_name.clone(), can_reconnect: true, is_bot: true });
        self.migrate_host_if_needed(player_id);
        self.maybe_schedule_idle_check();
        Ok(())
    }

    fn migrate_host_if_needed(&mut self, departing: &PlayerId) {
        if self.host.as_ref() != Some(departing) {
            return;
        }
        let new_host = self.live_players().iter().find(|p| p.connected && p.id != *departing).map(|p| p.id.clone());
        if let Some(new_host) = new_host {
            let old_host = departing.clone();
            self.host = Some(new_host.clone());
            self.connections
                .broadcast_with(move |_| ServerMessage::HostChanged { old_host: old_host.clone(), new_host: new_host.clone() });
        } else {
            self.host = None;
        }
    }

    fn require_host(&self, requester: &PlayerId) -> Result<(), RoomError> {
        if self.host.as_ref() == Some(requester) {
            Ok(())
        } else {
            Err(RoomError::NotHost)
        }
    }

    fn start_game(&mut self, requester: &PlayerId, seed: u32) -> Result<EngineEvents, RoomError> {
        self.require_host(requester)?;
        if self.in_progress() {
            return Err(RoomError::AlreadyStarted);
        }
        if self.roster.len() < SEATS as usize {
            return Err(RoomError::NotEnoughPlayers);
        }
        let mut machine = GameMachine::new(self.roster.clone(), seed);
        let events = machine.start_game();
        self.machine = Some(machine);
        Ok(events)
    }

    fn reconnect(&mut self, player_id: &PlayerId) {
        if let Some(machine) = &mut self.machine {
            if let Some(player) = machine.game.player_by_id_mut(player_id) {
                if !player.connected {
                    player.mark_reconnected();
                    let player_name = player.name.clone();
                    self.connections.broadcast_with(move |_| ServerMessage::PlayerReconnected { player_name: player_name.clone() });
                }
            }
        }
    }

    fn dispatch_action(&mut self, player_id: &PlayerId, message: ClientMessage) {
        let action_type = message.action_type();
        let hash = self.state_hash();
        let now = self.now_ms();
        if self.dedup.check_and_record(player_id, action_type, hash, now) {
            return;
        }

        match message {
            ClientMessage::AddBot { slot } => {
                if let Err(e) = self.add_bot(player_id, slot) {
                    self.send_error(player_id, e.code(), e.to_string());
                }
            }
            ClientMessage::RemovePlayer { player_id: target } => {
                if let Err(e) = self.remove_player(player_id, &target) {
                    self.send_error(player_id, e.code(), e.to_string());
                }
            }
            ClientMessage::StartGame => {
                let seed = self.rng.gen_seed();
                match self.start_game(player_id, seed) {
                    Ok(events) => {
                        self.broadcast_engine_events(&events);
                        self.schedule_bot_actions();
                        self.schedule_redeal_timeouts();
                    }
                    Err(e) => self.send_error(player_id, e.code(), e.to_string()),
                }
            }
            ClientMessage::LeaveRoom => {
                if let Err(e) = self.leave_room(player_id) {
                    self.send_error(player_id, e.code(), e.to_string());
                }
            }
            ClientMessage::LeaveGame => {
                if let Err(e) = self.leave_game(player_id) {
                    self.send_error(player_id, e.code(), e.to_string());
                }
            }
            ClientMessage::Declare { value } => self.apply_engine(player_id, |m, pid| m.declare(pid, value)),
            ClientMessage::Play { piece_indices } => self.apply_engine(player_id, |m, pid| m.play(pid, &piece_indices)),
            ClientMessage::RedealDecision { accept } => self.apply_engine(player_id, |m, pid| m.redeal_decision(pid, accept)),
            ClientMessage::AcceptRedeal => self.apply_engine(player_id, |m, pid| m.redeal_decision(pid, true)),
            ClientMessage::DeclineRedeal => self.apply_engine(player_id, |m, pid| m.redeal_decision(pid, false)),
            ClientMessage::SyncRequest => self.resync(player_id),
            ClientMessage::RequestRedeal | ClientMessage::ClientReady { .. } | ClientMessage::Ping | ClientMessage::Ack => {}
            ClientMessage::CreateRoom | ClientMessage::JoinRoom { .. } => {
                self.send_error(player_id, "unexpected_message", "already joined this room".into())
            }
        }
    }

    fn apply_engine(&mut self, player_id: &PlayerId, f: impl FnOnce(&mut GameMachine, &PlayerId) -> Result<EngineEvents, ActionError>) {
        let Some(machine) = &mut self.machine else {
            self.send_error(player_id, "wrong_phase", "the game hasn't started yet".into());
            return;
        };
        match f(machine, player_id) {
            Ok(events) => {
                self.broadcast_engine_events(&events);
                if events.phase_changed {
                    self.schedule_bot_actions();
                    self.schedule_redeal_timeouts();
                }
            }
            Err(e) => self.send_error(player_id, e.code(), e.message()),
        }
    }

    fn resync(&mut self, player_id: &PlayerId) {
        if let Some(machine) = &self.machine {
            let message = broadcast::phase_change_for(&machine.game, player_id);
            self.connections.send(player_id, message);
        } else {
            self.broadcast_room_update();
        }
    }

    /// Rolls a delay for every bot seat with a pending decision and
    /// re-enqueues it onto this room's own inbox once the delay elapses —
    /// keeps bot pacing off the critical path of the triggering action.
    fn schedule_bot_actions(&mut self) {
        let Some(machine) = &self.machine else { return };
        let due = bot_scheduler::due_actions(&machine.game, &mut self.rng);
        for action in due {
            let delay = self.bot_delay();
            let tx = self.self_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(RoomInbound::Action { player_id: action.player_id, message: action.message });
            });
        }
    }

    /// Gives every weak-handed player with an undecided redeal a deadline
    /// (§5): a decline is auto-submitted through this room's own inbox if
    /// nothing arrives in time. A decision that already landed makes the
    /// late auto-decline a harmless no-op error reply.
    fn schedule_redeal_timeouts(&mut self) {
        let Some(machine) = &self.machine else { return };
        let PhaseData::Preparation(data) = &machine.game.phase else { return };
        for player_id in &data.weak_players {
            if data.decisions.contains_key(player_id) {
                continue;
            }
            let tx = self.self_tx.clone();
            let pid = player_id.clone();
            let timeout = self.config.redeal_timeout;
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                let _ = tx.send(RoomInbound::Action { player_id: pid, message: ClientMessage::RedealDecision { accept: false } });
            });
        }
    }

    fn bot_delay(&mut self) -> Duration {
        let min = self.config.bot_delay_min.as_millis() as u64;
        let max = self.config.bot_delay_max.as_millis() as u64;
        let span = max.saturating_sub(min).max(1);
        Duration::from_millis(min + self.rng.gen_range_u64(span))
    }
}

fn player_public(p: &Player) -> PlayerPublic {
    PlayerPublic {
        id: p.id.clone(),
        name: p.name.clone(),
        seat: p.seat,
        is_bot: p.is_bot,
        connected: p.connected,
        score: p.score,
        declared: p.declared,
        captured_piles: p.captured_piles,
        hand_count: p.hand.len(),
    }
}

fn final_scores(game: &liap_types::game::Game) -> Vec<liap_types::event::PlayerScoreLine> {
    game.players
        .iter()
        .map(|p| liap_types::event::PlayerScoreLine {
            player: p.id.clone(),
            declared: p.declared.unwrap_or(0),
            captured: p.captured_piles,
            round_score: 0,
            total_score: p.score,
        })
        .collect()
}

/// Small helpers over `rand::Rng` kept local so `rand`'s trait methods don't
/// have to be imported at every call site above.
trait RoomRng {
    fn gen_seed(&mut self) -> u32;
    fn gen_range_u64(&mut self, bound: u64) -> u64;
}

impl RoomRng for SmallRng {
    fn gen_seed(&mut self) -> u32 {
        use rand::Rng;
        self.random()
    }

    fn gen_range_u64(&mut self, bound: u64) -> u64 {
        use rand::Rng;
        self.random_range(0..bound)
    }
}

pub async fn run(
    room_id: RoomId,
    config: RoomConfig,
    mut inbox: UnboundedReceiver<RoomInbound>,
    self_tx: UnboundedSender<RoomInbound>,
    done: oneshot::Sender<()>,
) {
    let mut state = RoomState {
        room_id,
        dedup: DedupWindow::new(config.dedup_window.as_millis() as u64),
        config,
        host: None,
        roster: Vec::new(),
        machine: None,
        connections: ConnectionManager::new(100),
        rng: SmallRng::from_os_rng(),
        self_tx,
        started_at: Instant::now(),
        closed: false,
    };

    while let Some(msg) = inbox.recv().await {
        match msg {
            RoomInbound::Join { player_name, reply } => {
                let _ = reply.send(state.join(player_name));
            }
            RoomInbound::Action { player_id, message } => state.dispatch_action(&player_id, message),
            RoomInbound::Connect { player_id, sender } => {
                state.connections.connect(&player_id, sender);
                state.reconnect(&player_id);
            }
            RoomInbound::Disconnect { player_id } => {
                state.connections.disconnect(&player_id);
                if state.in_progress() {
                    let _ = state.leave_game(&player_id);
                } else if let Err(e) = state.leave_room(&player_id) {
                    tracing::debug!(player = %player_id, error = %e, "disconnect for unseated player");
                }
            }
            RoomInbound::Summary { reply } => {
                let _ = reply.send(state.summary());
            }
            RoomInbound::IdleCheck => {
                if !state.has_connected_human() {
                    state.close("idle grace period elapsed with no connected players");
                }
            }
        }
        if state.closed {
            break;
        }
    }

    let _ = done.send(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use liap_types::ids::RoomId;
    use tokio::sync::mpsc::unbounded_channel;

    fn new_state() -> RoomState {
        let (self_tx, _self_rx) = unbounded_channel();
        RoomState {
            room_id: RoomId::from("TEST01"),
            dedup: DedupWindow::new(100),
            config: RoomConfig::default(),
            host: None,
            roster: Vec::new(),
            machine: None,
            connections: ConnectionManager::new(100),
            rng: SmallRng::from_os_rng(),
            self_tx,
            started_at: Instant::now(),
            closed: false,
        }
    }

    #[test]
    fn first_join_becomes_host() {
        let mut state = new_state();
        let ack = state.join("Alice".into()).unwrap();
        assert!(ack.is_host);
        assert_eq!(ack.seat, 0);
        assert_eq!(state.host, Some(ack.player_id));
    }

    #[test]
    fn fifth_join_is_rejected() {
        let mut state = new_state();
        for name in ["A", "B", "C", "D"] {
            state.join(name.into()).unwrap();
        }
        assert_eq!(state.join("E".into()), Err(RoomError::RoomFull(state.room_id.clone())));
    }

    #[test]
    fn non_host_cannot_start_game() {
        let mut state = new_state();
        let host = state.join("Alice".into()).unwrap().player_id;
        let guest = state.join("Bob".into()).unwrap().player_id;
        state.join("Carl".into()).unwrap();
        state.join("Dee".into()).unwrap();
        assert_eq!(state.start_game(&guest, 1), Err(RoomError::NotHost));
        assert!(state.start_game(&host, 1).is_ok());
    }

    #[test]
    fn host_leaving_lobby_closes_room() {
        let mut state = new_state();
        let host = state.join("Alice".into()).unwrap().player_id;
        state.join("Bob".into()).unwrap();
        state.leave_room(&host).unwrap();
        assert!(state.closed);
    }

    #[test]
    fn guest_leaving_lobby_does_not_close_room() {
        let mut state = new_state();
        state.join("Alice".into()).unwrap();
        let guest = state.join("Bob".into()).unwrap().player_id;
        state.leave_room(&guest).unwrap();
        assert!(!state.closed);
    }

    #[test]
    fn host_migrates_when_host_disconnects_mid_game() {
        let mut state = new_state();
        let host = state.join("Alice".into()).unwrap().player_id;
        let next = state.join("Bob".into()).unwrap().player_id;
        state.join("Carl".into()).unwrap();
        state.join("Dee".into()).unwrap();
        state.start_game(&host, 1).unwrap();
        state.leave_game(&host).unwrap();
        assert_eq!(state.host, Some(next));
    }

    // Needs a runtime because the last `leave_game` call finds zero connected
    // humans and arms the idle-check timer via `tokio::spawn`.
    #[tokio::test]
    async fn idle_check_closes_room_with_no_connected_humans() {
        let mut state = new_state();
        let host = state.join("Alice".into()).unwrap().player_id;
        state.join("Bob".into()).unwrap();
        state.join("Carl".into()).unwrap();
        state.join("Dee".into()).unwrap();
        state.start_game(&host, 1).unwrap();
        for p in state.roster.clone() {
            state.leave_game(&p.id).unwrap();
        }
        assert!(!state.has_connected_human());
    }
}
