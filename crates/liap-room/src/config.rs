//! Room tuning knobs (§10): conservative defaults, overridable via env vars
//! so a deployment can tighten them without a rebuild.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// How long a disconnected human keeps their seat before a permanent
    /// bot takeover (§4.6, §4.7).
    pub idle_grace_period: Duration,
    /// Dedup window for the action queue (§4.3).
    pub dedup_window: Duration,
    /// Minimum spacing between consecutive broadcasts to the same room.
    pub broadcast_cooldown: Duration,
    /// Bot "thinking time" is randomized within this range (§4.5).
    pub bot_delay_min: Duration,
    pub bot_delay_max: Duration,
    /// How long PREPARATION waits for a redeal decision before treating it
    /// as a decline.
    pub redeal_timeout: Duration,
    /// Cap on the per-player critical-event queue (§4.6).
    pub critical_queue_cap: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            idle_grace_period: Duration::from_secs(30),
            dedup_window: Duration::from_millis(100),
            broadcast_cooldown: Duration::from_millis(50),
            bot_delay_min: Duration::from_millis(500),
            bot_delay_max: Duration::from_millis(1500),
            redeal_timeout: Duration::from_secs(15),
            critical_queue_cap: 100,
        }
    }
}

impl RoomConfig {
    /// Overrides any field with a matching `LIAP_*_MS` / `LIAP_*_CAP` env
    /// var, falling back to the default on a missing or unparsable value.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.idle_grace_period = duration_ms_env("LIAP_IDLE_GRACE_MS", config.idle_grace_period);
        config.dedup_window = duration_ms_env("LIAP_DEDUP_WINDOW_MS", config.dedup_window);
        config.broadcast_cooldown = duration_ms_env("LIAP_BROADCAST_COOLDOWN_MS", config.broadcast_cooldown);
        config.bot_delay_min = duration_ms_env("LIAP_BOT_DELAY_MIN_MS", config.bot_delay_min);
        config.bot_delay_max = duration_ms_env("LIAP_BOT_DELAY_MAX_MS", config.bot_delay_max);
        config.redeal_timeout = duration_ms_env("LIAP_REDEAL_TIMEOUT_MS", config.redeal_timeout);
        config.critical_queue_cap = usize_env("LIAP_CRITICAL_QUEUE_CAP", config.critical_queue_cap);
        config
    }
}

fn duration_ms_env(key: &str, default: Duration) -> Duration {
    std::env::var(key).ok().and_then(|v| v.parse::<u64>().ok()).map(Duration::from_millis).unwrap_or(default)
}

fn usize_env(key: &str, default: usize) -> usize {
    std::env::var(key).ok().and_then(|v| v.parse::<usize>().ok()).unwrap_or(default)
}

/// `PORT` as read by the transport binary, kept here so the config story is
/// in one place even though `liap-room` itself never binds a socket.
pub fn listen_port() -> u16 {
    std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8080)
}
