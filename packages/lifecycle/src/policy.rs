//! Retry and cadence policies: the bounded station join budget and the
//! broker keep-alive ping cadence.

pub const JOIN_ATTEMPTS_DEFAULT: u32 = 40;
pub const JOIN_POLL_INTERVAL_DEFAULT_MS: u32 = 500;

/// Whether a quiet broker session needs a ping. QoS0 telemetry is the only
/// regular outbound traffic, and it stops entirely while the wall clock is
/// unsynced; pinging at half the negotiated keep-alive keeps the broker from
/// dropping the connection for inactivity during those stretches.
pub const fn keep_alive_ping_due(idle_ms: u64, keep_alive_secs: u16) -> bool {
    idle_ms >= keep_alive_secs as u64 * 1_000 / 2
}

/// Bounded join budget: the connectivity manager polls the link once per
/// interval and gives up after the configured number of attempts, escalating
/// to factory reset so bad credentials can never brick the device.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct JoinPolicy {
    pub attempts: u32,
    pub poll_interval_ms: u32,
}

impl JoinPolicy {
    pub const fn defaults() -> Self {
        Self {
            attempts: JOIN_ATTEMPTS_DEFAULT,
            poll_interval_ms: JOIN_POLL_INTERVAL_DEFAULT_MS,
        }
    }

    pub const fn sanitized(self) -> Self {
        Self {
            attempts: clamp_u32(self.attempts, 1, 600),
            poll_interval_ms: clamp_u32(self.poll_interval_ms, 100, 10_000),
        }
    }

    pub const fn budget_ms(self) -> u64 {
        self.attempts as u64 * self.poll_interval_ms as u64
    }
}

impl Default for JoinPolicy {
    fn default() -> Self {
        Self::defaults()
    }
}

const fn clamp_u32(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
