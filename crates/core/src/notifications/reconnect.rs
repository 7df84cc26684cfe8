use std::time::Duration;

pub const DEFAULT_RECONNECT_BASE: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Authenticated,
}

/// Linear backoff: attempt `n` waits `n * base`, up to `max_attempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base: DEFAULT_RECONNECT_BASE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ReconnectPolicy {
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_attempts {
            return None;
        }
        Some(self.base * attempt)
    }
}

/// Client-side connection lifecycle with a bounded retry budget.
#[derive(Debug, Clone)]
pub struct Reconnector {
    policy: ReconnectPolicy,
    state: ConnectionState,
    attempts: u32,
}

impl Reconnector {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: ConnectionState::Disconnected,
            attempts: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn on_connecting(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// A successful authentication restores the full retry budget.
    pub fn on_authenticated(&mut self) {
        self.state = ConnectionState::Authenticated;
        self.attempts = 0;
    }

    /// Records a lost or failed connection and returns how long to wait
    /// before the next attempt; `None` means stop. Clean closes never retry.
    pub fn on_disconnected(&mut self, clean: bool) -> Option<Duration> {
        self.state = ConnectionState::Disconnected;

        if clean {
            return None;
        }

        self.attempts += 1;
        self.policy.delay_for(self.attempts)
    }
}
