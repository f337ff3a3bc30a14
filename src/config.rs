//! Tunables shared by the login form and the registration wizard.
//! Values are plain durations; nothing here is secret.

use std::time::Duration;

const DEFAULT_SUBMIT_DELAY_MS: u64 = 1_000;
const DEFAULT_SUBMIT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_RESEND_COOLDOWN_SECONDS: u64 = 2 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormConfig {
    submit_delay: Duration,
    submit_timeout: Duration,
    resend_cooldown: Duration,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FormConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            submit_delay: Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS),
            submit_timeout: Duration::from_secs(DEFAULT_SUBMIT_TIMEOUT_SECONDS),
            resend_cooldown: Duration::from_secs(DEFAULT_RESEND_COOLDOWN_SECONDS),
        }
    }

    /// Delay applied by the simulated backend before it resolves.
    #[must_use]
    pub const fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    /// Upper bound for a single submission effect.
    #[must_use]
    pub const fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_resend_cooldown(mut self, cooldown: Duration) -> Self {
        self.resend_cooldown = cooldown;
        self
    }

    #[must_use]
    pub const fn submit_delay(&self) -> Duration {
        self.submit_delay
    }

    #[must_use]
    pub const fn submit_timeout(&self) -> Duration {
        self.submit_timeout
    }

    #[must_use]
    pub const fn resend_cooldown(&self) -> Duration {
        self.resend_cooldown
    }
}
