//! Submission effects. Every form submit ends in exactly one call on an
//! [`AuthBackend`]; the forms wrap that call with their guard, timeout and
//! cancellation, so implementations only need to do the request itself.

use crate::forms::{LoginCredentials, PersonalInfo, PhoneNumber, Registration, Verification};
use serde::Serialize;
use std::{fmt, future::Future, time::Duration};
use thiserror::Error;
use tokio::time::sleep;
use tracing::debug;

/// Failure of a submission effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// Names the backend call a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Login,
    SendOtp,
    VerifyOtp,
    CompleteRegistration,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::SendOtp => "send_otp",
            Self::VerifyOtp => "verify_otp",
            Self::CompleteRegistration => "complete_registration",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

pub trait AuthBackend: Send + Sync {
    fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> impl Future<Output = Result<(), EffectError>> + Send;

    /// Sends a verification code to the phone in `personal`. Also used for resends.
    fn send_otp(
        &self,
        personal: &PersonalInfo,
    ) -> impl Future<Output = Result<(), EffectError>> + Send;

    fn verify_otp(
        &self,
        phone: &PhoneNumber,
        verification: &Verification,
    ) -> impl Future<Output = Result<(), EffectError>> + Send;

    fn complete_registration(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<(), EffectError>> + Send;
}

/// Stand-in for the storefront API: waits `delay` and succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    async fn settle(&self, operation: Operation) -> Result<(), EffectError> {
        sleep(self.delay).await;
        debug!(%operation, delay_ms = self.delay.as_millis(), "simulated call settled");
        Ok(())
    }
}

impl AuthBackend for SimulatedBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<(), EffectError> {
        debug!(phone = %credentials.phone().masked(), "login requested");
        self.settle(Operation::Login).await
    }

    async fn send_otp(&self, personal: &PersonalInfo) -> Result<(), EffectError> {
        debug!(phone = %personal.phone().masked(), "verification code requested");
        self.settle(Operation::SendOtp).await
    }

    async fn verify_otp(
        &self,
        phone: &PhoneNumber,
        _verification: &Verification,
    ) -> Result<(), EffectError> {
        debug!(phone = %phone.masked(), "verification code submitted");
        self.settle(Operation::VerifyOtp).await
    }

    async fn complete_registration(&self, registration: &Registration) -> Result<(), EffectError> {
        debug!(
            phone = %registration.personal().phone().masked(),
            has_email = registration.personal().email().is_some(),
            "registration submitted"
        );
        self.settle(Operation::CompleteRegistration).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{LoginInput, Schema};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn simulated_backend_waits_for_the_configured_delay() -> anyhow::Result<()> {
        let backend = SimulatedBackend::new(Duration::from_millis(1_000));
        let credentials = LoginInput::new("09123456789", "secret123")
            .validate()
            .map_err(|errors| anyhow::anyhow!("{errors}"))?;

        let started = Instant::now();
        backend.login(&credentials).await?;

        assert!(started.elapsed() >= Duration::from_millis(1_000));
        Ok(())
    }

    #[test]
    fn effect_errors_render_their_cause() {
        assert_eq!(
            EffectError::Timeout(Duration::from_secs(10)).to_string(),
            "timed out after 10s"
        );
        assert_eq!(
            EffectError::Rejected("invalid code".to_string()).to_string(),
            "rejected: invalid code"
        );
        assert_eq!(Operation::CompleteRegistration.to_string(), "complete_registration");
    }
}
