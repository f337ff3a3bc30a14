#![allow(dead_code)]

use secrecy::ExposeSecret;
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use storefront_auth::{
    backend::{AuthBackend, EffectError, Operation},
    config::FormConfig,
    diagnostics::DiagnosticSink,
    forms::{FormServices, LoginCredentials, PersonalInfo, PhoneNumber, Registration, Verification},
    navigation::{Destination, Navigator},
};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

pub const PHONE: &str = "09123456789";

/// A backend call as the fake saw it. Passwords are exposed here so tests can
/// assert on what would have been sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Login {
        phone: String,
        password: String,
    },
    SendOtp {
        personal: PersonalInfo,
    },
    VerifyOtp {
        phone: String,
        otp: String,
    },
    CompleteRegistration {
        personal: PersonalInfo,
        otp: String,
        password: String,
    },
}

impl Call {
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Login { .. } => Operation::Login,
            Self::SendOtp { .. } => Operation::SendOtp,
            Self::VerifyOtp { .. } => Operation::VerifyOtp,
            Self::CompleteRegistration { .. } => Operation::CompleteRegistration,
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    calls: Vec<Call>,
    failures: Vec<(Operation, EffectError)>,
    cancel_on_settle: Option<CancellationToken>,
}

/// Records every call, waits `delay`, then succeeds unless a failure was queued
/// for that operation.
#[derive(Clone, Debug, Default)]
pub struct FakeBackend {
    delay: Duration,
    script: Arc<Mutex<Script>>,
}

impl FakeBackend {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Makes the next call to `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: EffectError) {
        self.script().failures.push((operation, error));
    }

    /// Cancels `token` as each call settles, so the form sees a teardown that
    /// lands after the effect finished but before its result is applied.
    pub fn cancel_on_settle(&self, token: CancellationToken) {
        self.script().cancel_on_settle = Some(token);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script().calls.clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.script().calls.iter().map(Call::operation).collect()
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn record(&self, call: Call) -> Result<(), EffectError> {
        let operation = call.operation();
        let failure = {
            let mut script = self.script();
            script.calls.push(call);
            let position = script.failures.iter().position(|(op, _)| *op == operation);
            position.map(|index| script.failures.remove(index).1)
        };

        sleep(self.delay).await;
        if let Some(token) = self.script().cancel_on_settle.clone() {
            token.cancel();
        }
        failure.map_or(Ok(()), Err)
    }
}

impl AuthBackend for FakeBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<(), EffectError> {
        self.record(Call::Login {
            phone: credentials.phone().to_string(),
            password: credentials.password().expose_secret().to_string(),
        })
        .await
    }

    async fn send_otp(&self, personal: &PersonalInfo) -> Result<(), EffectError> {
        self.record(Call::SendOtp {
            personal: personal.clone(),
        })
        .await
    }

    async fn verify_otp(
        &self,
        phone: &PhoneNumber,
        verification: &Verification,
    ) -> Result<(), EffectError> {
        self.record(Call::VerifyOtp {
            phone: phone.to_string(),
            otp: verification.otp().to_string(),
        })
        .await
    }

    async fn complete_registration(&self, registration: &Registration) -> Result<(), EffectError> {
        self.record(Call::CompleteRegistration {
            personal: registration.personal().clone(),
            otp: registration.verification().otp().to_string(),
            password: registration.password().expose_secret().to_string(),
        })
        .await
    }
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<Destination>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<Destination> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination) {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(destination);
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<(Operation, EffectError)>>,
}

impl RecordingSink {
    pub fn reports(&self) -> Vec<(Operation, EffectError)> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, operation: Operation, error: &EffectError) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((operation, error.clone()));
    }
}

/// Everything a test needs to drive a form and inspect its side effects.
pub struct Harness {
    pub backend: FakeBackend,
    pub navigator: Arc<RecordingNavigator>,
    pub sink: Arc<RecordingSink>,
    pub services: FormServices<FakeBackend>,
}

impl Harness {
    pub fn new(delay: Duration) -> Self {
        Self::with_config(delay, FormConfig::default())
    }

    pub fn with_config(delay: Duration, config: FormConfig) -> Self {
        let backend = FakeBackend::with_delay(delay);
        let navigator = Arc::new(RecordingNavigator::default());
        let sink = Arc::new(RecordingSink::default());
        let services = FormServices::new(
            Arc::new(backend.clone()),
            navigator.clone(),
            sink.clone(),
        )
        .with_config(config);

        Self {
            backend,
            navigator,
            sink,
            services,
        }
    }
}
