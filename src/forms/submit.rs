//! Submission plumbing shared by both workflows: the collaborators a form needs,
//! the per-instance submitting guard and the timeout/cancellation wrapper put
//! around every backend call.

use crate::{
    backend::{AuthBackend, EffectError},
    config::FormConfig,
    diagnostics::DiagnosticSink,
    forms::{FieldErrors, WizardStep},
    navigation::Navigator,
};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// What a submit call did. Only `Invalid` carries anything the user should see;
/// `Failed` has already been reported to the diagnostic sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing else happened.
    Invalid(FieldErrors),
    /// Another submission on this form is still pending.
    Busy,
    /// The wizard moved forward to this step.
    Advanced(WizardStep),
    /// A new verification code was sent.
    Resent,
    /// The resend cooldown has not elapsed yet.
    Throttled { remaining: Duration },
    /// The workflow finished and navigated away.
    Completed,
    /// The backend call failed or timed out.
    Failed,
    /// The form was torn down while the backend call was pending.
    Cancelled,
    /// The form was torn down or already finished before the call.
    Closed,
    /// The submitted step is not the wizard's current step.
    StepMismatch {
        expected: WizardStep,
        current: WizardStep,
    },
}

impl SubmitOutcome {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "invalid",
            Self::Busy => "busy",
            Self::Advanced(_) => "advanced",
            Self::Resent => "resent",
            Self::Throttled { .. } => "throttled",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Closed => "closed",
            Self::StepMismatch { .. } => "step_mismatch",
        }
    }

    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Collaborators and settings handed to every form instance.
pub struct FormServices<B> {
    backend: Arc<B>,
    navigator: Arc<dyn Navigator>,
    diagnostics: Arc<dyn DiagnosticSink>,
    config: FormConfig,
    shutdown: CancellationToken,
}

impl<B> Clone for FormServices<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            navigator: Arc::clone(&self.navigator),
            diagnostics: Arc::clone(&self.diagnostics),
            config: self.config.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<B: AuthBackend> FormServices<B> {
    #[must_use]
    pub fn new(
        backend: Arc<B>,
        navigator: Arc<dyn Navigator>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            backend,
            navigator,
            diagnostics,
            config: FormConfig::default(),
            shutdown: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Ties every form built from these services to `shutdown`: cancelling it
    /// tears all of them down.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    #[must_use]
    pub fn diagnostics(&self) -> &dyn DiagnosticSink {
        self.diagnostics.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub(crate) fn form_lifetime(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

/// Per-form mutual exclusion around submit handlers: a single permit. Holding
/// the returned permit is the "submitting" state; dropping it on any exit path
/// clears it. Checking the state only reads the permit count.
#[derive(Debug)]
pub(crate) struct SubmitGuard {
    permit: Arc<Semaphore>,
}

impl Default for SubmitGuard {
    fn default() -> Self {
        Self {
            permit: Arc::new(Semaphore::new(1)),
        }
    }
}

impl SubmitGuard {
    pub(crate) fn try_acquire(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.permit).try_acquire_owned().ok()
    }

    pub(crate) fn is_held(&self) -> bool {
        self.permit.available_permits() == 0
    }
}

#[derive(Debug)]
pub(crate) enum Attempt {
    Succeeded,
    Failed(EffectError),
    Cancelled,
}

/// Runs one backend call bounded by `timeout` and abandoned when `lifetime`
/// is cancelled.
pub(crate) async fn attempt<F>(lifetime: &CancellationToken, timeout: Duration, effect: F) -> Attempt
where
    F: Future<Output = Result<(), EffectError>>,
{
    tokio::select! {
        biased;
        () = lifetime.cancelled() => Attempt::Cancelled,
        result = tokio::time::timeout(timeout, effect) => match result {
            Ok(Ok(())) => Attempt::Succeeded,
            Ok(Err(error)) => Attempt::Failed(error),
            Err(_) => Attempt::Failed(EffectError::Timeout(timeout)),
        },
    }
}
