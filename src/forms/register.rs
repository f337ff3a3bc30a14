//! Registration wizard: personal info, OTP confirmation, password setup.
//!
//! Flow Overview:
//! 1) Personal info is validated, a code is sent, the draft gains the record.
//! 2) The code is validated and verified, the draft becomes `Verified`.
//! 3) Passwords are validated, the full record is submitted, the draft is
//!    dropped and the user is sent to the login page.
//!
//! `retreat` walks back one step without validating and without touching the
//! draft; the revisited sub-form is re-initialized from the draft via the
//! `*_prefill` accessors. Re-submitting an earlier step overwrites that step in
//! the draft and keeps anything already held for later steps.

use crate::{
    backend::{AuthBackend, EffectError, Operation},
    forms::{
        PasswordInput, PasswordSetup, PersonalInfo, PersonalInfoInput, Schema, SubmitOutcome,
        Verification, VerificationInput,
        submit::{Attempt, FormServices, SubmitGuard, attempt},
    },
    navigation::Destination,
};
use secrecy::SecretString;
use serde::Serialize;
use std::{
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    PersonalInfo = 1,
    ConfirmOtp = 2,
    SetPassword = 3,
}

impl WizardStep {
    pub const ALL: [Self; 3] = [Self::PersonalInfo, Self::ConfirmOtp, Self::SetPassword];

    /// 1-based position shown in the step indicator.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PersonalInfo => Some(Self::ConfirmOtp),
            Self::ConfirmOtp => Some(Self::SetPassword),
            Self::SetPassword => None,
        }
    }

    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::PersonalInfo => None,
            Self::ConfirmOtp => Some(Self::PersonalInfo),
            Self::SetPassword => Some(Self::ConfirmOtp),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PersonalInfo => "personal_info",
            Self::ConfirmOtp => "confirm_otp",
            Self::SetPassword => "set_password",
        };
        formatter.write_str(name)
    }
}

/// Registration data accumulated so far, indexed by the furthest step reached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RegistrationDraft {
    #[default]
    Empty,
    PersonalInfo {
        personal: PersonalInfo,
    },
    Verified {
        personal: PersonalInfo,
        verification: Verification,
    },
}

impl RegistrationDraft {
    /// Replaces the personal info; a verification already held is kept.
    #[must_use]
    pub fn with_personal(self, personal: PersonalInfo) -> Self {
        match self {
            Self::Verified { verification, .. } => Self::Verified {
                personal,
                verification,
            },
            Self::Empty | Self::PersonalInfo { .. } => Self::PersonalInfo { personal },
        }
    }

    /// Adds or replaces the verification. `None` when there is no personal info
    /// to attach it to.
    #[must_use]
    pub fn with_verification(self, verification: Verification) -> Option<Self> {
        match self {
            Self::Empty => None,
            Self::PersonalInfo { personal } | Self::Verified { personal, .. } => {
                Some(Self::Verified {
                    personal,
                    verification,
                })
            }
        }
    }

    /// Builds the final record. `None` unless both earlier steps are held.
    #[must_use]
    pub fn complete(&self, setup: PasswordSetup) -> Option<Registration> {
        match self {
            Self::Verified {
                personal,
                verification,
            } => Some(Registration {
                personal: personal.clone(),
                verification: verification.clone(),
                password: setup.into_password(),
            }),
            Self::Empty | Self::PersonalInfo { .. } => None,
        }
    }

    #[must_use]
    pub fn personal(&self) -> Option<&PersonalInfo> {
        match self {
            Self::Empty => None,
            Self::PersonalInfo { personal } | Self::Verified { personal, .. } => Some(personal),
        }
    }

    #[must_use]
    pub fn verification(&self) -> Option<&Verification> {
        match self {
            Self::Verified { verification, .. } => Some(verification),
            Self::Empty | Self::PersonalInfo { .. } => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Everything the backend needs to create the account.
#[derive(Debug)]
pub struct Registration {
    personal: PersonalInfo,
    verification: Verification,
    password: SecretString,
}

impl Registration {
    #[must_use]
    pub fn personal(&self) -> &PersonalInfo {
        &self.personal
    }

    #[must_use]
    pub fn verification(&self) -> &Verification {
        &self.verification
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

/// Renders a cooldown as `MM:SS`, rounding partial seconds up.
#[must_use]
pub fn format_countdown(remaining: Duration) -> String {
    let seconds = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Default)]
struct WizardState {
    step: WizardStep,
    draft: RegistrationDraft,
    code_sent_at: Option<Instant>,
}

pub struct RegistrationWizard<B> {
    id: Uuid,
    services: FormServices<B>,
    guard: SubmitGuard,
    lifetime: CancellationToken,
    state: Mutex<WizardState>,
}

impl<B: AuthBackend> RegistrationWizard<B> {
    #[must_use]
    pub fn new(services: FormServices<B>) -> Self {
        let lifetime = services.form_lifetime();
        Self {
            id: Uuid::new_v4(),
            services,
            guard: SubmitGuard::default(),
            lifetime,
            state: Mutex::new(WizardState::default()),
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn current_step(&self) -> WizardStep {
        self.state().step
    }

    /// Snapshot of the accumulated data.
    #[must_use]
    pub fn draft(&self) -> RegistrationDraft {
        self.state().draft.clone()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.guard.is_held()
    }

    /// True once the wizard finished, was left, or was torn down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Step 1 values to show when the user comes back to it.
    #[must_use]
    pub fn personal_info_prefill(&self) -> PersonalInfoInput {
        self.state()
            .draft
            .personal()
            .map(PersonalInfoInput::from)
            .unwrap_or_default()
    }

    /// Step 2 value to show when the user comes back to it.
    #[must_use]
    pub fn otp_prefill(&self) -> VerificationInput {
        self.state()
            .draft
            .verification()
            .map(VerificationInput::from)
            .unwrap_or_default()
    }

    /// Time left before another code may be requested, if any.
    #[must_use]
    pub fn resend_countdown(&self) -> Option<Duration> {
        let sent_at = self.state().code_sent_at?;
        let remaining = self
            .services
            .config()
            .resend_cooldown()
            .saturating_sub(sent_at.elapsed());
        (!remaining.is_zero()).then_some(remaining)
    }

    #[instrument(skip_all, fields(form = %self.id))]
    pub async fn submit_personal_info(&self, input: PersonalInfoInput) -> SubmitOutcome {
        if let Some(outcome) = self.precheck(WizardStep::PersonalInfo) {
            return outcome;
        }

        let personal = match input.validate() {
            Ok(personal) => personal,
            Err(errors) => {
                debug!(%errors, "personal info rejected by validation");
                return SubmitOutcome::Invalid(errors);
            }
        };

        let Some(_submitting) = self.guard.try_acquire() else {
            return SubmitOutcome::Busy;
        };
        if let Some(outcome) = self.precheck(WizardStep::PersonalInfo) {
            return outcome;
        }

        info!(phone = %personal.phone().masked(), "requesting verification code");
        let effect = self.services.backend().send_otp(&personal);

        match attempt(&self.lifetime, self.timeout(), effect).await {
            Attempt::Succeeded => {
                let mut state = self.state();
                if self.lifetime.is_cancelled() {
                    return SubmitOutcome::Cancelled;
                }
                state.draft = std::mem::take(&mut state.draft).with_personal(personal);
                state.code_sent_at = Some(Instant::now());
                state.step = WizardStep::ConfirmOtp;
                SubmitOutcome::Advanced(WizardStep::ConfirmOtp)
            }
            Attempt::Failed(error) => self.failed(Operation::SendOtp, &error),
            Attempt::Cancelled => SubmitOutcome::Cancelled,
        }
    }

    #[instrument(skip_all, fields(form = %self.id))]
    pub async fn submit_otp(&self, input: VerificationInput) -> SubmitOutcome {
        if let Some(outcome) = self.precheck(WizardStep::ConfirmOtp) {
            return outcome;
        }

        let verification = match input.validate() {
            Ok(verification) => verification,
            Err(errors) => {
                debug!(%errors, "verification code rejected by validation");
                return SubmitOutcome::Invalid(errors);
            }
        };

        let Some(_submitting) = self.guard.try_acquire() else {
            return SubmitOutcome::Busy;
        };
        if let Some(outcome) = self.precheck(WizardStep::ConfirmOtp) {
            return outcome;
        }

        let personal = self.state().draft.personal().cloned();
        let Some(personal) = personal else {
            return self.missing_earlier_step(WizardStep::PersonalInfo);
        };

        info!(phone = %personal.phone().masked(), "verifying code");
        let effect = self
            .services
            .backend()
            .verify_otp(personal.phone(), &verification);

        match attempt(&self.lifetime, self.timeout(), effect).await {
            Attempt::Succeeded => {
                let mut state = self.state();
                if self.lifetime.is_cancelled() {
                    return SubmitOutcome::Cancelled;
                }
                match state.draft.clone().with_verification(verification) {
                    Some(verified) => {
                        state.draft = verified;
                        state.step = WizardStep::SetPassword;
                        SubmitOutcome::Advanced(WizardStep::SetPassword)
                    }
                    None => {
                        drop(state);
                        self.missing_earlier_step(WizardStep::PersonalInfo)
                    }
                }
            }
            Attempt::Failed(error) => self.failed(Operation::VerifyOtp, &error),
            Attempt::Cancelled => SubmitOutcome::Cancelled,
        }
    }

    #[instrument(skip_all, fields(form = %self.id))]
    pub async fn submit_password(&self, input: PasswordInput) -> SubmitOutcome {
        if let Some(outcome) = self.precheck(WizardStep::SetPassword) {
            return outcome;
        }

        let setup = match input.validate() {
            Ok(setup) => setup,
            Err(errors) => {
                debug!(%errors, "password setup rejected by validation");
                return SubmitOutcome::Invalid(errors);
            }
        };

        let Some(_submitting) = self.guard.try_acquire() else {
            return SubmitOutcome::Busy;
        };
        if let Some(outcome) = self.precheck(WizardStep::SetPassword) {
            return outcome;
        }

        let registration = self.state().draft.complete(setup);
        let Some(registration) = registration else {
            return self.missing_earlier_step(WizardStep::ConfirmOtp);
        };

        info!(
            phone = %registration.personal().phone().masked(),
            "completing registration"
        );
        let effect = self.services.backend().complete_registration(&registration);

        match attempt(&self.lifetime, self.timeout(), effect).await {
            Attempt::Succeeded => {
                if !self.finish() {
                    return SubmitOutcome::Cancelled;
                }
                info!("registration completed");
                self.services.navigator().navigate(Destination::Login);
                SubmitOutcome::Completed
            }
            Attempt::Failed(error) => self.failed(Operation::CompleteRegistration, &error),
            Attempt::Cancelled => SubmitOutcome::Cancelled,
        }
    }

    /// Requests a fresh code for the drafted phone once the cooldown is over.
    #[instrument(skip_all, fields(form = %self.id))]
    pub async fn resend_code(&self) -> SubmitOutcome {
        if let Some(outcome) = self.precheck(WizardStep::ConfirmOtp) {
            return outcome;
        }
        if let Some(remaining) = self.resend_countdown() {
            debug!(remaining = %format_countdown(remaining), "resend throttled");
            return SubmitOutcome::Throttled { remaining };
        }

        let Some(_submitting) = self.guard.try_acquire() else {
            return SubmitOutcome::Busy;
        };
        if let Some(outcome) = self.precheck(WizardStep::ConfirmOtp) {
            return outcome;
        }

        let personal = self.state().draft.personal().cloned();
        let Some(personal) = personal else {
            return self.missing_earlier_step(WizardStep::PersonalInfo);
        };

        info!(phone = %personal.phone().masked(), "resending verification code");
        let effect = self.services.backend().send_otp(&personal);

        match attempt(&self.lifetime, self.timeout(), effect).await {
            Attempt::Succeeded => {
                let mut state = self.state();
                if self.lifetime.is_cancelled() {
                    return SubmitOutcome::Cancelled;
                }
                state.code_sent_at = Some(Instant::now());
                SubmitOutcome::Resent
            }
            Attempt::Failed(error) => self.failed(Operation::SendOtp, &error),
            Attempt::Cancelled => SubmitOutcome::Cancelled,
        }
    }

    /// Goes back one step without validating. No-op on the first step, after
    /// the wizard closed, and while a submission is pending. Returns the step
    /// the wizard is on afterwards.
    pub fn retreat(&self) -> WizardStep {
        let mut state = self.state();
        if self.is_closed() || self.guard.is_held() {
            return state.step;
        }
        if let Some(previous) = state.step.previous() {
            debug!(form = %self.id, from = %state.step, to = %previous, "retreat");
            state.step = previous;
        }
        state.step
    }

    /// Follows the "already have an account" link, shown only on the first
    /// step. Returns whether it navigated.
    pub fn sign_in_instead(&self) -> bool {
        if self.is_closed() || self.current_step() != WizardStep::PersonalInfo {
            return false;
        }
        self.close();
        self.services.navigator().navigate(Destination::Login);
        true
    }

    /// Ends the wizard's lifetime and drops the draft. A pending submission is
    /// abandoned without touching state or navigating.
    pub fn teardown(&self) {
        debug!(form = %self.id, "registration wizard torn down");
        self.close();
    }

    fn close(&self) {
        self.lifetime.cancel();
        let mut state = self.state();
        state.draft = RegistrationDraft::Empty;
        state.code_sent_at = None;
    }

    /// Closes the wizard after the last step. `false` if a teardown got there
    /// first.
    fn finish(&self) -> bool {
        let mut state = self.state();
        if self.lifetime.is_cancelled() {
            return false;
        }
        self.lifetime.cancel();
        state.draft = RegistrationDraft::Empty;
        state.code_sent_at = None;
        true
    }

    fn precheck(&self, expected: WizardStep) -> Option<SubmitOutcome> {
        if self.is_closed() {
            return Some(SubmitOutcome::Closed);
        }
        let current = self.current_step();
        (current != expected).then_some(SubmitOutcome::StepMismatch { expected, current })
    }

    fn missing_earlier_step(&self, expected: WizardStep) -> SubmitOutcome {
        let current = self.current_step();
        warn!(form = %self.id, %current, %expected, "draft is missing an earlier step");
        SubmitOutcome::StepMismatch { expected, current }
    }

    fn failed(&self, operation: Operation, error: &EffectError) -> SubmitOutcome {
        self.services.diagnostics().report(operation, error);
        SubmitOutcome::Failed
    }

    fn timeout(&self) -> Duration {
        self.services.config().submit_timeout()
    }

    fn state(&self) -> MutexGuard<'_, WizardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
