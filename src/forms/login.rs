//! Login form: phone + password, one backend call, then home.
//!
//! Backend failures are reported to the diagnostic sink and otherwise swallowed;
//! the caller gets `SubmitOutcome::Failed` and the user gets no message, matching
//! the storefront's current behavior.

use crate::{
    backend::{AuthBackend, Operation},
    forms::{
        LoginInput, Schema, SubmitOutcome,
        submit::{Attempt, FormServices, SubmitGuard, attempt},
    },
    navigation::Destination,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub struct LoginForm<B> {
    id: Uuid,
    services: FormServices<B>,
    guard: SubmitGuard,
    lifetime: CancellationToken,
}

impl<B: AuthBackend> LoginForm<B> {
    #[must_use]
    pub fn new(services: FormServices<B>) -> Self {
        let lifetime = services.form_lifetime();
        Self {
            id: Uuid::new_v4(),
            services,
            guard: SubmitGuard::default(),
            lifetime,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// True while a submission holds the guard; bind the submit button to this.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.guard.is_held()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Validates `input` and, when it passes, signs the user in.
    #[instrument(skip_all, fields(form = %self.id))]
    pub async fn submit(&self, input: LoginInput) -> SubmitOutcome {
        if self.is_closed() {
            return SubmitOutcome::Closed;
        }

        let credentials = match input.validate() {
            Ok(credentials) => credentials,
            Err(errors) => {
                debug!(%errors, "login rejected by validation");
                return SubmitOutcome::Invalid(errors);
            }
        };

        let Some(_submitting) = self.guard.try_acquire() else {
            debug!("login already in flight");
            return SubmitOutcome::Busy;
        };

        info!(phone = %credentials.phone().masked(), "submitting login");
        let timeout = self.services.config().submit_timeout();
        let effect = self.services.backend().login(&credentials);

        match attempt(&self.lifetime, timeout, effect).await {
            Attempt::Succeeded if self.is_closed() => {
                debug!("login settled after teardown");
                SubmitOutcome::Cancelled
            }
            Attempt::Succeeded => {
                info!("login succeeded");
                self.services.navigator().navigate(Destination::Home);
                SubmitOutcome::Completed
            }
            Attempt::Failed(error) => {
                self.services.diagnostics().report(Operation::Login, &error);
                SubmitOutcome::Failed
            }
            Attempt::Cancelled => {
                debug!("login abandoned by teardown");
                SubmitOutcome::Cancelled
            }
        }
    }

    /// Follows the "forgot password" link. Leaving the page closes the form.
    pub fn forgot_password(&self) {
        self.leave(Destination::ForgotPassword);
    }

    /// Follows the "create account" link.
    pub fn create_account(&self) {
        self.leave(Destination::Register);
    }

    /// Ends the form's lifetime. A pending submission is abandoned without
    /// navigating.
    pub fn teardown(&self) {
        debug!(form = %self.id, "login form torn down");
        self.lifetime.cancel();
    }

    fn leave(&self, destination: Destination) {
        self.teardown();
        self.services.navigator().navigate(destination);
    }
}
