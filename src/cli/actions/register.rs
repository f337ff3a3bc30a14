use crate::{
    backend::AuthBackend,
    cli::actions::{report::Report, services},
    config::FormConfig,
    forms::{
        PasswordInput, PersonalInfoInput, RegistrationWizard, SubmitOutcome, VerificationInput,
    },
};
use anyhow::{Result, bail};
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub config: FormConfig,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub otp: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// Execute the register action: submits each step in turn and stops at the
/// first one that does not advance.
/// # Errors
/// Returns an error if the registration does not complete.
pub async fn execute(args: Args) -> Result<()> {
    let (services, navigator) = services::build(args.config.clone());
    let wizard = RegistrationWizard::new(services);
    debug!(form = %wizard.id(), "registration wizard opened");

    let outcome = walk(&wizard, args).await;
    let step = (!wizard.is_closed()).then(|| wizard.current_step());

    Report::new("register", &outcome, step, navigator.last()).print()?;

    if outcome != SubmitOutcome::Completed {
        bail!(
            "registration stopped at step {}: {}",
            wizard.current_step().number(),
            outcome.label()
        );
    }

    Ok(())
}

async fn walk<B: AuthBackend>(
    wizard: &RegistrationWizard<B>,
    args: Args,
) -> SubmitOutcome {
    let outcome = wizard
        .submit_personal_info(PersonalInfoInput {
            first_name: args.first_name,
            last_name: args.last_name,
            phone: args.phone,
            email: args.email,
        })
        .await;
    if !matches!(outcome, SubmitOutcome::Advanced(_)) {
        return outcome;
    }

    let outcome = wizard.submit_otp(VerificationInput { otp: args.otp }).await;
    if !matches!(outcome, SubmitOutcome::Advanced(_)) {
        return outcome;
    }

    wizard
        .submit_password(PasswordInput {
            password: args.password,
            confirm_password: args.confirm_password,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn args(confirm_password: &str) -> Args {
        Args {
            config: FormConfig::new().with_submit_delay(Duration::ZERO),
            first_name: "Sara".to_string(),
            last_name: "Ahmadi".to_string(),
            phone: "09123456789".to_string(),
            email: String::new(),
            otp: "1234".to_string(),
            password: SecretString::from("hunter22".to_string()),
            confirm_password: SecretString::from(confirm_password.to_string()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn register_action_walks_every_step() {
        assert!(execute(args("hunter22")).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn register_action_fails_on_the_step_that_does_not_advance() {
        let error = execute(args("hunter23")).await.err().map(|e| e.to_string());
        assert_eq!(
            error.as_deref(),
            Some("registration stopped at step 3: invalid")
        );
    }
}
