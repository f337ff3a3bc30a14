use crate::{
    cli::actions::{report::Report, services},
    config::FormConfig,
    forms::{LoginForm, LoginInput, SubmitOutcome},
};
use anyhow::{Result, bail};
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub config: FormConfig,
    pub phone: String,
    pub password: SecretString,
}

/// Execute the login action.
/// # Errors
/// Returns an error if the login does not complete.
pub async fn execute(args: Args) -> Result<()> {
    let (services, navigator) = services::build(args.config);
    let form = LoginForm::new(services);
    debug!(form = %form.id(), "login form opened");

    let outcome = form
        .submit(LoginInput {
            phone: args.phone,
            password: args.password,
        })
        .await;

    Report::new("login", &outcome, None, navigator.last()).print()?;

    if outcome != SubmitOutcome::Completed {
        bail!("login did not complete: {}", outcome.label());
    }

    Ok(())
}
