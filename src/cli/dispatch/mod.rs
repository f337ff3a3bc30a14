use crate::{
    cli::{
        actions::{Action, login, register},
        commands,
    },
    config::FormConfig,
};
use anyhow::{Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::time::Duration;

/// # Errors
/// Returns an error if the subcommand is unknown or a required argument is missing.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let config = form_config(matches)?;

    match matches.subcommand() {
        Some((commands::login::COMMAND, sub_m)) => Ok(Action::Login(login::Args {
            config,
            phone: required(sub_m, commands::login::ARG_PHONE)?,
            password: SecretString::from(required(sub_m, commands::login::ARG_PASSWORD)?),
        })),
        Some((commands::register::COMMAND, sub_m)) => Ok(Action::Register(register::Args {
            config,
            first_name: required(sub_m, commands::register::ARG_FIRST_NAME)?,
            last_name: required(sub_m, commands::register::ARG_LAST_NAME)?,
            phone: required(sub_m, commands::register::ARG_PHONE)?,
            email: sub_m
                .get_one::<String>(commands::register::ARG_EMAIL)
                .cloned()
                .unwrap_or_default(),
            otp: required(sub_m, commands::register::ARG_OTP)?,
            password: SecretString::from(required(sub_m, commands::register::ARG_PASSWORD)?),
            confirm_password: SecretString::from(required(
                sub_m,
                commands::register::ARG_CONFIRM_PASSWORD,
            )?),
        })),
        Some((name, _)) => anyhow::bail!("unknown command: {name}"),
        None => anyhow::bail!("missing command"),
    }
}

fn form_config(matches: &ArgMatches) -> Result<FormConfig> {
    let delay = matches
        .get_one::<u64>(commands::forms::ARG_SUBMIT_DELAY_MS)
        .copied()
        .context("missing required argument: --submit-delay-ms")?;
    let timeout = matches
        .get_one::<u64>(commands::forms::ARG_SUBMIT_TIMEOUT_SECS)
        .copied()
        .context("missing required argument: --submit-timeout-secs")?;
    let cooldown = matches
        .get_one::<u64>(commands::forms::ARG_RESEND_COOLDOWN_SECS)
        .copied()
        .context("missing required argument: --resend-cooldown-secs")?;

    Ok(FormConfig::new()
        .with_submit_delay(Duration::from_millis(delay))
        .with_submit_timeout(Duration::from_secs(timeout))
        .with_resend_cooldown(Duration::from_secs(cooldown)))
}

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}
