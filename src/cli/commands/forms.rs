use clap::{Arg, Command};

pub const ARG_SUBMIT_DELAY_MS: &str = "submit-delay-ms";
pub const ARG_SUBMIT_TIMEOUT_SECS: &str = "submit-timeout-secs";
pub const ARG_RESEND_COOLDOWN_SECS: &str = "resend-cooldown-secs";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SUBMIT_DELAY_MS)
                .long(ARG_SUBMIT_DELAY_MS)
                .help("Delay of the simulated backend, in milliseconds")
                .default_value("1000")
                .env("STOREFRONT_AUTH_SUBMIT_DELAY_MS")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SUBMIT_TIMEOUT_SECS)
                .long(ARG_SUBMIT_TIMEOUT_SECS)
                .help("Upper bound for a single submission, in seconds")
                .default_value("10")
                .env("STOREFRONT_AUTH_SUBMIT_TIMEOUT_SECS")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_RESEND_COOLDOWN_SECS)
                .long(ARG_RESEND_COOLDOWN_SECS)
                .help("Wait before another verification code may be requested, in seconds")
                .default_value("120")
                .env("STOREFRONT_AUTH_RESEND_COOLDOWN_SECS")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
