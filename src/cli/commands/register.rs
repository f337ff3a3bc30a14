use clap::{Arg, Command};

pub const COMMAND: &str = "register";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_PHONE: &str = "phone";
pub const ARG_EMAIL: &str = "email";
pub const ARG_OTP: &str = "otp";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";

#[must_use]
pub fn command() -> Command {
    Command::new(COMMAND)
        .about("Walk the three-step registration wizard")
        .long_about(
            "Walk the three-step registration wizard: personal info, verification code, password. \
             Stops at the first step that does not advance.",
        )
        .arg(
            Arg::new(ARG_FIRST_NAME)
                .long(ARG_FIRST_NAME)
                .help("First name")
                .required(true),
        )
        .arg(
            Arg::new(ARG_LAST_NAME)
                .long(ARG_LAST_NAME)
                .help("Last name")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PHONE)
                .long(ARG_PHONE)
                .help("Mobile number, e.g. 09123456789")
                .env("STOREFRONT_AUTH_PHONE")
                .required(true),
        )
        .arg(
            Arg::new(ARG_EMAIL)
                .long(ARG_EMAIL)
                .help("Email address (optional)"),
        )
        .arg(
            Arg::new(ARG_OTP)
                .long(ARG_OTP)
                .help("Verification code received by SMS")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long(ARG_PASSWORD)
                .help("New password")
                .env("STOREFRONT_AUTH_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_CONFIRM_PASSWORD)
                .long(ARG_CONFIRM_PASSWORD)
                .help("New password, again")
                .env("STOREFRONT_AUTH_CONFIRM_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}
