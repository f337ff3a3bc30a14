use clap::{Arg, Command};

pub const COMMAND: &str = "login";
pub const ARG_PHONE: &str = "phone";
pub const ARG_PASSWORD: &str = "password";

#[must_use]
pub fn command() -> Command {
    Command::new(COMMAND)
        .about("Sign in with a mobile number and password")
        .arg(
            Arg::new(ARG_PHONE)
                .long(ARG_PHONE)
                .help("Mobile number, e.g. 09123456789")
                .env("STOREFRONT_AUTH_PHONE")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long(ARG_PASSWORD)
                .help("Account password")
                .env("STOREFRONT_AUTH_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
}
