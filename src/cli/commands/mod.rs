pub mod forms;
pub mod logging;
pub mod login;
pub mod register;

use clap::{
    ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("storefront-auth")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(login::command())
        .subcommand(register::command());

    let command = forms::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_args() -> Vec<&'static str> {
        vec![
            "storefront-auth",
            "register",
            "--first-name",
            "Sara",
            "--last-name",
            "Ahmadi",
            "--phone",
            "09123456789",
            "--otp",
            "1234",
            "--password",
            "hunter22",
            "--confirm-password",
            "hunter22",
        ]
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "storefront-auth");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_login_args() {
        temp_env::with_vars(
            [
                ("STOREFRONT_AUTH_PHONE", None::<&str>),
                ("STOREFRONT_AUTH_PASSWORD", None::<&str>),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "storefront-auth",
                    "login",
                    "--phone",
                    "09123456789",
                    "--password",
                    "secret123",
                ]);
                let login = matches.subcommand_matches(login::COMMAND);
                assert_eq!(
                    login.and_then(|m| m.get_one::<String>(login::ARG_PHONE).cloned()),
                    Some("09123456789".to_string())
                );
                assert_eq!(
                    login.and_then(|m| m.get_one::<String>(login::ARG_PASSWORD).cloned()),
                    Some("secret123".to_string())
                );
            },
        );
    }

    #[test]
    fn test_login_env() {
        temp_env::with_vars(
            [
                ("STOREFRONT_AUTH_PHONE", Some("09120000000")),
                ("STOREFRONT_AUTH_PASSWORD", Some("from-env")),
                ("STOREFRONT_AUTH_SUBMIT_DELAY_MS", Some("5")),
                ("STOREFRONT_AUTH_SUBMIT_TIMEOUT_SECS", Some("3")),
                ("STOREFRONT_AUTH_RESEND_COOLDOWN_SECS", Some("30")),
                ("STOREFRONT_AUTH_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["storefront-auth", "login"]);
                assert_eq!(
                    matches.get_one::<u64>(forms::ARG_SUBMIT_DELAY_MS).copied(),
                    Some(5)
                );
                assert_eq!(
                    matches.get_one::<u64>(forms::ARG_SUBMIT_TIMEOUT_SECS).copied(),
                    Some(3)
                );
                assert_eq!(
                    matches.get_one::<u64>(forms::ARG_RESEND_COOLDOWN_SECS).copied(),
                    Some(30)
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
                let login = matches.subcommand_matches(login::COMMAND);
                assert_eq!(
                    login.and_then(|m| m.get_one::<String>(login::ARG_PHONE).cloned()),
                    Some("09120000000".to_string())
                );
            },
        );
    }

    #[test]
    fn test_form_defaults() {
        temp_env::with_vars(
            [
                ("STOREFRONT_AUTH_SUBMIT_DELAY_MS", None::<&str>),
                ("STOREFRONT_AUTH_SUBMIT_TIMEOUT_SECS", None::<&str>),
                ("STOREFRONT_AUTH_RESEND_COOLDOWN_SECS", None::<&str>),
                ("STOREFRONT_AUTH_PASSWORD", None::<&str>),
                ("STOREFRONT_AUTH_CONFIRM_PASSWORD", None::<&str>),
            ],
            || {
                let matches = new().get_matches_from(register_args());
                assert_eq!(
                    matches.get_one::<u64>(forms::ARG_SUBMIT_DELAY_MS).copied(),
                    Some(1000)
                );
                assert_eq!(
                    matches.get_one::<u64>(forms::ARG_SUBMIT_TIMEOUT_SECS).copied(),
                    Some(10)
                );
                assert_eq!(
                    matches.get_one::<u64>(forms::ARG_RESEND_COOLDOWN_SECS).copied(),
                    Some(120)
                );
                let register = matches.subcommand_matches(register::COMMAND);
                assert_eq!(
                    register.and_then(|m| m.get_one::<String>(register::ARG_EMAIL).cloned()),
                    None
                );
                assert_eq!(
                    register.and_then(|m| m.get_one::<String>(register::ARG_OTP).cloned()),
                    Some("1234".to_string())
                );
            },
        );
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        temp_env::with_var("STOREFRONT_AUTH_SUBMIT_TIMEOUT_SECS", None::<&str>, || {
            let mut args = register_args();
            args.insert(1, "--submit-timeout-secs");
            args.insert(2, "0");
            let result = new().try_get_matches_from(args);
            assert_eq!(
                result.map(|_| ()).map_err(|e| e.kind()),
                Err(clap::error::ErrorKind::ValueValidation)
            );
        });
    }

    #[test]
    fn test_subcommand_is_required() {
        let result = new().try_get_matches_from(vec!["storefront-auth"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("STOREFRONT_AUTH_LOG_LEVEL", Some(level)),
                    ("STOREFRONT_AUTH_PHONE", Some("09123456789")),
                    ("STOREFRONT_AUTH_PASSWORD", Some("secret123")),
                ],
                || {
                    let matches = new().get_matches_from(vec!["storefront-auth", "login"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        u8::try_from(index).ok()
                    );
                },
            );
        }
    }

    #[test]
    fn test_log_level_env_out_of_range_is_rejected() {
        temp_env::with_vars(
            [
                ("STOREFRONT_AUTH_LOG_LEVEL", Some("5")),
                ("STOREFRONT_AUTH_PHONE", Some("09123456789")),
                ("STOREFRONT_AUTH_PASSWORD", Some("secret123")),
            ],
            || {
                let result = new().try_get_matches_from(vec!["storefront-auth", "login"]);
                assert_eq!(
                    result.map(|_| ()).map_err(|e| e.kind()),
                    Err(clap::error::ErrorKind::ValueValidation)
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("STOREFRONT_AUTH_LOG_LEVEL", None::<String>)], || {
                let mut args: Vec<String> = register_args().into_iter().map(String::from).collect();

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }
}
