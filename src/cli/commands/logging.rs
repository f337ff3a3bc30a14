use clap::{Arg, ArgAction, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names accepted by `STOREFRONT_AUTH_LOG_LEVEL`, indexed by the `-v`
/// count they stand for.
const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts a level name or its `-v` count (`0..=4`).
fn parse_log_level(level: &str) -> Result<u8, String> {
    let level = level.trim();
    let index = match level.parse::<usize>() {
        Ok(count) => Some(count).filter(|count| *count < LEVELS.len()),
        Err(_) => LEVELS
            .iter()
            .position(|name| name.eq_ignore_ascii_case(level)),
    };

    index
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| {
            format!(
                "invalid log level '{level}', expected one of {} or 0-{}",
                LEVELS.join(", "),
                LEVELS.len() - 1
            )
        })
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(parse_log_level)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Increase log verbosity; -vvvv logs form transitions at TRACE (default: ERROR)")
            .long_help(
                "Increase log verbosity. Repeat for more detail: -v WARN, -vv INFO, \
                 -vvv DEBUG, -vvvv TRACE. STOREFRONT_AUTH_LOG_LEVEL takes a level name \
                 or the same count; RUST_LOG overrides both.",
            )
            .env("STOREFRONT_AUTH_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
