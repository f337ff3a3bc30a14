//! Where a finished workflow sends the user. The router itself lives in the UI
//! layer; this crate only names the destinations.

use serde::Serialize;
use std::fmt;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Home,
    Login,
    Register,
    ForgotPassword,
}

impl Destination {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/auth/login",
            Self::Register => "/auth/register",
            Self::ForgotPassword => "/auth/forgot-password",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.path())
    }
}

/// Moves the user to a destination. Fire-and-forget.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}

/// Navigator for headless runs: records the transition as a tracing event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, destination: Destination) {
        info!(path = destination.path(), "navigate");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destinations_map_to_storefront_routes() {
        assert_eq!(Destination::Home.path(), "/");
        assert_eq!(Destination::Login.path(), "/auth/login");
        assert_eq!(Destination::Register.path(), "/auth/register");
        assert_eq!(
            Destination::ForgotPassword.to_string(),
            "/auth/forgot-password"
        );
    }

    #[test]
    fn destination_serializes_as_snake_case() -> serde_json::Result<()> {
        assert_eq!(
            serde_json::to_string(&Destination::ForgotPassword)?,
            "\"forgot_password\""
        );
        Ok(())
    }
}
