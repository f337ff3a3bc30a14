//! # storefront-auth
//!
//! Workflow logic behind the storefront's sign-in and sign-up screens. The crate
//! knows nothing about rendering: a UI layer feeds raw field values in and reacts
//! to the [`forms::SubmitOutcome`] it gets back.
//!
//! ## Flows
//!
//! ### Login
//!
//! 1. **Validate:** phone and password are checked locally; failures come back as
//!    per-field messages and nothing else happens.
//! 2. **Submit:** the form takes its submitting guard and calls the backend.
//! 3. **Navigate:** on success the user is sent home. Backend failures are logged
//!    through the diagnostic sink and otherwise swallowed.
//!
//! ### Registration
//!
//! A linear wizard: personal info, OTP confirmation, password setup. Each step is
//! validated on its own, merged into an accumulated [`forms::RegistrationDraft`]
//! and only then advanced. Going back never validates and never drops data. The
//! last step hands the complete record to the backend and navigates to login.
//!
//! ## Collaborators
//!
//! Navigation, diagnostics and the submission effect are traits
//! ([`navigation::Navigator`], [`diagnostics::DiagnosticSink`],
//! [`backend::AuthBackend`]). The only backend shipped is
//! [`backend::SimulatedBackend`], which waits a fixed delay and succeeds.
//!
//! Passwords are held as [`secrecy::SecretString`] from the moment they enter the
//! crate and are never logged.

pub mod backend;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod forms;
pub mod navigation;

pub const GIT_COMMIT_HASH: &str = env!("STOREFRONT_AUTH_GIT_SHA");
