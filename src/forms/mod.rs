//! Form workflows and their schemas.

mod login;
mod register;
mod schema;
mod submit;

pub use login::LoginForm;
pub use register::{
    Registration, RegistrationDraft, RegistrationWizard, WizardStep, format_countdown,
};
pub use schema::{
    Field, FieldErrors, LoginCredentials, LoginInput, OTP_LENGTH, PasswordInput, PasswordSetup,
    PersonalInfo, PersonalInfoInput, PhoneNumber, Schema, Verification, VerificationInput,
};
pub use submit::{FormServices, SubmitOutcome};
