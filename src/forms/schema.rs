//! Field schemas for the login form and the three registration steps.
//!
//! Validation is pure and synchronous. Every field is checked in one pass so the
//! UI can show all messages at once; the first message recorded for a field wins.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

/// Length of the SMS verification code.
pub const OTP_LENGTH: usize = 4;

const FIRST_NAME_REQUIRED: &str = "First name is required";
const LAST_NAME_REQUIRED: &str = "Last name is required";
const PHONE_REQUIRED: &str = "Phone number is required";
const PHONE_INVALID: &str = "Enter a valid mobile number, e.g. 09123456789";
const EMAIL_INVALID: &str = "Email address looks invalid";
const OTP_INVALID: &str = "Verification code must be 4 digits";
const PASSWORD_REQUIRED: &str = "Password is required";
const CONFIRM_PASSWORD_REQUIRED: &str = "Please confirm your password";
const PASSWORDS_MISMATCH: &str = "Passwords do not match";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Phone,
    Email,
    Otp,
    Password,
    ConfirmPassword,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Otp => "otp",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Per-field, human-readable validation messages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless the field already has one.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (field, message)) in self.iter().enumerate() {
            if index > 0 {
                formatter.write_str("; ")?;
            }
            write!(formatter, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Turns raw form input into a validated record.
pub trait Schema {
    type Output;

    /// # Errors
    /// Returns every failing field with its message.
    fn validate(self) -> Result<Self::Output, FieldErrors>;
}

/// Maps Persian and Arabic-Indic digits to ASCII and trims the input.
fn normalize_digits(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|ch| match ch {
            '۰'..='۹' => ascii_digit(u32::from(ch) - u32::from('۰')),
            '٠'..='٩' => ascii_digit(u32::from(ch) - u32::from('٠')),
            _ => ch,
        })
        .collect()
}

fn ascii_digit(offset: u32) -> char {
    char::from_digit(offset, 10).unwrap_or('0')
}

/// Trims the address and lower-cases its domain. The local part is
/// case-sensitive and kept as typed.
fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

fn valid_mobile(phone_normalized: &str) -> bool {
    Regex::new(r"^09[0-9]{9}$").is_ok_and(|regex| regex.is_match(phone_normalized))
}

fn valid_otp(otp_normalized: &str) -> bool {
    otp_normalized.len() == OTP_LENGTH && otp_normalized.bytes().all(|byte| byte.is_ascii_digit())
}

/// A mobile number in `09XXXXXXXXX` form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// # Errors
    /// Returns the user-facing message when the number is blank or malformed.
    pub fn parse(raw: &str) -> Result<Self, &'static str> {
        let normalized = normalize_digits(raw);
        if normalized.is_empty() {
            return Err(PHONE_REQUIRED);
        }
        if !valid_mobile(&normalized) {
            return Err(PHONE_INVALID);
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe form, e.g. `0912****789`.
    #[must_use]
    pub fn masked(&self) -> String {
        let head = self.0.get(..4).unwrap_or_default();
        let tail = self.0.get(self.0.len().saturating_sub(3)..).unwrap_or_default();
        format!("{head}****{tail}")
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

fn check_phone(raw: &str, errors: &mut FieldErrors) -> Option<PhoneNumber> {
    PhoneNumber::parse(raw)
        .map_err(|message| errors.insert(Field::Phone, message))
        .ok()
}

fn check_required(raw: &str, field: Field, message: &str, errors: &mut FieldErrors) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.insert(field, message);
    }
    trimmed.to_string()
}

fn check_secret(secret: &SecretString, field: Field, message: &str, errors: &mut FieldErrors) {
    if secret.expose_secret().trim().is_empty() {
        errors.insert(field, message);
    }
}

// Login

#[derive(Debug)]
pub struct LoginInput {
    pub phone: String,
    pub password: SecretString,
}

impl LoginInput {
    #[must_use]
    pub fn new(phone: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            password: SecretString::from(password.into()),
        }
    }
}

#[derive(Debug)]
pub struct LoginCredentials {
    phone: PhoneNumber,
    password: SecretString,
}

impl LoginCredentials {
    #[must_use]
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

impl Schema for LoginInput {
    type Output = LoginCredentials;

    fn validate(self) -> Result<LoginCredentials, FieldErrors> {
        let mut errors = FieldErrors::new();
        let phone = check_phone(&self.phone, &mut errors);
        check_secret(&self.password, Field::Password, PASSWORD_REQUIRED, &mut errors);

        match phone {
            Some(phone) => errors.into_result(|| LoginCredentials {
                phone,
                password: self.password,
            }),
            None => Err(errors),
        }
    }
}

// Registration step 1

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersonalInfoInput {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    first_name: String,
    last_name: String,
    phone: PhoneNumber,
    email: Option<String>,
}

impl PersonalInfo {
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

impl From<&PersonalInfo> for PersonalInfoInput {
    fn from(personal: &PersonalInfo) -> Self {
        Self {
            first_name: personal.first_name.clone(),
            last_name: personal.last_name.clone(),
            phone: personal.phone.as_str().to_string(),
            email: personal.email.clone().unwrap_or_default(),
        }
    }
}

impl Schema for PersonalInfoInput {
    type Output = PersonalInfo;

    fn validate(self) -> Result<PersonalInfo, FieldErrors> {
        let mut errors = FieldErrors::new();
        let first_name = check_required(
            &self.first_name,
            Field::FirstName,
            FIRST_NAME_REQUIRED,
            &mut errors,
        );
        let last_name = check_required(
            &self.last_name,
            Field::LastName,
            LAST_NAME_REQUIRED,
            &mut errors,
        );
        let phone = check_phone(&self.phone, &mut errors);

        // Optional: blank means "not provided".
        let email = Some(normalize_email(&self.email)).filter(|email| !email.is_empty());
        if let Some(email) = &email {
            if !valid_email(email) {
                errors.insert(Field::Email, EMAIL_INVALID);
            }
        }

        match phone {
            Some(phone) => errors.into_result(|| PersonalInfo {
                first_name,
                last_name,
                phone,
                email,
            }),
            None => Err(errors),
        }
    }
}

// Registration step 2

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerificationInput {
    pub otp: String,
}

impl VerificationInput {
    #[must_use]
    pub fn new(otp: impl Into<String>) -> Self {
        Self { otp: otp.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verification {
    otp: String,
}

impl Verification {
    #[must_use]
    pub fn otp(&self) -> &str {
        &self.otp
    }
}

impl From<&Verification> for VerificationInput {
    fn from(verification: &Verification) -> Self {
        Self::new(verification.otp.clone())
    }
}

impl Schema for VerificationInput {
    type Output = Verification;

    fn validate(self) -> Result<Verification, FieldErrors> {
        let otp = normalize_digits(&self.otp);
        let mut errors = FieldErrors::new();
        if !valid_otp(&otp) {
            errors.insert(Field::Otp, OTP_INVALID);
        }
        errors.into_result(|| Verification { otp })
    }
}

// Registration step 3

#[derive(Debug)]
pub struct PasswordInput {
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl PasswordInput {
    #[must_use]
    pub fn new(password: impl Into<String>, confirm_password: impl Into<String>) -> Self {
        Self {
            password: SecretString::from(password.into()),
            confirm_password: SecretString::from(confirm_password.into()),
        }
    }
}

/// Validated password; the confirmation is dropped once it has matched.
#[derive(Debug)]
pub struct PasswordSetup {
    password: SecretString,
}

impl PasswordSetup {
    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub(crate) fn into_password(self) -> SecretString {
        self.password
    }
}

impl Schema for PasswordInput {
    type Output = PasswordSetup;

    fn validate(self) -> Result<PasswordSetup, FieldErrors> {
        let mut errors = FieldErrors::new();
        check_secret(&self.password, Field::Password, PASSWORD_REQUIRED, &mut errors);
        check_secret(
            &self.confirm_password,
            Field::ConfirmPassword,
            CONFIRM_PASSWORD_REQUIRED,
            &mut errors,
        );

        let (password, confirm) = (
            self.password.expose_secret(),
            self.confirm_password.expose_secret(),
        );
        let both_filled = !password.trim().is_empty() && !confirm.trim().is_empty();
        if both_filled && password != confirm {
            errors.insert(Field::ConfirmPassword, PASSWORDS_MISMATCH);
        }

        errors.into_result(|| PasswordSetup {
            password: self.password,
        })
    }
}
