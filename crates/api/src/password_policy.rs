// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy and credential generation for staff accounts.

use legaltrack_domain::StaffActor;
use thiserror::Error;

/// Characters drawn for temporary passwords.
const TEMPORARY_PASSWORD_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

/// Length of generated temporary passwords.
pub const TEMPORARY_PASSWORD_LENGTH: usize = 12;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    #[error("Password must not match the account's {field}")]
    MatchesForbiddenField { field: String },

    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Rules a chosen password must satisfy on activation.
pub struct PasswordPolicy {
    /// Minimum password length.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            min_complexity: 3,
        }
    }
}

impl PasswordPolicy {
    /// Validates a password chosen by `staff`.
    ///
    /// The password may not equal the account's email, the part of the email
    /// before `@`, the full name, or the staff ID, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns the first rule the password breaks.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        staff: &StaffActor,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found: usize = character_classes(password);
        if found < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found,
            });
        }

        let lowered: String = password.to_lowercase();
        let local_part: &str = staff.email.split('@').next().unwrap_or_default();
        let forbidden: [(&str, &str); 4] = [
            ("email", staff.email.as_str()),
            ("email name", local_part),
            ("full name", staff.full_name.as_str()),
            ("staff ID", staff.staff_id.as_str()),
        ];
        if let Some((field, _)) = forbidden
            .iter()
            .find(|(_, value)| !value.is_empty() && lowered == value.to_lowercase())
        {
            return Err(PasswordPolicyError::MatchesForbiddenField {
                field: (*field).to_string(),
            });
        }

        Ok(())
    }
}

/// Counts uppercase, lowercase, digit, and symbol classes present.
fn character_classes(password: &str) -> usize {
    let checks: [fn(&char) -> bool; 4] = [
        char::is_ascii_uppercase,
        char::is_ascii_lowercase,
        char::is_ascii_digit,
        |c: &char| !c.is_alphanumeric() && !c.is_whitespace(),
    ];
    checks
        .iter()
        .filter(|check| password.chars().any(|c| check(&c)))
        .count()
}

/// Generates a random temporary password.
#[must_use]
pub fn generate_temporary_password() -> String {
    // Largest multiple of the alphabet length that fits in a byte.
    let alphabet_len: usize = TEMPORARY_PASSWORD_ALPHABET.len();
    let limit: usize = 256 - (256 % alphabet_len);

    let mut password: String = String::with_capacity(TEMPORARY_PASSWORD_LENGTH);
    while password.len() < TEMPORARY_PASSWORD_LENGTH {
        let byte: usize = usize::from(rand::random::<u8>());
        if byte < limit {
            password.push(char::from(TEMPORARY_PASSWORD_ALPHABET[byte % alphabet_len]));
        }
    }
    password
}

/// Generates a single-use activation nonce.
#[must_use]
pub fn generate_activation_nonce() -> String {
    format!(
        "{:032x}{:032x}",
        rand::random::<u128>(),
        rand::random::<u128>()
    )
}

/// Hashes a password with bcrypt.
///
/// # Errors
///
/// Returns an error if bcrypt fails.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}
