//! Guest contact details and email identity normalization.
//!
//! Guests have no accounts: the email address is the identity key for every
//! guest-initiated action, so it is normalized the same way everywhere it is
//! stored or compared.

use serde::Deserialize;
use validator::{Validate, ValidateEmail};

use crate::error::CoreError;

/// Maximum stored length of a guest name.
pub const MAX_NAME_LENGTH: u64 = 150;

/// Maximum stored length of a phone number.
pub const MAX_PHONE_LENGTH: u64 = 30;

/// Contact details supplied with a reservation.
///
/// The length limits below must equal [`MAX_NAME_LENGTH`] and
/// [`MAX_PHONE_LENGTH`]; the boundary tests pin them together.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GuestDetails {
    #[validate(length(min = 1, max = 150, message = "guest name is required"))]
    pub name: String,
    #[validate(email(message = "guest email is not a valid address"))]
    pub email: String,
    #[validate(length(max = 30, message = "phone number is too long"))]
    pub phone: Option<String>,
}

impl GuestDetails {
    /// Trim every field, normalize the email, and validate.
    ///
    /// Blank phone numbers collapse to `None`.
    pub fn normalized(self) -> Result<Self, CoreError> {
        let details = Self {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: self
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        };
        details
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        Ok(details)
    }
}

/// Canonical form of an email used as an identity key.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize and validate an email supplied on its own (OTP endpoints).
pub fn parse_email(raw: &str) -> Result<String, CoreError> {
    let email = normalize_email(raw);
    if email.is_empty() {
        return Err(CoreError::Validation("email is required".into()));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(email)
}

/// Case-insensitive identity comparison between two stored emails.
pub fn same_identity(a: &str, b: &str) -> bool {
    normalize_email(a) == normalize_email(b)
}
