//! Client-side form validation.
//!
//! These mirror the checks the forms run before anything is sent. The
//! server stays the authority; passing here only means the request is worth
//! making.

use serde::Serialize;
use validator::Validate;

use crate::error::Result;

/// Minimum password length accepted by the login and registration forms.
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Maximum length of a folder or item name.
pub const MAX_NAME_LENGTH: u64 = 255;

/// Login / registration credentials.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    /// Account email.
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    /// Account password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl Credentials {
    /// Build credentials from form input.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Run the form checks.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }
}

/// New folder form.
#[derive(Debug, Clone, Validate)]
pub struct FolderNameForm {
    /// Folder name.
    #[validate(custom(function = "folder_name_rules"))]
    pub name: String,
}

/// Rename form.
#[derive(Debug, Clone, Validate)]
pub struct RenameForm {
    /// Replacement name.
    #[validate(custom(function = "new_name_rules"))]
    pub new_name: String,
}

fn name_rules(
    value: &str,
    required: &'static str,
    too_long: &'static str,
) -> std::result::Result<(), validator::ValidationError> {
    if value.is_empty() {
        return Err(validator::ValidationError::new("required").with_message(required.into()));
    }
    if value.chars().count() as u64 > MAX_NAME_LENGTH {
        return Err(validator::ValidationError::new("too_long").with_message(too_long.into()));
    }
    Ok(())
}

fn folder_name_rules(value: &str) -> std::result::Result<(), validator::ValidationError> {
    name_rules(value, "Folder name is required", "Folder name is too long")
}

fn new_name_rules(value: &str) -> std::result::Result<(), validator::ValidationError> {
    name_rules(value, "Name is required", "Name is too long")
}

/// Validate a folder name as the new-folder form does.
pub fn validate_folder_name(name: &str) -> Result<()> {
    FolderNameForm {
        name: name.to_string(),
    }
    .validate()?;
    Ok(())
}

/// Validate a replacement name as the rename form does.
pub fn validate_new_name(new_name: &str) -> Result<()> {
    RenameForm {
        new_name: new_name.to_string(),
    }
    .validate()?;
    Ok(())
}
