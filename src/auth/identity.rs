//! Display identity derived from the session token.
//!
//! The token's payload segment is decoded without verifying the signature.
//! The result is only used for display; the server stays the authority on
//! whether the token is valid.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::Deserialize;
use tracing::debug;

/// Identity shown when the token payload cannot be read.
pub const FALLBACK_EMAIL: &str = "user@example.com";

/// base64url that accepts the payload with or without padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The signed-in user as far as the client knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Email shown in the UI.
    pub email: String,
}

impl User {
    /// The placeholder identity.
    pub fn fallback() -> Self {
        Self {
            email: FALLBACK_EMAIL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PayloadClaims {
    #[serde(default)]
    email: Option<String>,
}

/// Read the email claim out of a token's payload segment.
fn payload_email(token: &str) -> Option<String> {
    let segment = token.split('.').nth(1)?;
    let bytes = PAYLOAD_ENGINE.decode(segment).ok()?;
    let claims: PayloadClaims = serde_json::from_slice(&bytes).ok()?;
    claims.email.filter(|email| !email.is_empty())
}

/// Derive the display identity for a token.
///
/// Never fails: a token whose payload is not valid base64url JSON, or that
/// carries no `email` claim, yields [`User::fallback`].
pub fn user_from_token(token: &str) -> User {
    match payload_email(token) {
        Some(email) => User { email },
        None => {
            debug!("token payload unreadable, using fallback identity");
            User::fallback()
        }
    }
}
