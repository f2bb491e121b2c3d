// =============================================================================
// Exchange API credentials — shape validation and verification state
// =============================================================================
//
// SECURITY: The secret key and passphrase are never logged. `Credentials`
// implements a redacting `Debug` so that accidental `{:?}` formatting cannot
// leak them.

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// A full set of venue API credentials.
///
/// Once handed to the client these are treated as immutable: every request
/// clones a snapshot so that a concurrent `set_credentials` cannot change
/// what gets signed mid-flight.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// UUID-shaped key issued by the venue.
    pub api_key: String,
    /// Opaque signing secret, at least 20 characters.
    pub secret_key: String,
    /// User-chosen passphrase, 1-30 characters.
    pub passphrase: String,
    /// Accepted for compatibility with stored credential records; the request
    /// target does not change (the venue exposes a single host).
    #[serde(default)]
    pub sandbox: bool,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            passphrase: passphrase.into(),
            sandbox: false,
        }
    }

    /// Validate the *shape* of the credentials without touching the network.
    ///
    /// Checks run in priority order and the first failing rule is returned:
    /// 1. any field empty after trimming whitespace
    /// 2. API key is not UUID-shaped (case-insensitive hex)
    /// 3. secret key shorter than 20 characters
    /// 4. passphrase length outside 1-30 characters
    pub fn validate_format(&self) -> Result<(), FormatError> {
        if self.api_key.trim().is_empty()
            || self.secret_key.trim().is_empty()
            || self.passphrase.trim().is_empty()
        {
            return Err(FormatError::IncompleteFields);
        }

        if !is_uuid_shaped(&self.api_key) {
            return Err(FormatError::BadApiKeyFormat);
        }

        if self.secret_key.len() < 20 {
            return Err(FormatError::BadSecretKeyLength);
        }

        let passphrase_len = self.passphrase.chars().count();
        if !(1..=30).contains(&passphrase_len) {
            return Err(FormatError::BadPassphraseLength);
        }

        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .field("sandbox", &self.sandbox)
            .finish()
    }
}

/// `8-4-4-4-12` lowercase-or-uppercase hex groups separated by hyphens.
fn is_uuid_shaped(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, &c)| match i {
        8 | 13 | 18 | 23 => c == b'-',
        _ => c.is_ascii_hexdigit(),
    })
}

// =============================================================================
// Verification state
// =============================================================================

/// Explicit credential lifecycle for one client instance.
///
/// `Verified` is not sticky: any `set_credentials` call drops the client back
/// to `CredentialsSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialState {
    Uninitialized,
    CredentialsSet,
    Verified,
}

impl Default for CredentialState {
    fn default() -> Self {
        Self::Uninitialized
    }
}

impl std::fmt::Display for CredentialState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "Uninitialized"),
            Self::CredentialsSet => write!(f, "CredentialsSet"),
            Self::Verified => write!(f, "Verified"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_KEY: &str = "a1b2c3d4-e5f6-7890-abcd-ef1234567890";

    fn good_credentials() -> Credentials {
        Credentials::new(GOOD_KEY, "a-long-enough-secret-key", "hunter2-phrase")
    }

    // ---- validate_format -------------------------------------------------

    #[test]
    fn valid_credentials_pass() {
        assert!(good_credentials().validate_format().is_ok());
    }

    #[test]
    fn empty_api_key_is_incomplete() {
        let mut creds = good_credentials();
        creds.api_key = String::new();
        assert_eq!(creds.validate_format(), Err(FormatError::IncompleteFields));
    }

    #[test]
    fn whitespace_only_field_is_incomplete() {
        let mut creds = good_credentials();
        creds.passphrase = "   ".to_string();
        assert_eq!(creds.validate_format(), Err(FormatError::IncompleteFields));
    }

    #[test]
    fn incomplete_wins_over_other_rules() {
        // Secret is empty AND the api key is malformed -- the empty-field rule
        // must be reported, not the key-format rule.
        let creds = Credentials::new("not-a-uuid", "", "pass");
        assert_eq!(creds.validate_format(), Err(FormatError::IncompleteFields));
    }

    #[test]
    fn malformed_api_key_rejected() {
        let mut creds = good_credentials();
        creds.api_key = "not-a-uuid".to_string();
        assert_eq!(creds.validate_format(), Err(FormatError::BadApiKeyFormat));
    }

    #[test]
    fn api_key_check_precedes_secret_check() {
        // Both the key and the secret are bad; the key rule fires first.
        let creds = Credentials::new("deadbeef", "short", "pass");
        assert_eq!(creds.validate_format(), Err(FormatError::BadApiKeyFormat));
    }

    #[test]
    fn uppercase_hex_api_key_accepted() {
        let mut creds = good_credentials();
        creds.api_key = "A1B2C3D4-E5F6-7890-ABCD-EF1234567890".to_string();
        assert!(creds.validate_format().is_ok());
    }

    #[test]
    fn api_key_with_wrong_group_lengths_rejected() {
        let mut creds = good_credentials();
        creds.api_key = "a1b2c3d4e-5f6-7890-abcd-ef123456789".to_string();
        assert_eq!(creds.validate_format(), Err(FormatError::BadApiKeyFormat));
    }

    #[test]
    fn short_secret_rejected() {
        let mut creds = good_credentials();
        creds.secret_key = "0123456789012345678".to_string(); // 19 chars
        assert_eq!(creds.validate_format(), Err(FormatError::BadSecretKeyLength));
    }

    #[test]
    fn twenty_char_secret_accepted() {
        let mut creds = good_credentials();
        creds.secret_key = "01234567890123456789".to_string(); // exactly 20
        assert!(creds.validate_format().is_ok());
    }

    #[test]
    fn overlong_passphrase_rejected() {
        let mut creds = good_credentials();
        creds.passphrase = "x".repeat(31);
        assert_eq!(creds.validate_format(), Err(FormatError::BadPassphraseLength));
    }

    #[test]
    fn thirty_char_passphrase_accepted() {
        let mut creds = good_credentials();
        creds.passphrase = "x".repeat(30);
        assert!(creds.validate_format().is_ok());
    }

    // ---- is_uuid_shaped --------------------------------------------------

    #[test]
    fn uuid_shape_rejects_non_hex() {
        assert!(!is_uuid_shaped("g1b2c3d4-e5f6-7890-abcd-ef1234567890"));
    }

    #[test]
    fn uuid_shape_rejects_missing_hyphen() {
        assert!(!is_uuid_shaped("a1b2c3d4ae5f6-7890-abcd-ef1234567890"));
    }

    // ---- Debug redaction -------------------------------------------------

    #[test]
    fn debug_never_prints_secrets() {
        let creds = good_credentials();
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("a-long-enough-secret-key"));
        assert!(!rendered.contains("hunter2-phrase"));
        assert!(rendered.contains("<redacted>"));
    }

    // ---- CredentialState -------------------------------------------------

    #[test]
    fn state_defaults_to_uninitialized() {
        assert_eq!(CredentialState::default(), CredentialState::Uninitialized);
    }
}
