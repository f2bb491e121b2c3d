// =============================================================================
// Error taxonomy for the exchange client
// =============================================================================
//
// Two layers:
//   - `FormatError`  — local credential-shape failures. Raised before any
//     network traffic so the caller can surface them synchronously.
//   - `ClientError`  — everything a request can fail with, normalised so that
//     a raw `reqwest::Error` never crosses the client boundary.

use thiserror::Error;

/// Credential-shape validation failures.
///
/// Exactly one reason is reported per validation pass: the checks run in a
/// fixed priority order and the first failing rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// One or more fields are empty after trimming whitespace.
    #[error("incomplete fields: API key, secret key, and passphrase are all required")]
    IncompleteFields,

    /// The API key does not have the hyphenated UUID shape the venue issues.
    #[error("bad API key format: expected a UUID-shaped key")]
    BadApiKeyFormat,

    /// Secret keys issued by the venue are at least 20 characters.
    #[error("bad secret key length: must be at least 20 characters")]
    BadSecretKeyLength,

    /// Passphrases are chosen by the user and limited to 1-30 characters.
    #[error("bad passphrase length: must be between 1 and 30 characters")]
    BadPassphraseLength,
}

/// Failures surfaced by [`crate::okx::client::OkxClient`] operations.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// A signed operation was attempted before `set_credentials`.
    #[error("credentials not set")]
    CredentialsNotSet,

    /// Credentials failed the local shape check; no request was sent.
    #[error("invalid credentials: {0}")]
    Format(#[from] FormatError),

    /// The venue answered HTTP 401.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The venue answered HTTP 403.
    #[error("insufficient permissions")]
    Permission,

    /// Transport succeeded but the response envelope carried a non-zero code.
    #[error("venue error (code {code}): {message}")]
    Venue { code: String, message: String },

    /// Any other non-success HTTP status.
    #[error("venue returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// DNS, connect, or timeout-class transport failure.
    #[error("network failure")]
    Network,

    /// Any other transport-level failure (TLS, malformed response body, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// Order parameters rejected locally, before signing.
    #[error("invalid order parameters: {0}")]
    OrderValidation(String),

    /// A data fetch returned no usable payload.
    #[error("fetch failed: {0}")]
    FetchFailed(String),
}
