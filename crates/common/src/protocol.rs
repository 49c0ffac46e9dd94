//! Request and response types exchanged over the public HTTP API.
//!
//! Passwords appear only in request bodies (or the `X-Password` header for
//! file endpoints) and are never echoed back in any response.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Text encryption endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// UTF-8 text to encrypt. Must not be empty.
    pub plaintext: String,
    /// Password the key is derived from. Must not be empty.
    pub password: String,
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Base64 envelope: `salt || iv || ciphertext`.
    pub ciphertext: String,
    /// Number of characters in `ciphertext`.
    pub characters: usize,
    /// Size of `ciphertext` in bytes once UTF-8 encoded.
    pub size_bytes: usize,
    /// Advisory rating of the password that was used.
    pub password_strength: PasswordStrength,
}

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Base64 envelope produced by `POST /encrypt`.
    pub ciphertext: String,
    /// Password used at encryption time.
    pub password: String,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Recovered plaintext.
    pub plaintext: String,
    /// Number of characters in `plaintext`.
    pub characters: usize,
}

/// Advisory password rating based on length alone. Never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    /// Fewer than 8 characters.
    Weak,
    /// 8 to 11 characters.
    Fair,
    /// 12 characters or more.
    Strong,
}

impl PasswordStrength {
    /// Rate `password` by its length in characters.
    pub fn assess(password: &str) -> Self {
        match password.chars().count() {
            0..=7 => PasswordStrength::Weak,
            8..=11 => PasswordStrength::Fair,
            _ => PasswordStrength::Strong,
        }
    }
}

// ---------------------------------------------------------------------------
// Classic cipher endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /caesar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaesarRequest {
    /// Text to rotate.
    pub text: String,
    /// Rotation amount; negative values rotate backwards.
    pub shift: i64,
}

/// Response body for `POST /caesar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaesarResponse {
    /// Rotated text.
    pub text: String,
}

/// Request body for `POST /frequency`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyRequest {
    /// Text to analyse.
    pub text: String,
}

/// One row of a letter-frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterCount {
    /// Lowercase ASCII letter.
    pub letter: char,
    /// Occurrences, case-insensitive.
    pub count: usize,
    /// Share of all letters, 0.0 to 100.0.
    pub percent: f64,
}

/// Response body for `POST /frequency`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyResponse {
    /// Total ASCII letters counted.
    pub total_letters: usize,
    /// One entry per letter `a` to `z`, in order.
    pub letters: Vec<LetterCount>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status, always `"ok"` when the process is serving.
    pub status: String,
    /// Crate version of the running binary.
    pub version: String,
    /// PBKDF2 work factor applied to every password.
    pub kdf_iterations: u32,
}
