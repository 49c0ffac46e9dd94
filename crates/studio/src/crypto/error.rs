//! Error taxonomy of the envelope cipher.

use thiserror::Error;

/// Errors produced by the crypto layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// An argument was empty. Raised before any cryptographic work.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The envelope could not be opened.
    ///
    /// The message is the same whatever went wrong so that callers cannot
    /// tell a wrong password from corrupted data. The precise cause is kept
    /// as the error source.
    #[error("decryption failed: check that the password is correct and the ciphertext is valid")]
    DecryptionFailed(#[source] DecryptFailure),

    /// PBKDF2 rejected its PRF key. Unreachable with HMAC, which accepts any key length.
    #[error("key derivation failed")]
    KeyDerivation,
}

/// The concrete reason behind [`CipherError::DecryptionFailed`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecryptFailure {
    /// Not base64, shorter than salt + IV, or a ciphertext that is not a
    /// positive multiple of the block size.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// PKCS#7 padding check failed after decryption.
    #[error("invalid padding")]
    Padding,

    /// The unpadded plaintext is not valid UTF-8.
    #[error("plaintext is not valid UTF-8")]
    Encoding,
}

impl From<DecryptFailure> for CipherError {
    fn from(failure: DecryptFailure) -> Self {
        CipherError::DecryptionFailed(failure)
    }
}

impl CipherError {
    /// Returns the underlying decryption failure, if this is one.
    pub fn failure(&self) -> Option<&DecryptFailure> {
        match self {
            CipherError::DecryptionFailed(f) => Some(f),
            _ => None,
        }
    }
}
