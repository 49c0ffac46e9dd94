//! AES-256-CBC password envelopes.
//!
//! **No integrity tag.** CBC with PKCS#7 detects a wrong password or damaged
//! data only indirectly, through bad padding or invalid UTF-8. A tampered
//! envelope can occasionally decrypt to garbage without an error.

use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, Iv, Key, KeyIvInit};
use rand::{rngs::OsRng, RngCore};

use super::error::{CipherError, DecryptFailure};
use super::kdf::{derive_key, SALT_LEN};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Byte length of the CBC initialisation vector.
pub const IV_LEN: usize = 16;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Salt plus IV: the fixed prefix of every decoded envelope.
pub const HEADER_LEN: usize = SALT_LEN + IV_LEN;

/// A decoded envelope.
///
/// The transport form is `base64(salt || iv || ciphertext)` using the standard
/// alphabet with padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// PBKDF2 salt.
    pub salt: [u8; SALT_LEN],
    /// CBC initialisation vector.
    pub iv: [u8; IV_LEN],
    /// AES-256-CBC output, a positive multiple of [`BLOCK_LEN`] bytes.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Encode to the transport string.
    pub fn to_base64(&self) -> String {
        let mut raw = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        raw.extend_from_slice(&self.salt);
        raw.extend_from_slice(&self.iv);
        raw.extend_from_slice(&self.ciphertext);
        STANDARD.encode(raw)
    }

    /// Parse a transport string. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DecryptFailure::MalformedEnvelope`] if the text is not base64,
    /// decodes to fewer than [`HEADER_LEN`] bytes, or carries a ciphertext that
    /// is not a positive multiple of [`BLOCK_LEN`].
    pub fn from_base64(s: &str) -> Result<Self, DecryptFailure> {
        let raw = STANDARD
            .decode(s.trim())
            .map_err(|e| DecryptFailure::MalformedEnvelope(format!("invalid base64: {e}")))?;

        if raw.len() < HEADER_LEN {
            return Err(DecryptFailure::MalformedEnvelope(format!(
                "envelope too short: {} bytes, need at least {HEADER_LEN}",
                raw.len()
            )));
        }

        let (salt, rest) = raw.split_at(SALT_LEN);
        let (iv, ciphertext) = rest.split_at(IV_LEN);

        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(DecryptFailure::MalformedEnvelope(format!(
                "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
                ciphertext.len()
            )));
        }

        let mut envelope = Envelope {
            salt: [0u8; SALT_LEN],
            iv: [0u8; IV_LEN],
            ciphertext: ciphertext.to_vec(),
        };
        envelope.salt.copy_from_slice(salt);
        envelope.iv.copy_from_slice(iv);
        Ok(envelope)
    }
}

/// Encrypt `plaintext` under `password` and return the base64 envelope.
///
/// A fresh salt and IV are drawn from the OS CSPRNG on every call, so equal
/// inputs never produce equal envelopes.
///
/// # Errors
///
/// Returns [`CipherError::InvalidInput`] if either argument is empty.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String, CipherError> {
    require_non_empty(password, "password must not be empty")?;
    require_non_empty(plaintext, "plaintext must not be empty")?;

    Ok(seal(plaintext.as_bytes(), password)?.to_base64())
}

/// Decrypt a base64 envelope produced by [`encrypt`].
///
/// # Errors
///
/// Returns [`CipherError::InvalidInput`] if either argument is empty, and
/// [`CipherError::DecryptionFailed`] for anything wrong with the envelope or
/// the password.
pub fn decrypt(envelope: &str, password: &str) -> Result<String, CipherError> {
    require_non_empty(password, "password must not be empty")?;
    require_non_empty(envelope, "ciphertext must not be empty")?;

    let envelope = Envelope::from_base64(envelope)?;
    let plaintext = open(&envelope, password)?;
    String::from_utf8(plaintext).map_err(|_| DecryptFailure::Encoding.into())
}

/// Pad and encrypt raw bytes into an [`Envelope`].
pub fn seal(plaintext: &[u8], password: &str) -> Result<Envelope, CipherError> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let key = derive_key(password, &salt)?;
    let ciphertext = Aes256CbcEnc::new(
        Key::<Aes256CbcEnc>::from_slice(&key[..]),
        Iv::<Aes256CbcEnc>::from_slice(&iv),
    )
    .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    Ok(Envelope {
        salt,
        iv,
        ciphertext,
    })
}

/// Decrypt and unpad an [`Envelope`], returning the raw plaintext bytes.
///
/// # Errors
///
/// Returns [`CipherError::DecryptionFailed`] with [`DecryptFailure::Padding`]
/// when the PKCS#7 check fails, which is what a wrong password usually looks like.
pub fn open(envelope: &Envelope, password: &str) -> Result<Vec<u8>, CipherError> {
    let key = derive_key(password, &envelope.salt)?;
    Aes256CbcDec::new(
        Key::<Aes256CbcDec>::from_slice(&key[..]),
        Iv::<Aes256CbcDec>::from_slice(&envelope.iv),
    )
    .decrypt_padded_vec_mut::<Pkcs7>(&envelope.ciphertext)
    .map_err(|_| DecryptFailure::Padding.into())
}

fn require_non_empty(value: &str, message: &'static str) -> Result<(), CipherError> {
    if value.is_empty() {
        return Err(CipherError::InvalidInput(message));
    }
    Ok(())
}
