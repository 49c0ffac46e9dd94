//! PBKDF2-HMAC-SHA256 password-to-key derivation.

use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::error::CipherError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the per-envelope salt.
pub const SALT_LEN: usize = 16;

/// PBKDF2 work factor. Part of the envelope contract: changing it makes every
/// existing envelope undecryptable.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Derive the 256-bit AES key for `password` and `salt`.
///
/// Deterministic in its inputs, so decryption recomputes the key from the salt
/// stored in the envelope. The returned buffer is wiped on drop.
///
/// # Errors
///
/// Returns [`CipherError::KeyDerivation`] if the PRF cannot be keyed.
pub fn derive_key(
    password: &str,
    salt: &[u8; SALT_LEN],
) -> Result<Zeroizing<[u8; KEY_LEN]>, CipherError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    derive_into(password.as_bytes(), salt, KDF_ITERATIONS, &mut key[..])?;
    Ok(key)
}

fn derive_into(
    password: &[u8],
    salt: &[u8],
    rounds: u32,
    out: &mut [u8],
) -> Result<(), CipherError> {
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, rounds, out)
        .map_err(|_| CipherError::KeyDerivation)
}
