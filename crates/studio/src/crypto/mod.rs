//! Password-based AES-256-CBC envelope encryption.
//!
//! This module is intentionally free of HTTP dependencies. Every function is
//! synchronous and CPU-bound (100,000 PBKDF2 iterations per call); async
//! callers should run it on the blocking pool.
//!
//! # Envelope format
//!
//! ```text
//! base64( salt[16] || iv[16] || AES-256-CBC(PKCS#7(utf8(plaintext))) )
//! ```
//!
//! There is no version byte and no MAC. Changing the layout, the KDF, or the
//! iteration count breaks every envelope produced so far.

pub mod envelope;
pub mod error;
pub mod kdf;

pub use envelope::{decrypt, encrypt};
pub use error::CipherError;
pub use kdf::KDF_ITERATIONS;
