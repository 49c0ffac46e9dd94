//! Common types, protocol definitions, and errors shared across `aes-studio` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
