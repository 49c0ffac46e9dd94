//! Classic ciphers and text statistics. No security properties.

pub mod caesar;
pub mod frequency;

pub use caesar::shift;
pub use frequency::letter_frequency;
