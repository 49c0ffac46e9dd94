//! Tracing setup: structured JSON logs, with optional OpenTelemetry span export.
//!
//! # Telemetry invariants
//!
//! - **No passwords, plaintexts, envelopes, or key material** may appear in any
//!   span attribute or log field. Handlers log sizes and outcomes only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`) and can be
//!   overridden with `RUST_LOG`.

pub mod init;

pub use init::init_telemetry;
