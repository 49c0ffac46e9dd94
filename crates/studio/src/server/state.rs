//! Shared application state injected into every Axum handler.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::config::Config;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable so that Axum can clone the state for each
/// request without copying expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Bounds how many PBKDF2 derivations run on the blocking pool at once.
    pub cipher_permits: Arc<Semaphore>,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl AppState {
    /// Create a new [`AppState`] allowing `cipher_jobs` concurrent cipher calls.
    pub fn new(cipher_jobs: usize, max_body_bytes: usize, request_timeout: Duration) -> Self {
        Self {
            cipher_permits: Arc::new(Semaphore::new(cipher_jobs.max(1))),
            max_body_bytes,
            request_timeout,
        }
    }

    /// Build the state from validated configuration, one cipher job per core.
    pub fn from_config(cfg: &Config) -> Self {
        let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
        Self::new(cores, cfg.max_body_bytes, cfg.request_timeout())
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] from default configuration, suitable for tests.
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
