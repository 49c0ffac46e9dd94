//! `aes-studio`: service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise tracing (JSON logs, optional OTLP export).
//! 3. Build the Axum router around [`AppState`].
//! 4. Bind the listener and serve HTTPS when a certificate is configured,
//!    plain HTTP otherwise.

mod classic;
mod config;
mod crypto;
mod document;
mod server;
mod telemetry;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        tls = cfg.tls_enabled(),
        kdf_iterations = crypto::KDF_ITERATIONS,
        "aes-studio starting"
    );

    // -----------------------------------------------------------------------
    // 3. Router
    // -----------------------------------------------------------------------
    let state = AppState::from_config(&cfg);
    let router = server::router::build(state);

    // -----------------------------------------------------------------------
    // 4. Server
    // -----------------------------------------------------------------------
    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    match (&cfg.tls_cert_path, &cfg.tls_key_path) {
        (Some(cert_path), Some(key_path)) => {
            let tls_config = server::tls::load_server_config(cert_path, key_path)?;
            info!(addr = %addr, "listening (https)");
            server::tls::serve(listener, router, tls_config).await?;
        }
        _ => {
            warn!(addr = %addr, "TLS not configured; passwords travel in cleartext");
            info!(addr = %addr, "listening (http)");
            axum::serve(listener, router).await?;
        }
    }

    Ok(())
}
