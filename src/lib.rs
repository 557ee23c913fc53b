//! whois_relay library: WHOIS over TLS with referral chasing
//!
//! Clients open a TLS connection, send one query line, and receive the
//! responses of every WHOIS server visited from the IANA root down the
//! `whois:` referral chain, separated by blank lines.
//!
//! # Example
//!
//! ```no_run
//! use whois_relay::{run_server, Config};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     listen: "127.0.0.1:43443".to_string(),
//!     cert_path: PathBuf::from("server.cer"),
//!     key_path: PathBuf::from("server.key"),
//!     ..Default::default()
//! };
//!
//! run_server(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod app;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod server;
mod utils;
pub mod whois;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use run::run_server;
pub use server::WhoisServer;
pub use whois::{Resolver, ResolverOptions, TcpAuthorityClient};

mod run {
    use std::sync::Arc;

    use anyhow::{Context, Result};
    use log::info;
    use tokio_util::sync::CancellationToken;

    use crate::app::cancel_on_signal;
    use crate::config::{normalize_listen_addr, Config};
    use crate::initialization::init_tls_acceptor;
    use crate::server::WhoisServer;
    use crate::whois::{Resolver, ResolverOptions, TcpAuthorityClient};

    /// Runs the TLS WHOIS front end until Ctrl-C or SIGTERM.
    ///
    /// The configuration is validated, the certificate and key are loaded,
    /// the listener is bound, and connections are served until a shutdown
    /// signal arrives.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The configuration is invalid
    /// - The certificate or private key cannot be loaded
    /// - The listen address cannot be bound
    /// - The listener fails while serving
    pub async fn run_server(config: Config) -> Result<()> {
        config.validate().context("Invalid configuration")?;
        let addr = normalize_listen_addr(&config.listen)?;

        let acceptor = init_tls_acceptor(&config.cert_path, &config.key_path)
            .context("Failed to load TLS certificate and key")?;

        let client = TcpAuthorityClient::new()
            .with_timeout(config.upstream_timeout())
            .with_retries(config.upstream_retries);
        let resolver = Arc::new(Resolver::with_options(
            client,
            ResolverOptions {
                max_hops: config.max_hops,
                ..Default::default()
            },
        ));

        let server = WhoisServer::bind(&addr, acceptor, resolver, config.client_timeout())
            .await
            .context("Failed to start listener")?;
        info!(
            "Listening for WHOIS over TLS on {}",
            server.local_addr().context("Failed to read listen address")?
        );

        let shutdown = CancellationToken::new();
        let signal_task = cancel_on_signal(shutdown.clone());

        let served = server.serve(shutdown).await;
        signal_task.abort();
        served.context("Listener stopped")?;

        info!("Server stopped");
        Ok(())
    }
}
