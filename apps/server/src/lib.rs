//! # Quarterdeck Server
//!
//! A production-ready admin server built on `Axum` and the adapter-agnostic
//! admin runtime.
//!
//! ## Example
//! ```no_run
//! use qdeck_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(4781)
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

mod router;
mod welcome;

use anyhow::{Context, Result, anyhow};
use axum::Router;
use axum_server::Handle;
use qdeck::admin::BootManager;
use qdeck::domain::config::ApiConfig;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

/// Package root the bundled welcome application registers under.
const DEMO_PACKAGE: &str = "qdeck.contrib.welcome";

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    fn validate_ssl_config(&self) -> Result<()> {
        if let Some(ssl) = &self.cfg.server.ssl {
            if !ssl.cert.exists() {
                anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
            }
            if !ssl.key.exists() {
                anyhow::bail!("SSL key not found at: {}", ssl.key.display());
            }
        }
        Ok(())
    }

    /// Consumes the builder and initializes the server.
    ///
    /// # Process
    /// 1. Validates the TLS configuration
    /// 2. Builds the runtime context with the bundled adapters registered
    /// 3. Boots the admin (adapter binding, validation, discovery, mounting)
    /// 4. Composes the host router (health, API docs, admin, public pages)
    ///
    /// # Errors
    /// Returns an error if the adapter fails validation or the admin router
    /// cannot be composed.
    pub async fn build(self) -> Result<Server> {
        self.validate_ssl_config()?;

        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);
        info!(address = %address, "Initializing server");

        let ctx = qdeck::init(&self.cfg);
        let boot = BootManager::new(&ctx, None);

        let hub = boot.hub().map_err(|e| anyhow!("Admin hub bootstrap failed: {e}"))?;
        hub.discovery().provide(DEMO_PACKAGE, vec![welcome::app_config()]);
        hub.site().pages().register_public(welcome::public_router(), "");

        let app = boot
            .init(router::init(), None, &[DEMO_PACKAGE.to_owned()])
            .map_err(|e| anyhow!("Admin bootstrap failed: {e}"))?;

        Ok(Server { cfg: self.cfg, boot, app })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    cfg: ApiConfig,
    boot: BootManager,
    app: Router,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Returns the composed host router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.app
    }

    /// Runs the framework startup hooks without serving (test harnesses).
    ///
    /// # Errors
    /// Returns an error when site finalization fails.
    pub async fn start_admin(&self) -> Result<()> {
        self.boot.startup().await.map_err(|e| anyhow!("Admin startup failed: {e}"))
    }

    /// Starts the server and runs until the shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address
    /// or if TLS setup fails.
    pub async fn run(self) -> Result<()> {
        let cfg = self.cfg.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);

        info!(
            address = %address,
            ssl = cfg.server.ssl.is_some(),
            "Starting server"
        );

        self.boot.startup().await.map_err(|e| anyhow!("Admin startup failed: {e}"))?;

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        // Spawn shutdown signal listener
        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(std::time::Duration::from_secs(30)));
        });

        let service = self.app.into_make_service();
        if let Some(ssl_config) = &cfg.server.ssl {
            info!("Starting HTTPS server on https://{address}");

            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &ssl_config.cert,
                &ssl_config.key,
            )
            .await
            .context("Failed to load SSL/TLS certificates")?;

            axum_server::bind_rustls(address, tls_config)
                .handle(handle)
                .serve(service)
                .await
                .context("HTTPS server failed")?;
        } else {
            info!("Starting HTTP server on http://{address}");

            axum_server::bind(address)
                .handle(handle)
                .serve(service)
                .await
                .context("HTTP server failed")?;
        }

        self.boot.shutdown().await.map_err(|e| anyhow!("Admin shutdown failed: {e}"))?;
        info!("Server shutdown complete");
        Ok(())
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
