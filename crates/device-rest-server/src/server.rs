use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::Arc;

use axum::Router;

use device_rest::error::Result;
use device_rest::registry::DeviceRegistry;

use tokio::net::TcpListener;

use tracing::info;

use crate::handler::{RESOURCE_ROUTE, router};
use crate::sink::AsyncValuesSink;

// Default HTTP address.
//
// The entire local network is considered, so the Ipv4 unspecified address is
// used.
const DEFAULT_HTTP_ADDRESS: Ipv4Addr = Ipv4Addr::UNSPECIFIED;

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 59986;

/// Default base path of the ingestion route.
pub const DEFAULT_API_BASE: &str = "/api/v2";

async fn bind(http_address: Ipv4Addr, port: u16) -> Result<TcpListener> {
    let listener_bind = format!("{http_address}:{port}");
    let listener = TcpListener::bind(listener_bind.as_str()).await?;

    info!("Device service reachable at this HTTP address: {listener_bind}");

    Ok(listener)
}

struct ServerData {
    // HTTP address.
    http_address: Ipv4Addr,
    // Server port.
    port: u16,
    // Base path of the ingestion route.
    api_base: String,
    // Device registry.
    registry: Arc<dyn DeviceRegistry>,
    // Async values sink.
    sink: AsyncValuesSink,
}

impl ServerData {
    fn router(self) -> Router {
        let ingestion = router(self.registry, self.sink);

        // An empty base mounts the route at the server root.
        let api_base = self.api_base.trim_matches('/');
        if api_base.is_empty() {
            info!("Server route: [POST, \"{RESOURCE_ROUTE}\"]");
            ingestion
        } else {
            info!("Server route: [POST, \"/{api_base}{RESOURCE_ROUTE}\"]");
            Router::new().nest(&format!("/{api_base}"), ingestion)
        }
    }
}

/// A server receiving the readings pushed by end devices.
pub struct Server {
    data: ServerData,
}

impl Server {
    /// Creates a [`Server`] which looks up devices in `registry` and hands
    /// ingested readings off to `sink`.
    #[must_use]
    pub fn new(registry: Arc<dyn DeviceRegistry>, sink: AsyncValuesSink) -> Self {
        Self {
            data: ServerData {
                http_address: DEFAULT_HTTP_ADDRESS,
                port: DEFAULT_SERVER_PORT,
                api_base: DEFAULT_API_BASE.into(),
                registry,
                sink,
            },
        }
    }

    /// Sets the server `IPv4` address.
    #[must_use]
    pub const fn address(mut self, http_address: Ipv4Addr) -> Self {
        self.data.http_address = http_address;
        self
    }

    /// Sets the server port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.data.port = port;
        self
    }

    /// Sets the base path of the ingestion route.
    #[must_use]
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.data.api_base = api_base.into();
        self
    }

    /// Binds the server address and returns the listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn bind(&self) -> Result<TcpListener> {
        bind(self.data.http_address, self.data.port).await
    }

    /// Transforms the server into a [`GracefulShutdownServer`].
    ///
    /// The [`Future`] passed as input manages the graceful shutdown of
    /// the server.
    #[must_use]
    #[inline]
    pub fn with_graceful_shutdown<F>(self, signal: F) -> GracefulShutdownServer<F>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        GracefulShutdownServer {
            data: self.data,
            signal,
        }
    }

    /// Runs the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to start.
    pub async fn run(self) -> Result<()> {
        self.with_graceful_shutdown(std::future::pending())
            .run()
            .await
    }
}

/// A server with graceful shutdown.
///
/// Aside from the graceful shutdown functionality, it behaves the same as
/// [`Server`].
pub struct GracefulShutdownServer<F> {
    // Server data.
    data: ServerData,
    // Graceful shutdown signal.
    signal: F,
}

impl<F> GracefulShutdownServer<F>
where
    F: Future<Output = ()> + Send + 'static,
{
    /// Runs the server with graceful shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to start.
    pub async fn run(self) -> Result<()> {
        let listener = bind(self.data.http_address, self.data.port).await?;
        self.serve(listener).await
    }

    /// Runs the server with graceful shutdown on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the server stops because of an I/O failure.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let router = self.data.router();

        info!("Starting server...");

        axum::serve(listener, router)
            .with_graceful_shutdown(self.signal)
            .await?;

        info!("Server stopped");

        Ok(())
    }
}
