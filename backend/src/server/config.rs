//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use tour_backend::domain::DeploymentMode;
use tour_backend::inbound::http::settings::AppSettings;

/// Configuration for creating the HTTP server.
#[derive(Clone, Copy, Debug)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) mode: DeploymentMode,
}

impl ServerConfig {
    /// Construct a server configuration from validated settings.
    #[must_use]
    pub fn new(settings: AppSettings) -> Self {
        Self {
            bind_addr: settings.bind_addr,
            mode: settings.mode,
        }
    }
}
