//! Server configuration.
//!
//! Configuration is built either programmatically through the builder or
//! from the environment. The environment surface matches the deployment
//! convention: `PORT` selects the TCP port and `HOST` the bind address.
//!
//! # Example
//!
//! ```rust
//! use acervo_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .http_addr("0.0.0.0:8080")
//!     .shutdown_timeout(Duration::from_secs(30))
//!     .build();
//!
//! assert_eq!(config.http_addr(), "0.0.0.0:8080");
//! ```

use std::net::SocketAddr;
use std::time::Duration;

/// Environment variable selecting the TCP port.
pub const ENV_PORT: &str = "PORT";

/// Environment variable selecting the bind host.
pub const ENV_HOST: &str = "HOST";

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default TCP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default graceful shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default request body collection timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default request body size cap in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Server configuration.
///
/// Use [`ServerConfig::builder()`] or [`ServerConfig::from_env()`] to
/// construct instances.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP bind address (e.g. "0.0.0.0:3000")
    http_addr: String,

    /// How long to wait for in-flight connections during shutdown
    shutdown_timeout: Duration,

    /// Per-request body collection timeout
    request_timeout: Duration,

    /// Request body size cap
    max_body_bytes: usize,
}

impl ServerConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Builds a configuration from `PORT` and `HOST`.
    ///
    /// Missing variables fall back to the defaults (`0.0.0.0:3000`). An
    /// unparseable `PORT` is logged and ignored rather than failing startup.
    #[must_use]
    pub fn from_env() -> Self {
        let host = std::env::var(ENV_HOST).ok();
        let port = std::env::var(ENV_PORT).ok();
        Self::from_values(host.as_deref(), port.as_deref())
    }

    fn from_values(host: Option<&str>, port: Option<&str>) -> Self {
        let host = match host {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => DEFAULT_HOST.to_string(),
        };

        let port = port
            .and_then(|raw| match raw.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    tracing::warn!(value = raw, "Ignoring unparseable PORT value");
                    None
                }
            })
            .unwrap_or(DEFAULT_PORT);

        Self::builder().http_addr(format!("{host}:{port}")).build()
    }

    /// Returns the HTTP bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses and returns the HTTP address as a `SocketAddr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// Returns the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Returns the request body collection timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the request body size cap in bytes.
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
    request_timeout: Duration,
    max_body_bytes: usize,
}

impl ServerConfigBuilder {
    /// Creates a builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_addr: format!("{DEFAULT_HOST}:{DEFAULT_PORT}"),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets the request body collection timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the request body size cap in bytes.
    #[must_use]
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Builds the [`ServerConfig`].
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
            request_timeout: self.request_timeout,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.http_addr(), "0.0.0.0:3000");
        assert_eq!(
            config.shutdown_timeout(),
            Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS)
        );
        assert_eq!(
            config.request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(config.max_body_bytes(), DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_builder_chaining() {
        let config = ServerConfig::builder()
            .http_addr("127.0.0.1:9090")
            .shutdown_timeout(Duration::from_secs(45))
            .request_timeout(Duration::from_secs(10))
            .max_body_bytes(64 * 1024)
            .build();

        assert_eq!(config.http_addr(), "127.0.0.1:9090");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(45));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.max_body_bytes(), 64 * 1024);
    }

    #[test]
    fn test_socket_addr_parsing() {
        let config = ServerConfig::builder().http_addr("127.0.0.1:8080").build();

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_socket_addr_invalid() {
        let config = ServerConfig::builder()
            .http_addr("not-a-valid-address")
            .build();

        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_from_values_defaults() {
        let config = ServerConfig::from_values(None, None);
        assert_eq!(config.http_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_from_values_custom_port() {
        let config = ServerConfig::from_values(None, Some("8081"));
        assert_eq!(config.http_addr(), "0.0.0.0:8081");
    }

    #[test]
    fn test_from_values_custom_host() {
        let config = ServerConfig::from_values(Some("127.0.0.1"), Some("3000"));
        assert_eq!(config.http_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_from_values_unparseable_port_falls_back() {
        let config = ServerConfig::from_values(None, Some("nine-thousand"));
        assert_eq!(config.http_addr(), "0.0.0.0:3000");

        let config = ServerConfig::from_values(None, Some("99999"));
        assert_eq!(config.http_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_from_values_empty_host_falls_back() {
        let config = ServerConfig::from_values(Some(""), Some("4000"));
        assert_eq!(config.http_addr(), "0.0.0.0:4000");
    }
}
