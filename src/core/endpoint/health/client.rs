//! Health Check Client Implementations
//!
//! Provides the HTTP client abstraction used by [`HealthProbe`](super::HealthProbe):
//! GET method, no redirects, status code and timing only.

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "http-probe")]
use isahc::config::{Configurable, RedirectPolicy};
#[cfg(feature = "http-probe")]
use isahc::{AsyncReadResponseExt, HttpClient, Request};
#[cfg(feature = "http-probe")]
use std::time::Instant;

/// Transport-level failure reported by a [`HealthCheckClient`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("name resolution failed: {0}")]
    Dns(String),
    #[error("TLS failure: {0}")]
    Tls(String),
    #[error("request failed: {0}")]
    Other(String),
}

/// Health check response; the body is drained but not kept
#[derive(Debug, Clone)]
pub struct HealthResponse {
    /// HTTP status code from health endpoint
    pub status_code: u16,
    /// Request duration as measured by the client
    pub duration: Duration,
}

/// Dedicated HTTP client for health check operations
#[async_trait::async_trait]
pub trait HealthCheckClient: Send + Sync {
    /// Execute GET request to health endpoint
    ///
    /// # Arguments
    /// * `url` - Complete health check URL (e.g., "http://10.0.0.5:8000/health")
    /// * `timeout_ms` - Advisory request timeout; the probe enforces the hard limit
    ///
    /// # Implementation Requirements
    /// * Must use GET method
    /// * Must not follow redirects (3xx is reported as-is)
    async fn get_health(&self, url: String, timeout_ms: u32) -> Result<HealthResponse, TransportError>;
}

/// Production health check client implementation using isahc
#[cfg(feature = "http-probe")]
pub struct IsahcHealthCheckClient {
    client: HttpClient,
}

#[cfg(feature = "http-probe")]
#[async_trait::async_trait]
impl HealthCheckClient for IsahcHealthCheckClient {
    async fn get_health(&self, url: String, timeout_ms: u32) -> Result<HealthResponse, TransportError> {
        let start = Instant::now();

        let request = Request::get(&url)
            .timeout(Duration::from_millis(timeout_ms as u64))
            .redirect_policy(RedirectPolicy::None)
            .header("User-Agent", concat!("apiscout/", env!("CARGO_PKG_VERSION")))
            .header("Accept", "application/json")
            .body(Vec::new())
            .map_err(|e| TransportError::Other(format!("Health check request creation failed: {}", e)))?;

        let mut response = self
            .client
            .send_async(request)
            .await
            .map_err(classify_isahc_error)?;

        let status_code = response.status().as_u16();

        // Drain the body so the connection can be reused
        let _ = response.consume().await;

        Ok(HealthResponse {
            status_code,
            duration: start.elapsed(),
        })
    }
}

#[cfg(feature = "http-probe")]
impl IsahcHealthCheckClient {
    pub fn new() -> Result<Self, TransportError> {
        let client = HttpClient::builder()
            .redirect_policy(RedirectPolicy::None)
            .build()
            .map_err(|e| TransportError::Other(format!("Failed to create health check client: {}", e)))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http-probe")]
fn classify_isahc_error(err: isahc::Error) -> TransportError {
    use isahc::error::ErrorKind;

    let message = err.to_string();
    match err.kind() {
        ErrorKind::Timeout => TransportError::Timeout,
        ErrorKind::NameResolution => TransportError::Dns(message),
        ErrorKind::ConnectionFailed => TransportError::Connect(message),
        ErrorKind::BadServerCertificate | ErrorKind::BadClientCertificate | ErrorKind::TlsEngine => {
            TransportError::Tls(message)
        }
        _ => TransportError::Other(message),
    }
}

/// Client used when the `http-probe` feature is disabled; every probe fails
#[cfg(not(feature = "http-probe"))]
#[derive(Default)]
pub struct DisabledHealthCheckClient;

#[cfg(not(feature = "http-probe"))]
#[async_trait::async_trait]
impl HealthCheckClient for DisabledHealthCheckClient {
    async fn get_health(&self, _url: String, _timeout_ms: u32) -> Result<HealthResponse, TransportError> {
        Err(TransportError::Other(
            "http-probe feature disabled at build time".to_string(),
        ))
    }
}

/// Client for the current build configuration
pub fn default_client() -> Result<Arc<dyn HealthCheckClient>, TransportError> {
    #[cfg(feature = "http-probe")]
    let client: Arc<dyn HealthCheckClient> = Arc::new(IsahcHealthCheckClient::new()?);
    #[cfg(not(feature = "http-probe"))]
    let client: Arc<dyn HealthCheckClient> = Arc::new(DisabledHealthCheckClient);

    Ok(client)
}
