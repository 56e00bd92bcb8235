//! Endpoint Health Probing Module
//!
//! Bounded-time reachability checks against `{endpoint}/health`:
//! - Injectable HTTP client seam (isahc in production, mocks in tests)
//! - Hard per-probe timeout driven by the runtime timer
//! - Typed failure reasons separating "unreachable" from "unhealthy"

pub mod client;
pub mod config;
pub mod probe;
pub mod url;

// Re-export public API
pub use client::{default_client, HealthCheckClient, HealthResponse, TransportError};
pub use config::ProbeOptions;
pub use probe::HealthProbe;
pub use url::{build_health_url, is_absolute_http_url, is_loopback_host, normalize_base_url};

#[cfg(feature = "http-probe")]
pub use client::IsahcHealthCheckClient;

#[cfg(not(feature = "http-probe"))]
pub use client::DisabledHealthCheckClient;
