//! Single bounded-time reachability check
//!
//! The probe wraps the client future in a runtime timeout, so the in-flight
//! request is dropped (cancelled) exactly when the budget elapses regardless
//! of the client's own timeout handling. Every outcome, including transport
//! failures, is folded into a [`ProbeReport`]; nothing is returned as an error.

use crate::core::endpoint::debug_logger::get_debug_logger;
use crate::core::endpoint::health::client::{HealthCheckClient, TransportError};
use crate::core::endpoint::health::url::build_health_url;
use crate::core::endpoint::types::{Endpoint, ProbeFailure, ProbeReport};
use std::sync::Arc;
use std::time::{Duration, Instant};

impl From<TransportError> for ProbeFailure {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => ProbeFailure::Timeout,
            TransportError::Connect(msg) => ProbeFailure::ConnectionFailed(msg),
            TransportError::Dns(msg) => ProbeFailure::DnsFailed(msg),
            TransportError::Tls(msg) => ProbeFailure::TlsFailed(msg),
            TransportError::Other(msg) => ProbeFailure::TransportError(msg),
        }
    }
}

/// Health probe bound to one HTTP client
#[derive(Clone)]
pub struct HealthProbe {
    client: Arc<dyn HealthCheckClient>,
}

impl HealthProbe {
    pub fn new(client: Arc<dyn HealthCheckClient>) -> Self {
        Self { client }
    }

    /// Probe `{endpoint}/health` within `timeout_ms`
    ///
    /// `reachable` is true only for a 2xx answer. A non-2xx answer yields
    /// `ProbeFailure::HttpStatus`, an elapsed budget yields `ProbeFailure::Timeout`.
    pub async fn probe(&self, endpoint: &Endpoint, timeout_ms: u32) -> ProbeReport {
        let debug_logger = get_debug_logger();
        let probe_id = format!("probe_{}", uuid::Uuid::new_v4());
        debug_logger.probe_start(endpoint.as_str(), timeout_ms as u64, probe_id.clone());

        let url = build_health_url(endpoint.as_str());
        let start = Instant::now();
        let budget = Duration::from_millis(timeout_ms as u64);

        let outcome = tokio::time::timeout(budget, self.client.get_health(url, timeout_ms)).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let report = match outcome {
            Err(_elapsed) => ProbeReport::failed(latency_ms, ProbeFailure::Timeout),
            Ok(Err(err)) => ProbeReport::failed(latency_ms, err.into()),
            Ok(Ok(response)) if (200..300).contains(&response.status_code) => {
                ProbeReport::reachable(latency_ms)
            }
            Ok(Ok(response)) => {
                ProbeReport::failed(latency_ms, ProbeFailure::HttpStatus(response.status_code))
            }
        };

        debug_logger.probe_end(
            endpoint.as_str(),
            report.reachable,
            report.reason.as_ref().map(|r| r.code()),
            latency_ms,
            probe_id,
        );

        report
    }
}
