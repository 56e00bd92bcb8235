// Core types for endpoint resolution and connectivity diagnostics
use crate::core::endpoint::health::url::normalize_base_url;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("Invalid URL format: {0}")]
    ParseError(#[from] url::ParseError),
    #[error("Missing host in URL")]
    MissingHost,
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Endpoint URL must not carry a {0}")]
    UnexpectedComponent(&'static str),
}

/// Absolute base URL of a backend instance.
///
/// Only constructible through [`Endpoint::parse`] or [`Endpoint::loopback`], so every value held by the
/// resolver, the store or a diagnostics round is a well-formed `http(s)` URL
/// with a host and no userinfo, query or fragment. The inner string never
/// carries a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    pub fn parse(raw: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(raw.trim())?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
        }

        match url.host_str() {
            Some(host) if !host.is_empty() => {}
            _ => return Err(EndpointError::MissingHost),
        }

        if !url.username().is_empty() || url.password().is_some() {
            return Err(EndpointError::UnexpectedComponent("userinfo"));
        }
        if url.query().is_some() {
            return Err(EndpointError::UnexpectedComponent("query"));
        }
        if url.fragment().is_some() {
            return Err(EndpointError::UnexpectedComponent("fragment"));
        }

        Ok(Endpoint(normalize_base_url(url.as_str())))
    }

    /// `http://localhost:{port}`, valid by construction
    pub fn loopback(port: u16) -> Self {
        match port {
            80 => Endpoint("http://localhost".to_string()),
            port => Endpoint(format!("http://localhost:{}", port)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host component, IPv6 literals keep their brackets
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.0)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = EndpointError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Endpoint::parse(&value)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.0
    }
}

/// Which link of the resolution chain produced the active endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointSource {
    /// Compile-time or settings-supplied override, always wins
    BuildOverride,
    /// Embedded native shell detected; carries the reported platform name
    NativePlatform(String),
    /// Page served from a loopback host
    Loopback,
    /// Page scheme and host with the backend port substituted
    HostDerived,
    /// Address confirmed by diagnostics or saved manually
    Persisted,
    /// No page location available at all
    Default,
}

impl std::fmt::Display for EndpointSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointSource::BuildOverride => write!(f, "build_override"),
            EndpointSource::NativePlatform(platform) => write!(f, "native_platform({})", platform),
            EndpointSource::Loopback => write!(f, "loopback"),
            EndpointSource::HostDerived => write!(f, "host_derived"),
            EndpointSource::Persisted => write!(f, "persisted"),
            EndpointSource::Default => write!(f, "default"),
        }
    }
}

/// The active endpoint together with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub endpoint: Endpoint,
    pub source: EndpointSource,
}

impl ResolvedConfig {
    pub fn new(endpoint: Endpoint, source: EndpointSource) -> Self {
        Self { endpoint, source }
    }
}

/// Why a probe did not confirm reachability
///
/// `Timeout` and the transport variants describe "host unreachable";
/// `HttpStatus` describes "host answered but the service is unhealthy".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProbeFailure {
    Timeout,
    ConnectionFailed(String),
    DnsFailed(String),
    TlsFailed(String),
    TransportError(String),
    HttpStatus(u16),
    InvalidEndpoint(String),
}

impl ProbeFailure {
    /// Stable short code for display and log fields
    pub fn code(&self) -> &'static str {
        match self {
            ProbeFailure::Timeout => "timeout",
            ProbeFailure::ConnectionFailed(_) => "connection_failed",
            ProbeFailure::DnsFailed(_) => "dns_failed",
            ProbeFailure::TlsFailed(_) => "tls_failed",
            ProbeFailure::TransportError(_) => "transport_error",
            ProbeFailure::HttpStatus(_) => "http_status",
            ProbeFailure::InvalidEndpoint(_) => "invalid_endpoint",
        }
    }
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeFailure::Timeout => write!(f, "timeout"),
            ProbeFailure::HttpStatus(code) => write!(f, "http_status: {}", code),
            ProbeFailure::ConnectionFailed(msg)
            | ProbeFailure::DnsFailed(msg)
            | ProbeFailure::TlsFailed(msg)
            | ProbeFailure::TransportError(msg)
            | ProbeFailure::InvalidEndpoint(msg) => write!(f, "{}: {}", self.code(), msg),
        }
    }
}

/// Result of a single bounded-time reachability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub reachable: bool,
    pub latency_ms: u64,
    pub reason: Option<ProbeFailure>,
}

impl ProbeReport {
    pub fn reachable(latency_ms: u64) -> Self {
        Self {
            reachable: true,
            latency_ms,
            reason: None,
        }
    }

    pub fn failed(latency_ms: u64, reason: ProbeFailure) -> Self {
        Self {
            reachable: false,
            latency_ms,
            reason: Some(reason),
        }
    }
}

/// Per-row probe state shown by the diagnostics screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CandidateState {
    #[default]
    Pending,
    Testing,
    Success,
    Failed,
}

/// An endpoint under test during one diagnostics round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// URL exactly as supplied by the caller
    pub url: String,
    pub state: CandidateState,
    pub latency_ms: Option<u64>,
    pub reason: Option<ProbeFailure>,
}

impl Candidate {
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: CandidateState::Pending,
            latency_ms: None,
            reason: None,
        }
    }

    pub fn testing(url: impl Into<String>) -> Self {
        let mut candidate = Self::pending(url);
        candidate.mark_testing();
        candidate
    }

    /// Settled candidate built from a finished probe
    pub fn from_report(url: impl Into<String>, report: ProbeReport) -> Self {
        Self {
            url: url.into(),
            state: if report.reachable {
                CandidateState::Success
            } else {
                CandidateState::Failed
            },
            latency_ms: Some(report.latency_ms),
            reason: report.reason,
        }
    }

    /// Settled failure that never reached the network
    pub fn rejected(url: impl Into<String>, reason: ProbeFailure) -> Self {
        Self {
            url: url.into(),
            state: CandidateState::Failed,
            latency_ms: None,
            reason: Some(reason),
        }
    }

    pub fn mark_testing(&mut self) {
        self.state = CandidateState::Testing;
        self.latency_ms = None;
        self.reason = None;
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.state, CandidateState::Success | CandidateState::Failed)
    }

    pub fn is_success(&self) -> bool {
        self.state == CandidateState::Success
    }
}

/// Identity of one diagnostics round; later rounds have larger ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoundId(pub u64);

impl std::fmt::Display for RoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "round-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    #[default]
    Idle,
    Testing,
    Settled,
}

/// Round-level outcome after the selection policy ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RoundOutcome {
    /// First reachable candidate (declaration order) was written to the store
    Promoted { endpoint: Endpoint },
    /// Every candidate failed; the store was left untouched
    NoneReachable,
    /// A newer round started before this one settled; results were discarded
    Superseded,
    /// A winner existed but the store rejected the write
    PersistFailed { url: String, reason: String },
}

/// Everything a caller needs to render a finished round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: RoundId,
    pub candidates: Vec<Candidate>,
    pub outcome: RoundOutcome,
}

impl RoundReport {
    pub fn promoted(&self) -> Option<&Endpoint> {
        match &self.outcome {
            RoundOutcome::Promoted { endpoint } => Some(endpoint),
            _ => None,
        }
    }

    pub fn all_failed(&self) -> bool {
        !self.candidates.iter().any(Candidate::is_success)
    }
}
