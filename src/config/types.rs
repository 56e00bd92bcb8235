use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Contents of `~/.apiscout/config.toml`; every field is optional on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port substituted by the loopback and host-derived heuristics
    pub backend_port: u16,
    /// Hard per-probe budget
    pub probe_timeout_ms: u32,
    /// Page schemes identifying the embedded native shell
    pub native_schemes: Vec<String>,
    pub native_fallback: String,
    /// Ordered diagnostics candidates used when none are given on the command line
    pub candidates: Vec<String>,
    pub placeholder_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    /// Native fallback per platform name (`android`, `ios`, ...)
    pub platform_fallbacks: BTreeMap<String, String>,
}
