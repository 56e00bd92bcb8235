//! Probe configuration

/// Upper bound applied to any configured or environment-supplied timeout
pub const MAX_PROBE_TIMEOUT_MS: u32 = 30_000;

/// Probe behaviour options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Hard per-probe budget in milliseconds
    /// Default: 3000ms
    pub timeout_ms: u32,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self { timeout_ms: 3000 }
    }
}

impl ProbeOptions {
    pub fn with_timeout_ms(timeout_ms: u32) -> Self {
        Self {
            timeout_ms: timeout_ms.min(MAX_PROBE_TIMEOUT_MS),
        }
    }

    /// Apply `APISCOUT_TIMEOUT_MS` when it is set to a valid number
    pub fn with_env_override(self) -> Self {
        match timeout_env_var() {
            Some(env_val) => Self::with_timeout_ms(env_val),
            None => self,
        }
    }
}

fn timeout_env_var() -> Option<u32> {
    std::env::var("APISCOUT_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
}
