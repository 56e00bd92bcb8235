use super::types::Config;
use crate::core::endpoint::resolver::ResolverSettings;
use crate::core::endpoint::rewriter::DEFAULT_PLACEHOLDER;
use crate::core::endpoint::health::ProbeOptions;

impl Default for Config {
    fn default() -> Self {
        let resolver = ResolverSettings::default();

        Config {
            backend_port: resolver.backend_port,
            probe_timeout_ms: ProbeOptions::default().timeout_ms,
            native_schemes: resolver.native_schemes,
            native_fallback: resolver.native_fallback,
            candidates: vec![
                "http://localhost:8000".to_string(),
                "http://127.0.0.1:8000".to_string(),
                "http://10.0.2.2:8000".to_string(),
                "http://192.168.1.100:8000".to_string(),
            ],
            placeholder_image: DEFAULT_PLACEHOLDER.to_string(),
            store_path: None,
            platform_fallbacks: resolver.platform_fallbacks,
        }
    }
}
