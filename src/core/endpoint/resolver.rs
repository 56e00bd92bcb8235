/*!
Endpoint resolution from build-time and runtime signals.

`EndpointResolver::resolve` walks a fixed priority chain and returns the
first endpoint it can produce:

1. **Build override**: compile-time `APISCOUT_API_URL` (or the settings field)
2. **Native shell**: custom page scheme or a bridge reporting a native platform
3. **Loopback**: page served from `localhost` / `127.0.0.1` / `::1`
4. **Host-derived**: page scheme + host with the backend port substituted
5. **Default**: loopback at the backend port when there is no page location

The resolver performs no I/O and never reads the endpoint store; layering the
persisted override on top is the job of
[`EndpointConfigService`](crate::core::endpoint::service::EndpointConfigService).
*/

use crate::core::endpoint::debug_logger::get_debug_logger;
use crate::core::endpoint::health::url::is_loopback_host;
use crate::core::endpoint::types::{Endpoint, EndpointSource, ResolvedConfig};
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

/// Build-time override baked in by `APISCOUT_API_URL=... cargo build`
pub const BUILD_OVERRIDE: Option<&str> = option_env!("APISCOUT_API_URL");

/// Well-known backend port
pub const DEFAULT_BACKEND_PORT: u16 = 8000;

/// Object injected by a native shell into the embedded web context
pub trait PlatformBridge: Send + Sync {
    fn is_native_platform(&self) -> bool;
    fn get_platform(&self) -> String;
}

/// Bridge driven by `APISCOUT_NATIVE_PLATFORM`, used by the CLI
#[derive(Debug, Clone)]
pub struct EnvPlatformBridge {
    platform: String,
}

impl EnvPlatformBridge {
    pub fn from_env() -> Option<Self> {
        std::env::var("APISCOUT_NATIVE_PLATFORM")
            .ok()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .map(|platform| Self { platform })
    }
}

impl PlatformBridge for EnvPlatformBridge {
    fn is_native_platform(&self) -> bool {
        self.platform != "web"
    }

    fn get_platform(&self) -> String {
        self.platform.clone()
    }
}

/// Runtime signals describing where the client is executing
#[derive(Clone, Default)]
pub struct PlatformContext {
    /// Location of the current page, if the client runs inside a web context
    pub location: Option<Url>,
    /// Bridge object exposed by a native shell
    pub bridge: Option<Arc<dyn PlatformBridge>>,
}

impl PlatformContext {
    /// Context with a page location; unparseable locations are treated as absent
    pub fn with_location(location: &str) -> Self {
        Self {
            location: Url::parse(location.trim()).ok(),
            bridge: None,
        }
    }

    pub fn bridge(mut self, bridge: Arc<dyn PlatformBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Read `APISCOUT_PAGE_URL` and `APISCOUT_NATIVE_PLATFORM`
    pub fn from_env() -> Self {
        let location = std::env::var("APISCOUT_PAGE_URL")
            .ok()
            .and_then(|v| Url::parse(v.trim()).ok());
        let bridge = EnvPlatformBridge::from_env()
            .map(|b| Arc::new(b) as Arc<dyn PlatformBridge>);
        Self { location, bridge }
    }
}

impl std::fmt::Debug for PlatformContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformContext")
            .field("location", &self.location.as_ref().map(Url::as_str))
            .field(
                "bridge",
                &self.bridge.as_ref().map(|b| (b.is_native_platform(), b.get_platform())),
            )
            .finish()
    }
}

/// Static inputs of the resolution chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Unconditional winner when present and non-empty
    pub build_override: Option<String>,
    pub backend_port: u16,
    /// Page schemes that identify the embedded native shell
    pub native_schemes: Vec<String>,
    /// Native fallback when the platform has no dedicated entry
    pub native_fallback: String,
    /// Per-platform native fallbacks keyed by `PlatformBridge::get_platform`
    pub platform_fallbacks: BTreeMap<String, String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        let mut platform_fallbacks = BTreeMap::new();
        // Android emulator reaches the host machine through this NAT address
        platform_fallbacks.insert("android".to_string(), "http://10.0.2.2:8000".to_string());
        platform_fallbacks.insert("ios".to_string(), "http://localhost:8000".to_string());

        Self {
            build_override: BUILD_OVERRIDE.map(str::to_string),
            backend_port: DEFAULT_BACKEND_PORT,
            native_schemes: vec!["capacitor".to_string(), "ionic".to_string()],
            native_fallback: "http://10.0.2.2:8000".to_string(),
            platform_fallbacks,
        }
    }
}

/// Pure decision function producing the best-guess base endpoint
#[derive(Debug, Clone, Default)]
pub struct EndpointResolver {
    settings: ResolverSettings,
    context: PlatformContext,
}

impl EndpointResolver {
    pub fn new(settings: ResolverSettings, context: PlatformContext) -> Self {
        Self { settings, context }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Run the priority chain; cannot fail
    pub fn resolve(&self) -> ResolvedConfig {
        let resolved = self
            .build_override()
            .or_else(|| self.native_platform())
            .or_else(|| self.loopback())
            .or_else(|| self.host_derived())
            .unwrap_or_else(|| ResolvedConfig::new(self.loopback_endpoint(), EndpointSource::Default));

        get_debug_logger().resolve_summary(resolved.endpoint.as_str(), &resolved.source.to_string());
        resolved
    }

    /// Step 1 on its own, used by layered resolution to keep its precedence
    pub fn build_override(&self) -> Option<ResolvedConfig> {
        let raw = self
            .settings
            .build_override
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())?;

        match Endpoint::parse(raw) {
            Ok(endpoint) => Some(ResolvedConfig::new(endpoint, EndpointSource::BuildOverride)),
            Err(e) => {
                get_debug_logger().error_sync(
                    "EndpointResolver",
                    "invalid_build_override",
                    &format!("Ignoring build override {:?}: {}", raw, e),
                );
                None
            }
        }
    }

    fn native_platform(&self) -> Option<ResolvedConfig> {
        let scheme_match = self.context.location.as_ref().is_some_and(|loc| {
            self.settings
                .native_schemes
                .iter()
                .any(|s| s.eq_ignore_ascii_case(loc.scheme()))
        });
        let bridge_native = self
            .context
            .bridge
            .as_ref()
            .is_some_and(|b| b.is_native_platform());

        if !scheme_match && !bridge_native {
            return None;
        }

        let platform = self
            .context
            .bridge
            .as_ref()
            .map(|b| b.get_platform().to_lowercase())
            .unwrap_or_else(|| "unknown".to_string());

        let raw = self
            .settings
            .platform_fallbacks
            .get(&platform)
            .unwrap_or(&self.settings.native_fallback);

        match Endpoint::parse(raw) {
            Ok(endpoint) => Some(ResolvedConfig::new(endpoint, EndpointSource::NativePlatform(platform))),
            Err(e) => {
                get_debug_logger().error_sync(
                    "EndpointResolver",
                    "invalid_native_fallback",
                    &format!("Native fallback {:?} for {} rejected: {}", raw, platform, e),
                );
                None
            }
        }
    }

    fn loopback(&self) -> Option<ResolvedConfig> {
        let host = self.context.location.as_ref()?.host_str()?;
        if is_loopback_host(host) {
            Some(ResolvedConfig::new(self.loopback_endpoint(), EndpointSource::Loopback))
        } else {
            None
        }
    }

    fn host_derived(&self) -> Option<ResolvedConfig> {
        let location = self.context.location.as_ref()?;
        let host = location.host_str()?;
        let derived = format!("{}://{}:{}", location.scheme(), host, self.settings.backend_port);
        Endpoint::parse(&derived)
            .ok()
            .map(|endpoint| ResolvedConfig::new(endpoint, EndpointSource::HostDerived))
    }

    fn loopback_endpoint(&self) -> Endpoint {
        Endpoint::loopback(self.settings.backend_port)
    }
}
