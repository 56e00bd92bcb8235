pub mod debug_logger;
pub mod diagnostics;
pub mod health;
pub mod render;
pub mod resolver;
pub mod rewriter;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use debug_logger::{get_debug_logger, DiagnosticsLogger};
pub use diagnostics::{DiagnosticsBoard, DiagnosticsController};
pub use health::{HealthCheckClient, HealthProbe, HealthResponse, TransportError};
pub use resolver::{EndpointResolver, PlatformBridge, PlatformContext, ResolverSettings};
pub use rewriter::{rewrite_image_url, ImageUrlRewriter, DEFAULT_PLACEHOLDER};
pub use service::EndpointConfigService;
pub use store::{EndpointStore, FileEndpointStore, MemoryEndpointStore, StoreError};
pub use types::*;
