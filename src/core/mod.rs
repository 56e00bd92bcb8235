pub mod endpoint;

pub use endpoint::{EndpointConfigService, EndpointResolver, ResolvedConfig};
