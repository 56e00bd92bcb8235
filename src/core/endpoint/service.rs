//! Injectable endpoint configuration service
//!
//! Call sites that need "the backend address" hold one of these instead of
//! reading shared storage directly, so tests can swap in a
//! [`MemoryEndpointStore`](super::store::MemoryEndpointStore).

use crate::core::endpoint::resolver::EndpointResolver;
use crate::core::endpoint::rewriter::{ImageUrlRewriter, DEFAULT_PLACEHOLDER};
use crate::core::endpoint::store::{EndpointStore, StoreError};
use crate::core::endpoint::types::{Endpoint, EndpointSource, ResolvedConfig};
use std::sync::Arc;

pub struct EndpointConfigService {
    resolver: EndpointResolver,
    store: Arc<dyn EndpointStore>,
    placeholder: String,
}

impl EndpointConfigService {
    pub fn new(resolver: EndpointResolver, store: Arc<dyn EndpointStore>) -> Self {
        Self {
            resolver,
            store,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Layered resolution: build override, then persisted override, then heuristics
    pub fn current(&self) -> ResolvedConfig {
        if let Some(resolved) = self.resolver.build_override() {
            return resolved;
        }

        match self.store.get() {
            Some(endpoint) => ResolvedConfig::new(endpoint, EndpointSource::Persisted),
            None => self.resolver.resolve(),
        }
    }

    /// Manual save from a settings screen
    pub fn save(&self, raw: &str) -> Result<Endpoint, StoreError> {
        self.store.set(raw)
    }

    /// Forget the persisted override; heuristics apply again
    pub fn reset(&self) -> Result<(), StoreError> {
        self.store.clear()
    }

    pub fn persisted(&self) -> Option<Endpoint> {
        self.store.get()
    }

    /// Rewriter bound to the endpoint active right now
    pub fn rewriter(&self) -> ImageUrlRewriter {
        ImageUrlRewriter::new(self.current().endpoint).with_placeholder(self.placeholder.clone())
    }

    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }

    /// Shared handle for components that promote endpoints
    pub fn store(&self) -> Arc<dyn EndpointStore> {
        Arc::clone(&self.store)
    }
}
