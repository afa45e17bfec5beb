use crate::cache::{CacheConfig, ClassificationCache};
use crate::client::core::Orchestrator;
use crate::transport::Gateway;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Builder for [`Orchestrator`].
///
/// Keep this surface area small and predictable.
pub struct OrchestratorBuilder {
    gateway: Option<Arc<dyn Gateway>>,
    cache: Option<Arc<ClassificationCache>>,
    cache_config: CacheConfig,
    keyword_shortcut: bool,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            gateway: None,
            cache: None,
            cache_config: CacheConfig::default(),
            keyword_shortcut: false,
        }
    }

    /// Upstream gateway. Required.
    pub fn gateway(mut self, gateway: Arc<dyn Gateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Share an existing cache instead of creating one from `cache_config`.
    pub fn shared_cache(mut self, cache: Arc<ClassificationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Classify queries containing a travel keyword locally on a cache miss.
    ///
    /// Off by default, so every miss costs one classification call.
    pub fn keyword_shortcut(mut self, enable: bool) -> Self {
        self.keyword_shortcut = enable;
        self
    }

    pub fn build(self) -> Result<Orchestrator> {
        let gateway = self.gateway.ok_or_else(|| {
            Error::configuration_with_context(
                "orchestrator requires a gateway",
                ErrorContext::new()
                    .with_field_path("gateway")
                    .with_source("orchestrator_builder"),
            )
        })?;
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ClassificationCache::new(self.cache_config)));

        Ok(Orchestrator {
            gateway,
            cache,
            keyword_shortcut: self.keyword_shortcut,
            greeting: OnceCell::new(),
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
