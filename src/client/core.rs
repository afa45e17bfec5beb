use crate::cache::{CacheStats, ClassificationCache, QueryKey};
use crate::config::TripMateConfig;
use crate::envelope::{Prompt, RequestEnvelope, ResponseExtractor};
use crate::error::ApiError;
use crate::transport::{Gateway, HttpGateway};
use crate::Result;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use super::builder::OrchestratorBuilder;
use super::keywords::mentions_travel;
use super::outcome::{QueryOutcome, DEFAULT_GREETING, FALLBACK_ANSWER};

/// Query pipeline: classify, then answer in-domain queries.
///
/// Construct once at startup and share through `Arc`. The gateway's connection pool
/// and the classification cache are shared by every concurrent caller.
pub struct Orchestrator {
    pub(crate) gateway: Arc<dyn Gateway>,
    pub(crate) cache: Arc<ClassificationCache>,
    pub(crate) keyword_shortcut: bool,
    pub(crate) greeting: OnceCell<String>,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Build an orchestrator backed by an [`HttpGateway`].
    pub fn from_config(config: &TripMateConfig) -> Result<Self> {
        let gateway = Arc::new(HttpGateway::new(&config.gateway)?);
        OrchestratorBuilder::new()
            .gateway(gateway)
            .cache_config(config.cache.clone())
            .keyword_shortcut(config.keyword_shortcut)
            .build()
    }

    /// Is `query` travel-related?
    ///
    /// Served from the cache when the normalized query was seen before. Otherwise one
    /// classification call is made and only an exact (case-insensitive) `true` answer
    /// counts as in-domain. Failed calls are not cached.
    pub async fn classify(&self, query: &str) -> std::result::Result<bool, ApiError> {
        let key = QueryKey::normalize(query);
        if let Some(in_domain) = self.cache.get(&key) {
            debug!(query, in_domain, "classification cache hit");
            return Ok(in_domain);
        }

        if self.keyword_shortcut && mentions_travel(query) {
            debug!(query, "classified by travel keyword");
            self.cache.put(key, true);
            return Ok(true);
        }

        let envelope = RequestEnvelope::build(&Prompt::classification(query));
        let body = self
            .gateway
            .call(&envelope)
            .await
            .map_err(|e| log_failure("classification", query, e))?;

        let answer = ResponseExtractor::extract(&body);
        let in_domain = answer
            .as_deref()
            .map(|a| a.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if answer.is_none() {
            warn!(query, "classification response held no text; treating as out of domain");
        }

        self.cache.put(key, in_domain);
        Ok(in_domain)
    }

    /// Answer a travel query. An empty extraction yields [`FALLBACK_ANSWER`].
    pub async fn generate(&self, query: &str) -> std::result::Result<String, ApiError> {
        let envelope = RequestEnvelope::build(&Prompt::generation(query));
        let body = self
            .gateway
            .call(&envelope)
            .await
            .map_err(|e| log_failure("generation", query, e))?;

        match ResponseExtractor::extract_with_source(&body) {
            Some((text, source)) => {
                debug!(query, source = source.as_str(), chars = text.len(), "answer extracted");
                Ok(text)
            }
            None => {
                warn!(query, "generation response held no text; using fallback answer");
                Ok(FALLBACK_ANSWER.to_string())
            }
        }
    }

    /// Run one query to a terminal state.
    ///
    /// Classification always completes before any generation call for the same query.
    pub async fn handle(&self, query: &str) -> QueryOutcome {
        match self.classify(query).await {
            Ok(true) => {}
            Ok(false) => {
                info!(query, "query rejected as out of domain");
                return QueryOutcome::Rejected;
            }
            Err(e) => return QueryOutcome::Failed(e),
        }

        match self.generate(query).await {
            Ok(text) => QueryOutcome::Answered(text),
            Err(e) => QueryOutcome::Failed(e),
        }
    }

    /// Welcome greeting, generated once and reused. Failures are not memoized.
    pub async fn greeting(&self) -> std::result::Result<String, ApiError> {
        let greeting = self
            .greeting
            .get_or_try_init(|| async {
                let envelope = RequestEnvelope::build(&Prompt::greeting());
                let body = self
                    .gateway
                    .call(&envelope)
                    .await
                    .map_err(|e| log_failure("greeting", "", e))?;
                Ok::<_, ApiError>(
                    ResponseExtractor::extract(&body).unwrap_or_else(|| DEFAULT_GREETING.to_string()),
                )
            })
            .await?;
        Ok(greeting.clone())
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("classification cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &Arc<ClassificationCache> {
        &self.cache
    }
}

fn log_failure(call: &'static str, query: &str, err: ApiError) -> ApiError {
    if err.retryable() {
        warn!(
            call,
            query,
            http_status = err.status(),
            error_kind = err.kind().name(),
            "upstream call failed: {}",
            err
        );
    } else {
        error!(
            call,
            query,
            http_status = err.status(),
            error_kind = err.kind().name(),
            "upstream call failed: {}",
            err
        );
    }
    err
}
