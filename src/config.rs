//! 运行配置：从环境变量读取端点、凭据、超时与缓存参数。
//!
//! Runtime configuration.
//!
//! Values come from environment variables with conservative defaults. Lookups go
//! through a closure so tests can supply values without touching the process env.

use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::cache::{CacheConfig, EvictionPolicy, MAX_CACHE_SIZE};
use crate::{Error, ErrorContext, Result};

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the HTTP gateway needs. The credential is redacted from `Debug`.
#[derive(Clone)]
pub struct GatewayConfig {
    pub endpoint: Url,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            endpoint: parse_endpoint(endpoint, "endpoint")?,
            api_key: api_key.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            pool_max_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        })
    }

    /// Endpoint for `generateContent` on the given model.
    pub fn for_model(model: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::new(&model_endpoint(model), api_key)
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_pool(mut self, max_idle_per_host: usize, idle_timeout: Duration) -> Self {
        self.pool_max_idle_per_host = max_idle_per_host;
        self.pool_idle_timeout = idle_timeout;
        self
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("pool_max_idle_per_host", &self.pool_max_idle_per_host)
            .field("pool_idle_timeout", &self.pool_idle_timeout)
            .finish()
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct TripMateConfig {
    pub gateway: GatewayConfig,
    pub cache: CacheConfig,
    /// Classify keyword-bearing queries locally on a cache miss.
    pub keyword_shortcut: bool,
}

impl TripMateConfig {
    pub fn new(gateway: GatewayConfig) -> Self {
        Self {
            gateway,
            cache: CacheConfig::default(),
            keyword_shortcut: false,
        }
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns the raw value of a variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "API key not set",
                    ErrorContext::new()
                        .with_field_path(API_KEY_VAR)
                        .with_details("set it in the environment or a .env file")
                        .with_source("config"),
                )
            })?;

        let endpoint = match lookup("TRIPMATE_ENDPOINT").filter(|s| !s.trim().is_empty()) {
            Some(raw) => parse_endpoint(raw.trim(), "TRIPMATE_ENDPOINT")?,
            None => {
                let model = lookup("TRIPMATE_MODEL")
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string());
                parse_endpoint(&model_endpoint(model.trim()), "TRIPMATE_MODEL")?
            }
        };

        let secs = |name: &str, default: u64| {
            lookup(name)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let gateway = GatewayConfig {
            endpoint,
            api_key,
            connect_timeout: Duration::from_secs(secs("TRIPMATE_CONNECT_TIMEOUT_SECS", 10).max(1)),
            request_timeout: Duration::from_secs(secs("TRIPMATE_TIMEOUT_SECS", 30).max(1)),
            pool_max_idle_per_host: lookup("TRIPMATE_HTTP_POOL_MAX_IDLE_PER_HOST")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(32),
            pool_idle_timeout: Duration::from_secs(secs("TRIPMATE_HTTP_POOL_IDLE_TIMEOUT_SECS", 90)),
        };

        let eviction = match lookup("TRIPMATE_CACHE_EVICTION") {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<EvictionPolicy>().map_err(|e| {
                Error::configuration_with_context(
                    "invalid cache eviction policy",
                    ErrorContext::new()
                        .with_field_path("TRIPMATE_CACHE_EVICTION")
                        .with_details(e)
                        .with_source("config"),
                )
            })?,
            _ => EvictionPolicy::default(),
        };

        let cache = CacheConfig {
            capacity: lookup("TRIPMATE_CACHE_CAPACITY")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(MAX_CACHE_SIZE)
                .max(1),
            eviction,
        };

        let keyword_shortcut = lookup("TRIPMATE_KEYWORD_SHORTCUT")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Self {
            gateway,
            cache,
            keyword_shortcut,
        })
    }
}

fn model_endpoint(model: &str) -> String {
    format!("{}/{}:generateContent", DEFAULT_API_BASE, model)
}

fn parse_endpoint(raw: &str, field: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| {
        Error::configuration_with_context(
            "invalid endpoint URL",
            ErrorContext::new()
                .with_field_path(field)
                .with_details(format!("{}: {}", raw, e))
                .with_source("config"),
        )
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::configuration_with_context(
            "endpoint must use http or https",
            ErrorContext::new()
                .with_field_path(field)
                .with_details(raw.to_string())
                .with_source("config"),
        ));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = TripMateConfig::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "k-123")])).unwrap();
        assert_eq!(
            cfg.gateway.endpoint.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(cfg.gateway.api_key, "k-123");
        assert_eq!(cfg.gateway.connect_timeout, Duration::from_secs(10));
        assert_eq!(cfg.gateway.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.cache.capacity, MAX_CACHE_SIZE);
        assert_eq!(cfg.cache.eviction, EvictionPolicy::Flush);
        assert!(!cfg.keyword_shortcut);
    }

    #[test]
    fn test_overrides() {
        let cfg = TripMateConfig::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("TRIPMATE_MODEL", "gemini-2.0-flash"),
            ("TRIPMATE_TIMEOUT_SECS", "12"),
            ("TRIPMATE_CONNECT_TIMEOUT_SECS", "not-a-number"),
            ("TRIPMATE_CACHE_CAPACITY", "64"),
            ("TRIPMATE_CACHE_EVICTION", "LRU"),
            ("TRIPMATE_KEYWORD_SHORTCUT", "yes"),
        ]))
        .unwrap();
        assert!(cfg.gateway.endpoint.path().ends_with("gemini-2.0-flash:generateContent"));
        assert_eq!(cfg.gateway.request_timeout, Duration::from_secs(12));
        assert_eq!(cfg.gateway.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(cfg.cache.capacity, 64);
        assert_eq!(cfg.cache.eviction, EvictionPolicy::Lru);
        assert!(cfg.keyword_shortcut);
    }

    #[test]
    fn test_explicit_endpoint_wins() {
        let cfg = TripMateConfig::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("TRIPMATE_MODEL", "ignored"),
            ("TRIPMATE_ENDPOINT", "http://127.0.0.1:8080/generate"),
        ]))
        .unwrap();
        assert_eq!(cfg.gateway.endpoint.as_str(), "http://127.0.0.1:8080/generate");
    }

    #[test]
    fn test_missing_key() {
        for pairs in [&[][..], &[("GOOGLE_API_KEY", "   ")][..]] {
            let err = TripMateConfig::from_lookup(lookup_from(pairs)).unwrap_err();
            assert_eq!(
                err.context().and_then(|c| c.field_path.as_deref()),
                Some(API_KEY_VAR)
            );
        }
    }

    #[test]
    fn test_invalid_values() {
        let err = TripMateConfig::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("TRIPMATE_ENDPOINT", "ftp://example.com/x"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));

        let err = TripMateConfig::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("TRIPMATE_CACHE_EVICTION", "random"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("TRIPMATE_CACHE_EVICTION")
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let cfg = GatewayConfig::for_model("gemini-1.5-flash", "super-secret").unwrap();
        let shown = format!("{:?}", cfg);
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("<redacted>"));
    }
}
