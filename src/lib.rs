//! # tripmate
//!
//! 旅行助手运行时：对用户查询进行领域分类，并通过 Gemini generateContent 生成回答。
//!
//! Travel assistant runtime. Decides whether a free-text query is travel-related and,
//! if so, asks the Gemini `generateContent` API for an answer.
//!
//! ## Pipeline
//!
//! ```text
//! Orchestrator ─▶ Prompt / RequestEnvelope ─▶ Gateway ─▶ ResponseExtractor
//!       │                                                       │
//!       └────────────── ClassificationCache ◀──── classify only ┘
//! ```
//!
//! - **Two calls per new query**: one classification call (answer must be `true`), then
//!   one generation call for in-domain queries. Out-of-domain queries stop after the first.
//! - **Cached classification**: the normalized query's verdict is kept in a bounded,
//!   thread-safe cache, so repeated queries skip the classification call.
//! - **Resilient extraction**: answers are read structurally when the payload parses,
//!   and by pattern when it does not. Malformed payloads never raise errors.
//! - **Typed failures**: HTTP and transport problems surface as [`ApiError`]; nothing is
//!   retried inside the crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tripmate::{Orchestrator, QueryOutcome, TripMateConfig};
//!
//! #[tokio::main]
//! async fn main() -> tripmate::Result<()> {
//!     let config = TripMateConfig::from_env()?;
//!     let orchestrator = Orchestrator::from_config(&config)?;
//!
//!     match orchestrator.handle("What's the best time to visit Japan?").await {
//!         QueryOutcome::Answered(text) => println!("{}", text),
//!         other => println!("{}", other.reply()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`envelope`] | Prompt composition, request body, answer extraction |
//! | [`transport`] | HTTP gateway with async, spawned and blocking conventions |
//! | [`cache`] | Bounded classification cache |
//! | [`client`] | Orchestrator and its builder |
//! | [`config`] | Environment-driven configuration |
//! | [`error_code`] | Stable error kinds and retry hints |

pub mod cache;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error_code;
pub mod transport;

// Re-export main types for convenience
pub use cache::{CacheConfig, CacheStats, ClassificationCache, EvictionPolicy, QueryKey};
pub use client::{Orchestrator, OrchestratorBuilder, QueryOutcome};
pub use config::{GatewayConfig, TripMateConfig};
pub use envelope::{Prompt, RequestEnvelope, ResponseExtractor};
pub use transport::{BlockingGateway, Gateway, HttpGateway, PendingCall};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
pub mod error;
pub use error::{ApiError, Error, ErrorContext};
