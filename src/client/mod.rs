//! 查询编排：分类 → 生成，统一错误处理，分类结果走缓存。
//!
//! Query orchestration.
//!
//! [`Orchestrator`] composes prompt building, the gateway, answer extraction and the
//! classification cache into the operations the application needs:
//! `classify`, `generate`, `handle`, `greeting`, `clear_cache` and `cache_stats`.

mod builder;
mod core;
pub mod keywords;
mod outcome;


pub use builder::OrchestratorBuilder;
pub use self::core::Orchestrator;
pub use outcome::{QueryOutcome, DEFAULT_GREETING, FALLBACK_ANSWER, REDIRECT_MESSAGE};
