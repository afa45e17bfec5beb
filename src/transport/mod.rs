//! 传输层：向 generateContent 端点发出单次 HTTPS 调用，带超时与状态码映射。
//!
//! Outbound call layer.
//!
//! [`HttpGateway::call`] is the only code path that talks to the network.
//! [`HttpGateway::spawn_call`] (non-blocking) and [`BlockingGateway::call`] (blocking)
//! are thin adapters over it.

mod blocking;
mod http;

pub use blocking::BlockingGateway;
pub use http::{HttpGateway, PendingCall};

use crate::envelope::RequestEnvelope;
use crate::error::ApiError;
use async_trait::async_trait;

/// One upstream round trip: envelope in, raw 2xx body out.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn call(&self, envelope: &RequestEnvelope) -> Result<String, ApiError>;
}
