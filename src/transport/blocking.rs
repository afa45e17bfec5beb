//! Blocking adapter over the async gateway.

use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

use crate::config::GatewayConfig;
use crate::envelope::RequestEnvelope;
use crate::error::ApiError;
use crate::Result;

use super::http::HttpGateway;

/// Synchronous calling convention for code without an async runtime.
///
/// Owns a current-thread runtime and drives [`HttpGateway::call`] on it, so timeouts
/// and error mapping match the async path exactly. Do not create, call, or drop it
/// from inside an async context.
pub struct BlockingGateway {
    inner: Arc<HttpGateway>,
    runtime: Runtime,
}

impl BlockingGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            inner: Arc::new(HttpGateway::new(config)?),
            runtime,
        })
    }

    pub fn call(&self, envelope: &RequestEnvelope) -> std::result::Result<String, ApiError> {
        self.runtime.block_on(self.inner.call(envelope))
    }
}
