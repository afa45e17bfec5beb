use crate::config::GatewayConfig;
use crate::envelope::RequestEnvelope;
use crate::error::ApiError;
use crate::{Error, ErrorContext, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use super::Gateway;

/// Longest slice of an error body echoed into debug logs.
const BODY_SNIPPET_CHARS: usize = 256;

/// Gemini `generateContent` client over a shared reqwest connection pool.
///
/// Build one per process and share it through `Arc`; every clone of the inner
/// `reqwest::Client` reuses the same pool.
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(config.pool_idle_timeout))
            .build()
            .map_err(|e| {
                Error::configuration_with_context(
                    "failed to build HTTP client",
                    ErrorContext::new()
                        .with_details(e.to_string())
                        .with_source("http_gateway"),
                )
            })?;
        Ok(Self::with_client(client, config))
    }

    /// Use an existing client (and its pool) instead of building one.
    ///
    /// The client should not follow redirects, or a 3xx can come back as a success body.
    pub fn with_client(client: reqwest::Client, config: &GatewayConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            connect_timeout: config.connect_timeout,
            request_timeout: config.request_timeout,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Issue exactly one POST and return the raw body of a 2xx response.
    ///
    /// The timeout covers sending the request and reading the whole body.
    pub async fn call(&self, envelope: &RequestEnvelope) -> std::result::Result<String, ApiError> {
        let request_id = Uuid::new_v4();
        let timeout_ms = millis(self.request_timeout);
        let start = Instant::now();

        let attempt = async {
            let resp = self
                .client
                .post(self.endpoint.clone())
                .query(&[("key", self.api_key.as_str())])
                .json(envelope)
                .send()
                .await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = match tokio::time::timeout(self.request_timeout, attempt).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => {
                let err = map_reqwest_error(e, millis(self.connect_timeout), timeout_ms);
                warn!(
                    %request_id,
                    error_kind = err.kind().name(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "upstream call failed: {}",
                    err
                );
                return Err(err);
            }
            Err(_) => {
                warn!(%request_id, timeout_ms, "upstream call timed out");
                return Err(ApiError::Timeout { timeout_ms });
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        if let Some(err) = ApiError::from_status(status) {
            warn!(
                %request_id,
                http_status = status,
                error_kind = err.kind().name(),
                error_code = err.kind().code(),
                elapsed_ms,
                "upstream returned an error status"
            );
            debug!(%request_id, body = %snippet(&body), "upstream error body");
            return Err(err);
        }

        info!(%request_id, http_status = status, elapsed_ms, "upstream call completed");
        Ok(body)
    }

    /// Start a call on the tokio runtime without waiting for it.
    ///
    /// Runs the same path as [`HttpGateway::call`]. Must be called from within a runtime.
    pub fn spawn_call(self: &Arc<Self>, envelope: RequestEnvelope) -> PendingCall {
        let gateway = Arc::clone(self);
        PendingCall {
            handle: tokio::spawn(async move { gateway.call(&envelope).await }),
        }
    }
}

#[async_trait::async_trait]
impl Gateway for HttpGateway {
    async fn call(&self, envelope: &RequestEnvelope) -> std::result::Result<String, ApiError> {
        HttpGateway::call(self, envelope).await
    }
}

/// In-flight call started by [`HttpGateway::spawn_call`].
///
/// Await it directly or chain it with `futures::FutureExt`. Aborting resolves the
/// call to a transport error; the request already on the wire is dropped.
pub struct PendingCall {
    handle: JoinHandle<std::result::Result<String, ApiError>>,
}

impl PendingCall {
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for PendingCall {
    type Output = std::result::Result<String, ApiError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) if e.is_cancelled() => {
                Poll::Ready(Err(ApiError::Transport("call aborted".to_string())))
            }
            Poll::Ready(Err(e)) => Poll::Ready(Err(ApiError::Transport(format!(
                "call task failed: {}",
                e
            )))),
        }
    }
}

// The request URL carries the credential, so it is stripped before formatting.
fn map_reqwest_error(e: reqwest::Error, connect_ms: u64, request_ms: u64) -> ApiError {
    if e.is_timeout() {
        return timeout_error(e.is_connect(), connect_ms, request_ms);
    }
    let e = e.without_url();
    let mut message = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    ApiError::Transport(message)
}

/// Reports the limit of the phase that actually expired.
fn timeout_error(during_connect: bool, connect_ms: u64, request_ms: u64) -> ApiError {
    ApiError::Timeout {
        timeout_ms: if during_connect { connect_ms } else { request_ms },
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn snippet(body: &str) -> String {
    let mut s: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
    if body.chars().count() > BODY_SNIPPET_CHARS {
        s.push('…');
    }
    s
}
