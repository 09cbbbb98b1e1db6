//! Single-request transport and its reqwest implementation.

use std::sync::Arc;

use bytes::Bytes;
use reaper_core::Result;
use reqwest::Client;
use reqwest::header::LINK;
use url::Url;

use crate::config::ReqwestConfig;
use crate::error::Error;
use crate::method::ApiMethod;

/// Tracing target for transport operations.
pub const TRACING_TARGET: &str = "reaper_reqwest::transport";

/// A response reduced to what pagination and decoding need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw `Link` header value, if present.
    pub link: Option<String>,
    /// Response body.
    pub body: Bytes,
}

impl RawResponse {
    /// Creates a response without a `Link` header.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            link: None,
            body: body.into(),
        }
    }

    /// Attaches a `Link` header value.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Returns `true` if the status signals failure (400 and above).
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status >= 400
    }
}

/// Issues one HTTP request.
///
/// Implementations report transport failures (connection, timeout, body
/// read) as errors and return every received response, whatever its status.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends a single request and reads the whole response.
    async fn send(&self, method: ApiMethod, url: &Url) -> Result<RawResponse>;
}

/// Inner transport state.
struct ReqwestTransportInner {
    http: Client,
    config: ReqwestConfig,
}

/// Reqwest-backed [`Transport`].
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: Arc<ReqwestTransportInner>,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Creates a new transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis(),
            user_agent = %user_agent,
            "Creating reqwest transport"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(Error::from)?;

        let inner = ReqwestTransportInner { http, config };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the transport configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, method: ApiMethod, url: &Url) -> Result<RawResponse> {
        let response = self
            .inner
            .http
            .request(method.into(), url.clone())
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status().as_u16();
        let link = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(Error::from)?;

        Ok(RawResponse { status, link, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport for unit tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use reaper_core::Error;

    use super::*;

    /// Requests observed by a [`ScriptedTransport`].
    pub(crate) type RequestLog = Arc<Mutex<Vec<(ApiMethod, Url)>>>;

    /// Replays queued responses in order and records every request.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<RawResponse>>>,
        requests: RequestLog,
    }

    impl ScriptedTransport {
        pub(crate) fn respond(self, response: RawResponse) -> Self {
            self.responses.lock().unwrap().push_back(Ok(response));
            self
        }

        pub(crate) fn json(self, status: u16, body: &'static str, next: Option<&str>) -> Self {
            let mut response = RawResponse::new(status, body);
            if let Some(next) = next {
                response = response.with_link(format!(r#"<{next}>; rel="next""#));
            }
            self.respond(response)
        }

        pub(crate) fn fail(self, error: Error) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        pub(crate) fn requests(&self) -> RequestLog {
            Arc::clone(&self.requests)
        }
    }

    #[async_trait::async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, method: ApiMethod, url: &Url) -> Result<RawResponse> {
            self.requests.lock().unwrap().push((method, url.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::internal_error().with_message("no scripted response")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_threshold_is_400() {
        assert!(!RawResponse::new(204, "").is_failure());
        assert!(!RawResponse::new(399, "").is_failure());
        assert!(RawResponse::new(400, "").is_failure());
        assert!(RawResponse::new(503, "").is_failure());
    }

    #[test]
    fn transport_creation() {
        let transport = ReqwestTransport::new(ReqwestConfig::default()).unwrap();
        assert_eq!(transport.config().http_timeout, 30);
    }
}
