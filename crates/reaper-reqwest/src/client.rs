//! GitLab API client.

use std::sync::Arc;

use reaper_core::types::Listing;
use reaper_core::{Error, Result};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ReqwestConfig;
use crate::connect::{ReqwestTransport, Transport};
use crate::error::Error as ReqwestError;
use crate::method::ApiMethod;
use crate::paginate::{ACCESS_TOKEN_PARAM, Page, Paginator};

/// Tracing target for API client operations.
pub const TRACING_TARGET: &str = "reaper_reqwest::client";

/// Path of the REST API below the instance root.
pub const API_PATH: &str = "/api/v4";

/// Default page-size hint for collection requests.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Where and how to reach the API.
#[derive(Clone)]
pub struct ApiEndpoint {
    api_root: Url,
    access_token: String,
    per_page: u32,
}

impl std::fmt::Debug for ApiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiEndpoint")
            .field("api_root", &self.api_root.as_str())
            .field("access_token", &"<redacted>")
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl ApiEndpoint {
    /// Creates an endpoint below `base_url` authenticated by `access_token`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either value is empty or the base
    /// URL is not an absolute `http(s)` URL.
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(Error::configuration().with_message("base URL must be set"));
        }

        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(Error::configuration().with_message("access token must be set"));
        }

        let root = format!("{}{API_PATH}", base_url.trim_end_matches('/'));
        let api_root = Url::parse(&root).map_err(|e| {
            Error::configuration()
                .with_message(format!("base URL '{base_url}' is not a valid URL"))
                .with_source(e)
        })?;

        if !matches!(api_root.scheme(), "http" | "https") {
            return Err(Error::configuration()
                .with_message(format!("base URL '{base_url}' must use http or https")));
        }

        Ok(Self {
            api_root,
            access_token,
            per_page: DEFAULT_PER_PAGE,
        })
    }

    /// Sets the page-size hint.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Returns the API root (`<base>/api/v4`).
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Returns the page-size hint.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Builds the URL for `path` with the credential and `query` attached.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let raw = format!(
            "{}/{}",
            self.api_root.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(ReqwestError::from)?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(ACCESS_TOKEN_PARAM, &self.access_token);
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }
}

/// Inner client that holds the endpoint and the transport.
struct GitLabClientInner {
    endpoint: ApiEndpoint,
    transport: Arc<dyn Transport>,
}

/// GitLab REST client.
///
/// Reads follow pagination to the end; deletes issue exactly one request.
/// A failing call never panics or aborts the run: the caller receives a
/// [`Listing`] that records where it stopped.
///
/// # Examples
///
/// ```rust,ignore
/// use reaper_reqwest::{ApiEndpoint, GitLabClient, ReqwestConfig};
///
/// let endpoint = ApiEndpoint::new("https://gitlab.example.com", token)?;
/// let client = GitLabClient::new(endpoint, ReqwestConfig::default())?;
/// let projects = client.list_projects(&ProjectQuery::default()).await;
/// ```
#[derive(Clone)]
pub struct GitLabClient {
    inner: Arc<GitLabClientInner>,
}

impl std::fmt::Debug for GitLabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabClient")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}

impl GitLabClient {
    /// Creates a client backed by a reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(endpoint: ApiEndpoint, config: ReqwestConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        let client = Self::with_transport(endpoint, transport);

        tracing::info!(
            target: TRACING_TARGET,
            api_root = %client.endpoint().api_root(),
            "GitLab client created"
        );

        Ok(client)
    }

    /// Creates a client on top of an arbitrary transport.
    pub fn with_transport(endpoint: ApiEndpoint, transport: impl Transport + 'static) -> Self {
        let inner = GitLabClientInner {
            endpoint,
            transport: Arc::new(transport),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Gets the endpoint configuration.
    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.inner.endpoint
    }

    /// Creates a paginator for `path`.
    pub fn paginator(
        &self,
        path: &str,
        query: &[(&str, String)],
        method: ApiMethod,
    ) -> Result<Paginator> {
        let url = self.endpoint().url(path, query)?;
        Ok(
            Paginator::new(Arc::clone(&self.inner.transport), method, url)
                .with_access_token(self.inner.endpoint.access_token.clone()),
        )
    }

    /// Issues `method` against `path` and returns every response body.
    ///
    /// `Get` walks all pages; `Delete` sends a single request. A failing
    /// status or transport error ends the call early and is recorded in
    /// the returned listing.
    pub async fn call(
        &self,
        path: &str,
        query: &[(&str, String)],
        method: ApiMethod,
    ) -> Listing<Page> {
        let paginator = match self.paginator(path, query, method) {
            Ok(paginator) => paginator,
            Err(error) => return Listing::truncated(Vec::new(), error),
        };

        match method {
            ApiMethod::Get => paginator.drain().await,
            ApiMethod::Delete => paginator.single_page().drain().await,
        }
    }

    /// Reads every record of a collection, decoding each page as `T`.
    ///
    /// A page that fails to decode ends the listing at that page.
    pub async fn read<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Listing<T> {
        let (pages, completion) = self.call(path, query, ApiMethod::Get).await.into_parts();

        let mut items = Vec::new();
        for page in pages {
            match page.decode::<T>() {
                Ok(mut records) => items.append(&mut records),
                Err(error) => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        path,
                        error = %error,
                        "undecodable page, stopping"
                    );
                    return Listing::truncated(items, error.with_context(path.to_owned()));
                }
            }
        }

        Listing { items, completion }
    }

    /// Issues a single delete against `path`.
    pub async fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!(target: TRACING_TARGET, path, "DELETE");

        self.call(path, &[], ApiMethod::Delete)
            .await
            .into_result()
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use reaper_core::ErrorKind;
    use serde_json::Value;

    use super::*;
    use crate::connect::RawResponse;
    use crate::connect::testing::ScriptedTransport;

    fn endpoint() -> ApiEndpoint {
        ApiEndpoint::new("https://gitlab.test/", "secret").unwrap()
    }

    #[test]
    fn endpoint_requires_base_url_and_token() {
        let missing_url = ApiEndpoint::new("  ", "secret").unwrap_err();
        assert_eq!(missing_url.kind(), ErrorKind::Configuration);

        let missing_token = ApiEndpoint::new("https://gitlab.test", "").unwrap_err();
        assert_eq!(missing_token.kind(), ErrorKind::Configuration);

        let bad_url = ApiEndpoint::new("gitlab.test", "secret").unwrap_err();
        assert_eq!(bad_url.kind(), ErrorKind::Configuration);

        let bad_scheme = ApiEndpoint::new("ftp://gitlab.test", "secret").unwrap_err();
        assert_eq!(bad_scheme.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn endpoint_debug_hides_token() {
        let rendered = format!("{:?}", endpoint());
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn url_joins_root_path_and_query() {
        let url = endpoint()
            .url("/projects/12/jobs", &[("per_page", "100".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://gitlab.test/api/v4/projects/12/jobs?access_token=secret&per_page=100"
        );

        let nested = ApiEndpoint::new("https://example.com/gitlab", "t")
            .unwrap()
            .url("projects", &[])
            .unwrap();
        assert_eq!(
            nested.as_str(),
            "https://example.com/gitlab/api/v4/projects?access_token=t"
        );
    }

    #[tokio::test]
    async fn get_walks_all_pages() {
        let transport = ScriptedTransport::default()
            .json(200, "[{}]", Some("https://gitlab.test/api/v4/projects?page=2"))
            .json(200, "[{}, {}]", None);
        let client = GitLabClient::with_transport(endpoint(), transport);

        let listing = client.read::<Value>("/projects", &[]).await;
        assert!(listing.is_complete());
        assert_eq!(listing.items.len(), 3);
    }

    #[tokio::test]
    async fn delete_sends_exactly_one_request() {
        let transport = ScriptedTransport::default()
            .respond(
                RawResponse::new(204, "")
                    .with_link(r#"<https://gitlab.test/api/v4/next>; rel="next""#),
            )
            .json(200, "[]", None);
        let requests = transport.requests();
        let client = GitLabClient::with_transport(endpoint(), transport);

        client.delete("/projects/1/jobs/2/artifacts").await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, ApiMethod::Delete);
        assert_eq!(requests[0].1.path(), "/api/v4/projects/1/jobs/2/artifacts");
    }

    #[tokio::test]
    async fn delete_failure_is_reported() {
        let transport = ScriptedTransport::default().respond(RawResponse::new(403, "forbidden"));
        let client = GitLabClient::with_transport(endpoint(), transport);

        let error = client.delete("/projects/1/jobs/2/artifacts").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn undecodable_page_truncates_read() {
        let transport = ScriptedTransport::default()
            .json(200, "[1]", Some("https://gitlab.test/api/v4/projects?page=2"))
            .json(200, "not json", Some("https://gitlab.test/api/v4/projects?page=3"))
            .json(200, "[3]", None);
        let client = GitLabClient::with_transport(endpoint(), transport);

        let listing = client.read::<u64>("/projects", &[]).await;
        assert_eq!(listing.items, vec![1]);
        let error = listing.error().unwrap();
        assert_eq!(error.kind(), ErrorKind::Serialization);
        assert_eq!(error.context.as_deref(), Some("/projects"));
    }
}
