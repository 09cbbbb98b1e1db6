//! Walking paginated collections.
//!
//! A [`Paginator`] is consumed into a stream of pages. The stream follows
//! the `rel="next"` link of each response and ends when no such link is
//! present. A failing status or transport error is yielded as the final
//! item, so a consumer always learns whether the collection was exhausted.

use std::pin::pin;
use std::sync::Arc;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reaper_core::types::Listing;
use reaper_core::{Error, Result};
use serde::de::DeserializeOwned;
use url::Url;

use crate::connect::{RawResponse, Transport};
use crate::error::Error as ReqwestError;
use crate::link;
use crate::method::ApiMethod;

/// Tracing target for pagination.
pub const TRACING_TARGET: &str = "reaper_reqwest::paginate";

/// Name of the query parameter carrying the access token.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// One successful response of a collection walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl Page {
    /// Decodes the page as a JSON array of records.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        serde_json::from_slice(&self.body).map_err(|e| ReqwestError::from(e).into())
    }
}

/// Walks a collection endpoint page by page.
pub struct Paginator {
    transport: Arc<dyn Transport>,
    method: ApiMethod,
    url: Url,
    follow_links: bool,
    access_token: Option<String>,
}

impl std::fmt::Debug for Paginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("method", &self.method)
            .field("url", &redact(&self.url))
            .field("follow_links", &self.follow_links)
            .finish_non_exhaustive()
    }
}

impl Paginator {
    /// Creates a paginator that follows `next` links until exhausted.
    pub fn new(transport: Arc<dyn Transport>, method: ApiMethod, url: Url) -> Self {
        Self {
            transport,
            method,
            url,
            follow_links: method.paginates(),
            access_token: None,
        }
    }

    /// Fetches only the first page, ignoring any continuation link.
    #[must_use]
    pub fn single_page(mut self) -> Self {
        self.follow_links = false;
        self
    }

    /// Re-attaches `token` to continuation links that do not carry it.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Consumes the paginator into a stream of pages.
    ///
    /// The stream yields `Ok` for each page and stops after the first `Err`.
    pub fn into_stream(self) -> impl Stream<Item = Result<Page>> + Send {
        let Self {
            transport,
            method,
            url,
            follow_links,
            access_token,
        } = self;

        async_stream::try_stream! {
            let mut next = Some(url);
            while let Some(url) = next.take() {
                tracing::debug!(
                    target: TRACING_TARGET,
                    method = %method,
                    url = %redact(&url),
                    "requesting page"
                );

                let response = check_status(transport.send(method, &url).await?, &url)?;
                let link = if follow_links {
                    next_url(&url, &response, access_token.as_deref())
                } else {
                    Ok(None)
                };

                yield Page {
                    status: response.status,
                    body: response.body,
                };
                next = link?;
            }
        }
    }

    /// Drains the stream, keeping every page fetched before a failure.
    pub async fn drain(self) -> Listing<Page> {
        let mut stream = pin!(self.into_stream());
        let mut pages = Vec::new();

        while let Some(page) = stream.next().await {
            match page {
                Ok(page) => pages.push(page),
                Err(error) => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        error = %error,
                        pages = pages.len(),
                        "API call failed, stopping pagination"
                    );
                    return Listing::truncated(pages, error);
                }
            }
        }

        Listing::exhausted(pages)
    }
}

fn check_status(response: RawResponse, url: &Url) -> Result<RawResponse> {
    if response.is_failure() {
        return Err(Error::from_status(response.status).with_context(redact(url)));
    }
    Ok(response)
}

/// Resolves the `next` link of `response` against the URL it was fetched from.
fn next_url(
    current: &Url,
    response: &RawResponse,
    access_token: Option<&str>,
) -> Result<Option<Url>> {
    let Some(next) = response.link.as_deref().and_then(link::next_link) else {
        return Ok(None);
    };

    let mut url = current.join(next).map_err(ReqwestError::from)?;
    if let Some(token) = access_token
        && !url.query_pairs().any(|(name, _)| name == ACCESS_TOKEN_PARAM)
    {
        url.query_pairs_mut().append_pair(ACCESS_TOKEN_PARAM, token);
    }

    Ok(Some(url))
}

/// Renders `url` without the access token, for logs and error context.
pub(crate) fn redact(url: &Url) -> String {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != ACCESS_TOKEN_PARAM)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut redacted = url.clone();
    if kept.is_empty() {
        redacted.set_query(None);
    } else {
        redacted.query_pairs_mut().clear().extend_pairs(kept);
    }
    redacted.to_string()
}
