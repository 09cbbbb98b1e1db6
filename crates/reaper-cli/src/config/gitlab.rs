//! GitLab connection configuration.

use clap::Args;
use reaper_core::{Error, Result};
use reaper_reqwest::{ApiEndpoint, DEFAULT_PER_PAGE};

/// Largest page size accepted by the API.
pub const MAX_PER_PAGE: u32 = 100;

/// Where the GitLab instance lives and how to authenticate against it.
#[derive(Clone, Args)]
pub struct GitLabConfig {
    /// GitLab instance root, e.g. https://gitlab.example.com
    #[arg(long = "base-url", env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Personal or project access token
    #[arg(long = "access-token", env = "ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Page size for collection requests (1-100)
    #[arg(long = "per-page", env = "PER_PAGE", default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,
}

impl std::fmt::Debug for GitLabConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl GitLabConfig {
    /// Validates the settings and builds the API endpoint.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL or token is missing or
    /// invalid, or the page size is out of range.
    pub fn endpoint(&self) -> Result<ApiEndpoint> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| Error::configuration().with_message("BASE_URL is not set"))?;
        let access_token = self
            .access_token
            .clone()
            .ok_or_else(|| Error::configuration().with_message("ACCESS_TOKEN is not set"))?;

        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            return Err(Error::configuration().with_message(format!(
                "PER_PAGE {} is out of range, must be between 1 and {MAX_PER_PAGE}",
                self.per_page
            )));
        }

        Ok(ApiEndpoint::new(base_url, access_token)?.with_per_page(self.per_page))
    }
}
