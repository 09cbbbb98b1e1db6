//! HTTP methods the API client issues.

use std::str::FromStr;

use reaper_core::{Error, Result};
use strum::{AsRefStr, Display, EnumString};

/// Methods supported by [`GitLabClient::call`](crate::GitLabClient::call).
///
/// Reads follow pagination; deletes always issue exactly one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ApiMethod {
    /// Read a collection or resource.
    Get,
    /// Delete a resource.
    Delete,
}

impl ApiMethod {
    /// Parses a method name, rejecting anything outside the supported set.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|e| {
            Error::unsupported()
                .with_message(format!("Unsupported method '{name}'"))
                .with_source(e)
        })
    }

    /// Returns `true` if responses may continue on further pages.
    #[must_use]
    pub const fn paginates(self) -> bool {
        match self {
            Self::Get => true,
            Self::Delete => false,
        }
    }
}

impl From<ApiMethod> for reqwest::Method {
    fn from(method: ApiMethod) -> Self {
        match method {
            ApiMethod::Get => reqwest::Method::GET,
            ApiMethod::Delete => reqwest::Method::DELETE,
        }
    }
}
