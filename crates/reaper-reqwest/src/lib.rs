//! GitLab REST client for reaper.
//!
//! This crate provides the API client behind the `reaper` binary: it walks
//! paginated collections, lists projects and jobs, and deletes job artifacts.
//!
//! # Example
//!
//! ```rust,ignore
//! use reaper_core::{JobSource, ProjectQuery, ProjectSource};
//! use reaper_reqwest::{ApiEndpoint, GitLabClient, ReqwestConfig};
//!
//! let endpoint = ApiEndpoint::new("https://gitlab.example.com", token)?;
//! let client = GitLabClient::new(endpoint, ReqwestConfig::default())?;
//!
//! let projects = client.list_projects(&ProjectQuery::default()).await;
//! for project in &projects.items {
//!     let jobs = client.list_jobs(project).await;
//! }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
mod config;
mod connect;
mod error;
mod method;
mod service;

pub mod link;
pub mod paginate;

pub use crate::client::{API_PATH, ApiEndpoint, DEFAULT_PER_PAGE, GitLabClient, TRACING_TARGET};
pub use crate::config::{DEFAULT_TIMEOUT_SECS, ReqwestConfig};
pub use crate::connect::{RawResponse, ReqwestTransport, Transport};
pub use crate::error::{Error, Result};
pub use crate::method::ApiMethod;
pub use crate::paginate::{Page, Paginator};
