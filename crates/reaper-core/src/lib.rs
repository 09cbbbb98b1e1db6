#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod aggregate;
pub mod executor;
pub mod provider;
pub mod retention;
pub mod types;

pub use aggregate::{aggregate, grand_total};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use executor::{DeletionReport, RunTotals, execute};
pub use provider::{ArtifactRemover, JobSource, ProjectQuery, ProjectSource};
pub use retention::{Decision, Evaluation, RetentionWindow, SkipReason, evaluate};
