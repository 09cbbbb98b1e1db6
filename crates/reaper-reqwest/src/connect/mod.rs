//! Transport module.
//!
//! This module separates sending a single request from building and
//! paginating API calls. It wraps the `reqwest` crate for production use.

mod transport;

#[cfg(test)]
pub(crate) use transport::testing;
pub use transport::{RawResponse, ReqwestTransport, Transport};
