//! backend::traits
//!
//! The fire capability shared by every execution backend.
//!
//! # Design
//!
//! `FireBackend` is async because the remote backend performs network I/O.
//! The local backend is synchronous underneath and simply completes
//! immediately. Backends never touch canonical state: they take a net and
//! hand back the next one, and the caller decides what to do with it.
//!
//! Every returned net has already passed [`crate::core::verify::validate`];
//! a backend that receives an invalid net reports `ExecutionError::InvalidNet`.
//!
//! # Example
//!
//! ```ignore
//! use petriscope::backend::{FireBackend, ExecutionError};
//! use petriscope::core::Net;
//!
//! async fn step(backend: &dyn FireBackend, net: &Net) -> Result<Net, ExecutionError> {
//!     let next = backend.fire(net).await?;
//!     println!("{} fired, {} tokens now", backend.name(), next.token_count());
//!     Ok(next)
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::codec::{NetError, ParseError};
use crate::core::net::Net;
use crate::core::verify::{validate, SchemaError};

/// Errors from a fire call.
///
/// Any of these leaves canonical state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("fire request timed out after {0:?}")]
    Timeout(Duration),

    /// The fire service answered with a non-success status.
    #[error("fire service returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (the service reports failures as plain text)
        message: String,
    },

    /// The response body was not a net.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response was a net but broke referential invariants.
    #[error("backend returned an {0}")]
    InvalidNet(SchemaError),

    /// The local module failed or returned something unusable.
    #[error("local module error: {0}")]
    LocalModule(String),

    /// The local module could not be loaded.
    #[error("failed to load local module: {0}")]
    ModuleLoad(String),

    /// The task running the fire panicked or was cancelled.
    #[error("fire task failed: {0}")]
    TaskFailed(String),
}

impl From<NetError> for ExecutionError {
    fn from(err: NetError) -> Self {
        match err {
            NetError::Parse(e) => ExecutionError::MalformedResponse(e.to_string()),
            NetError::Schema(e) => ExecutionError::InvalidNet(e),
        }
    }
}

impl From<ParseError> for ExecutionError {
    fn from(err: ParseError) -> Self {
        ExecutionError::MalformedResponse(err.to_string())
    }
}

impl From<SchemaError> for ExecutionError {
    fn from(err: SchemaError) -> Self {
        ExecutionError::InvalidNet(err)
    }
}

/// A backend able to advance a net by one firing.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; fire calls run on spawned tasks.
///
/// # Errors
///
/// All failures (transport, status, malformed body, invalid net, module
/// failure) are reported as [`ExecutionError`]. A backend never returns a
/// partially updated net.
#[async_trait]
pub trait FireBackend: Send + Sync {
    /// Backend name for logs and the UI (e.g. "remote", "local").
    fn name(&self) -> &'static str;

    /// Fire once and return the next net.
    async fn fire(&self, net: &Net) -> Result<Net, ExecutionError>;
}

/// Validate a net produced by a backend.
pub(crate) fn accept_response_net(net: Net) -> Result<Net, ExecutionError> {
    validate(&net)?;
    Ok(net)
}
