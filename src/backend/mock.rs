//! backend::mock
//!
//! Mock fire backend for deterministic testing.
//!
//! # Design
//!
//! The mock plays back scripted responses in order. With no script left it
//! echoes the input net unchanged. A configured failure overrides both. Every
//! call is recorded so tests can check what was sent.
//!
//! # Example
//!
//! ```
//! use petriscope::backend::mock::MockBackend;
//! use petriscope::backend::FireBackend;
//! use petriscope::core::Net;
//!
//! # tokio_test::block_on(async {
//! let mut next = Net::default_net();
//! next.tokens[0].place_id = "p2".to_string();
//!
//! let backend = MockBackend::new().respond_with(next.clone());
//! let result = backend.fire(&Net::default_net()).await.unwrap();
//!
//! assert_eq!(result, next);
//! assert_eq!(backend.call_count(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::traits::{accept_response_net, ExecutionError, FireBackend};
use crate::core::net::Net;

/// Mock backend for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockBackend {
    name: &'static str,
    inner: Arc<Mutex<MockBackendInner>>,
}

#[derive(Debug, Default)]
struct MockBackendInner {
    /// Responses handed out in order.
    script: VecDeque<Result<Net, ExecutionError>>,
    /// Error returned by every call while set.
    fail_with: Option<ExecutionError>,
    /// Nets received, in call order.
    calls: Vec<Net>,
}

impl MockBackend {
    /// Create a mock named "mock" that echoes its input.
    pub fn new() -> Self {
        Self::named("mock")
    }

    /// Create a mock reporting `name` (e.g. to stand in for "remote").
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(MockBackendInner::default())),
        }
    }

    /// Queue a successful response.
    pub fn respond_with(self, net: Net) -> Self {
        self.push_response(Ok(net));
        self
    }

    /// Queue a failing response.
    pub fn fail_next(self, err: ExecutionError) -> Self {
        self.push_response(Err(err));
        self
    }

    /// Fail every call until [`clear_failure`](Self::clear_failure).
    pub fn fail_with(self, err: ExecutionError) -> Self {
        self.inner.lock().unwrap().fail_with = Some(err);
        self
    }

    /// Queue a response on a shared handle.
    pub fn push_response(&self, response: Result<Net, ExecutionError>) {
        self.inner.lock().unwrap().script.push_back(response);
    }

    /// Clear the persistent failure.
    pub fn clear_failure(&self) {
        self.inner.lock().unwrap().fail_with = None;
    }

    /// Nets received so far.
    pub fn calls(&self) -> Vec<Net> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Number of fire calls so far.
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FireBackend for MockBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fire(&self, net: &Net) -> Result<Net, ExecutionError> {
        let outcome = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(net.clone());
            match &inner.fail_with {
                Some(err) => Err(err.clone()),
                None => inner
                    .script
                    .pop_front()
                    .unwrap_or_else(|| Ok(net.clone())),
            }
        };

        // Scripted nets go through the same gate as real responses.
        outcome.and_then(accept_response_net)
    }
}
