//! backend::remote
//!
//! Fire backend backed by an HTTP fire service.
//!
//! # Protocol
//!
//! `POST <endpoint>` with content type `application/json` and body
//! `{"net": <Net>}`. A successful response carries `{"net": <Net>}`. On
//! failure the service answers with a 4xx/5xx status and its error text as
//! the body, which is surfaced verbatim in [`ExecutionError::Status`].
//!
//! # Example
//!
//! ```ignore
//! use petriscope::backend::remote::RemoteBackend;
//! use petriscope::backend::FireBackend;
//! use std::time::Duration;
//!
//! let backend = RemoteBackend::new("http://localhost:8080/fire", Duration::from_secs(30))?;
//! let next = backend.fire(&net).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::traits::{accept_response_net, ExecutionError, FireBackend};
use crate::core::net::Net;

/// User-Agent header value for fire requests.
const USER_AGENT_VALUE: &str = "petriscope";

/// Request body for the fire endpoint.
#[derive(Debug, Serialize)]
pub struct FireRequest<'a> {
    pub net: &'a Net,
}

/// Response body of the fire endpoint.
#[derive(Debug, Deserialize)]
pub struct FireResponse {
    pub net: Net,
}

/// Remote fire backend.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    /// HTTP client for making requests
    client: Client,
    /// Full URL of the fire endpoint
    endpoint: String,
    /// Request timeout
    timeout: Duration,
}

impl RemoteBackend {
    /// Create a backend posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Network` if the HTTP client cannot be built
    /// (for instance when the TLS backend fails to initialise).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ExecutionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExecutionError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// The endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ExecutionError {
        if err.is_timeout() {
            ExecutionError::Timeout(self.timeout)
        } else {
            ExecutionError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl FireBackend for RemoteBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn fire(&self, net: &Net) -> Result<Net, ExecutionError> {
        debug!(tokens = net.token_count(), "posting net to fire service");

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))
            .json(&FireRequest { net })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "fire service rejected request");
            return Err(ExecutionError::Status {
                status: status.as_u16(),
                message: body.trim().to_string(),
            });
        }

        let parsed: FireResponse = serde_json::from_str(&body)
            .map_err(|e| ExecutionError::MalformedResponse(e.to_string()))?;
        accept_response_net(parsed.net)
    }
}
