//! backend::factory
//!
//! Backend construction from configuration.
//!
//! Callers use these functions instead of instantiating backends directly, so
//! the selection rules (remote always available, local only when configured)
//! live in one place.

use std::path::PathBuf;
use std::sync::Arc;

use super::dispatcher::ExecutionDispatcher;
use super::local;
use super::remote::RemoteBackend;
use super::traits::{ExecutionError, FireBackend};
use crate::core::config::Config;

/// Everything needed to load the local module off the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLoadRequest {
    pub module: PathBuf,
    pub fire_symbol: String,
    pub free_symbol: String,
}

impl LocalLoadRequest {
    /// Load request for the configured module, if any.
    pub fn from_config(config: &Config) -> Option<Self> {
        config.local_module().map(|module| Self {
            module: module.to_path_buf(),
            fire_symbol: config.fire_symbol().to_string(),
            free_symbol: config.free_symbol().to_string(),
        })
    }

    /// Load on the blocking pool, type-erased for the dispatcher.
    pub async fn load_async(self) -> Result<Arc<dyn FireBackend>, ExecutionError> {
        let backend = local::load_async(self.module, self.fire_symbol, self.free_symbol).await?;
        Ok(Arc::new(backend))
    }
}

/// Build the remote backend from configuration.
pub fn create_remote(config: &Config) -> Result<RemoteBackend, ExecutionError> {
    RemoteBackend::new(config.remote_endpoint(), config.remote_timeout())
}

/// Build a dispatcher in its initial remote-only state.
pub fn create_dispatcher(config: &Config) -> Result<ExecutionDispatcher, ExecutionError> {
    Ok(ExecutionDispatcher::new(Arc::new(create_remote(config)?)))
}
