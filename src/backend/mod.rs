//! backend
//!
//! Execution backends for the fire operation.
//!
//! # Architecture
//!
//! The [`FireBackend`] trait is the one capability both backends share. The
//! [`ExecutionDispatcher`] owns the backend-selection state machine and
//! decides which backend a fire request goes to. Nothing in this module
//! computes firing semantics; that belongs to the fire service and the
//! compiled module.
//!
//! # Modules
//!
//! - `traits`: `FireBackend` trait and `ExecutionError`
//! - [`remote`]: HTTP fire service
//! - [`local`]: dynamically loaded fire module
//! - [`mock`]: scripted backend for deterministic testing
//! - [`dispatcher`]: `BackendState` and `ExecutionDispatcher`
//! - `factory`: construction from configuration
//!
//! # Example
//!
//! ```ignore
//! use petriscope::backend::{create_dispatcher, LocalLoadRequest};
//! use petriscope::core::config::Config;
//!
//! let config = Config::load()?.config;
//! let mut dispatcher = create_dispatcher(&config)?;
//! if let Some(request) = LocalLoadRequest::from_config(&config) {
//!     dispatcher.begin_local_load();
//!     dispatcher.complete_local_load(request.load_async().await);
//! }
//! let next = dispatcher.fire(&net).await?;
//! ```

pub mod dispatcher;
mod factory;
pub mod local;
pub mod mock;
pub mod remote;
mod traits;

pub use dispatcher::{BackendMode, BackendState, ExecutionDispatcher, LocalModuleStatus};
pub use factory::{create_dispatcher, create_remote, LocalLoadRequest};
pub use traits::*;
