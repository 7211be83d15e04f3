//! backend::dispatcher
//!
//! Backend selection for fire requests.
//!
//! # State machine
//!
//! ```text
//!                 load ok
//!   RemoteOnly ───────────────▶ LocalOnly   (terminal)
//!     │  ▲
//!     │  └── load failed: RemoteOnly { local: Failed(..) }
//!     └───── load started: RemoteOnly { local: Loading }
//! ```
//!
//! The session starts in `RemoteOnly`. The only way out is a successful load
//! of the local module, after which every fire goes to the local backend for
//! the rest of the session. There is no fallback: a failing local backend
//! produces an `ExecutionError`, never a remote call. A failed load is an
//! explicit state rather than an absence of transition.

use std::sync::Arc;

use tracing::{info, warn};

use super::traits::{ExecutionError, FireBackend};
use crate::core::net::Net;

/// Progress of the local module while the session is still remote-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalModuleStatus {
    /// No module configured; the session stays remote-only.
    NotConfigured,
    /// Load in flight.
    Loading,
    /// Load failed; the session stays remote-only.
    Failed(String),
}

/// Which backend serves fire requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendState {
    /// Fires go to the remote service.
    RemoteOnly { local: LocalModuleStatus },
    /// Fires go to the local module. Terminal.
    LocalOnly,
}

/// Coarse view of [`BackendState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Remote,
    Local,
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendMode::Remote => write!(f, "remote"),
            BackendMode::Local => write!(f, "local"),
        }
    }
}

impl BackendState {
    /// Initial state of every session.
    pub fn initial() -> Self {
        BackendState::RemoteOnly {
            local: LocalModuleStatus::NotConfigured,
        }
    }

    /// A local load has been kicked off.
    pub fn on_load_started(self) -> Self {
        match self {
            BackendState::RemoteOnly { .. } => BackendState::RemoteOnly {
                local: LocalModuleStatus::Loading,
            },
            BackendState::LocalOnly => BackendState::LocalOnly,
        }
    }

    /// A local load finished.
    ///
    /// Success moves to `LocalOnly`; failure records the reason and stays
    /// remote. `LocalOnly` absorbs everything.
    pub fn on_local_load(self, outcome: Result<(), String>) -> Self {
        match (self, outcome) {
            (BackendState::LocalOnly, _) => BackendState::LocalOnly,
            (BackendState::RemoteOnly { .. }, Ok(())) => BackendState::LocalOnly,
            (BackendState::RemoteOnly { .. }, Err(reason)) => BackendState::RemoteOnly {
                local: LocalModuleStatus::Failed(reason),
            },
        }
    }

    /// Coarse mode.
    pub fn mode(&self) -> BackendMode {
        match self {
            BackendState::RemoteOnly { .. } => BackendMode::Remote,
            BackendState::LocalOnly => BackendMode::Local,
        }
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Selects and invokes the fire backend for the current [`BackendState`].
pub struct ExecutionDispatcher {
    state: BackendState,
    remote: Arc<dyn FireBackend>,
    /// Present iff `state` is `LocalOnly`.
    local: Option<Arc<dyn FireBackend>>,
}

impl std::fmt::Debug for ExecutionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionDispatcher")
            .field("state", &self.state)
            .field("remote", &self.remote.name())
            .field("local", &self.local.as_ref().map(|l| l.name()))
            .finish()
    }
}

impl ExecutionDispatcher {
    /// Start remote-only with `remote` as the fire backend.
    pub fn new(remote: Arc<dyn FireBackend>) -> Self {
        Self {
            state: BackendState::initial(),
            remote,
            local: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> &BackendState {
        &self.state
    }

    /// Current mode.
    pub fn mode(&self) -> BackendMode {
        self.state.mode()
    }

    /// Record that a local load was started.
    pub fn begin_local_load(&mut self) {
        self.state = std::mem::take(&mut self.state).on_load_started();
    }

    /// Apply the outcome of a local load.
    ///
    /// The first successful load wins; later outcomes are ignored once the
    /// dispatcher is `LocalOnly`.
    pub fn complete_local_load(&mut self, outcome: Result<Arc<dyn FireBackend>, ExecutionError>) {
        if self.state == BackendState::LocalOnly {
            warn!("local module already active, ignoring additional load result");
            return;
        }

        match outcome {
            Ok(backend) => {
                info!(backend = backend.name(), "switching fire backend to local module");
                self.local = Some(backend);
                self.state = std::mem::take(&mut self.state).on_local_load(Ok(()));
            }
            Err(err) => {
                warn!(error = %err, "local module unavailable, staying on remote backend");
                self.state = std::mem::take(&mut self.state).on_local_load(Err(err.to_string()));
            }
        }
    }

    /// The backend the next fire goes to.
    pub fn active_backend(&self) -> Arc<dyn FireBackend> {
        match (&self.state, &self.local) {
            (BackendState::LocalOnly, Some(local)) => Arc::clone(local),
            _ => Arc::clone(&self.remote),
        }
    }

    /// Fire through the active backend.
    pub async fn fire(&self, net: &Net) -> Result<Net, ExecutionError> {
        self.active_backend().fire(net).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;

    mod state_machine {
        use super::*;

        #[test]
        fn starts_remote_only() {
            assert_eq!(
                BackendState::initial(),
                BackendState::RemoteOnly {
                    local: LocalModuleStatus::NotConfigured
                }
            );
            assert_eq!(BackendState::initial().mode(), BackendMode::Remote);
        }

        #[test]
        fn load_success_goes_local() {
            let state = BackendState::initial()
                .on_load_started()
                .on_local_load(Ok(()));
            assert_eq!(state, BackendState::LocalOnly);
        }

        #[test]
        fn load_failure_is_explicit() {
            let state = BackendState::initial()
                .on_load_started()
                .on_local_load(Err("no such file".into()));
            assert_eq!(
                state,
                BackendState::RemoteOnly {
                    local: LocalModuleStatus::Failed("no such file".into())
                }
            );
            assert_eq!(state.mode(), BackendMode::Remote);
        }

        #[test]
        fn local_only_is_absorbing() {
            let state = BackendState::LocalOnly
                .on_load_started()
                .on_local_load(Err("late failure".into()));
            assert_eq!(state, BackendState::LocalOnly);
        }
    }

    #[tokio::test]
    async fn fires_remote_until_local_loaded() {
        let remote = MockBackend::named("remote");
        let local = MockBackend::named("local");
        let mut dispatcher = ExecutionDispatcher::new(Arc::new(remote.clone()));

        dispatcher.fire(&Net::default_net()).await.unwrap();
        assert_eq!(remote.call_count(), 1);

        dispatcher.begin_local_load();
        assert_eq!(
            dispatcher.state(),
            &BackendState::RemoteOnly {
                local: LocalModuleStatus::Loading
            }
        );
        dispatcher.fire(&Net::default_net()).await.unwrap();
        assert_eq!(remote.call_count(), 2);

        dispatcher.complete_local_load(Ok(Arc::new(local.clone())));
        assert_eq!(dispatcher.mode(), BackendMode::Local);
        dispatcher.fire(&Net::default_net()).await.unwrap();
        assert_eq!(local.call_count(), 1);
        assert_eq!(remote.call_count(), 2);
    }

    #[tokio::test]
    async fn no_fallback_after_local_failure() {
        let remote = MockBackend::named("remote");
        let local =
            MockBackend::named("local").fail_with(ExecutionError::LocalModule("crashed".into()));
        let mut dispatcher = ExecutionDispatcher::new(Arc::new(remote.clone()));
        dispatcher.complete_local_load(Ok(Arc::new(local.clone())));

        for _ in 0..3 {
            assert!(dispatcher.fire(&Net::default_net()).await.is_err());
        }
        assert_eq!(dispatcher.state(), &BackendState::LocalOnly);
        assert_eq!(remote.call_count(), 0);
        assert_eq!(local.call_count(), 3);
    }

    #[tokio::test]
    async fn failed_load_keeps_remote() {
        let remote = MockBackend::named("remote");
        let mut dispatcher = ExecutionDispatcher::new(Arc::new(remote.clone()));
        dispatcher.begin_local_load();
        dispatcher.complete_local_load(Err(ExecutionError::ModuleLoad("missing".into())));

        assert!(matches!(
            dispatcher.state(),
            BackendState::RemoteOnly {
                local: LocalModuleStatus::Failed(reason)
            } if reason.contains("missing")
        ));
        dispatcher.fire(&Net::default_net()).await.unwrap();
        assert_eq!(remote.call_count(), 1);
        assert_eq!(dispatcher.active_backend().name(), "remote");
    }

    #[test]
    fn second_load_ignored() {
        let first = MockBackend::named("local");
        let second = MockBackend::named("other");
        let mut dispatcher = ExecutionDispatcher::new(Arc::new(MockBackend::named("remote")));
        dispatcher.complete_local_load(Ok(Arc::new(first)));
        dispatcher.complete_local_load(Ok(Arc::new(second)));
        assert_eq!(dispatcher.active_backend().name(), "local");
    }
}
