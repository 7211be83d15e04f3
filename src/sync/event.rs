//! sync::event
//!
//! Events consumed by the session loop and the work the controller hands
//! back to it.

use std::sync::Arc;

use crate::backend::{ExecutionError, FireBackend, LocalLoadRequest};
use crate::core::net::Net;

/// One discrete input to the controller.
pub enum SessionEvent {
    /// The text widget reported a change.
    EditorChanged(String),
    /// The user asked to fire.
    FireRequested,
    /// A fire request finished.
    FireCompleted {
        seq: u64,
        backend: &'static str,
        outcome: Result<Net, ExecutionError>,
    },
    /// The local module load finished.
    LocalModuleLoaded(Result<Arc<dyn FireBackend>, ExecutionError>),
    /// Stop the loop.
    Shutdown,
}

impl std::fmt::Debug for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::EditorChanged(text) => f
                .debug_tuple("EditorChanged")
                .field(&text.len())
                .finish(),
            SessionEvent::FireRequested => write!(f, "FireRequested"),
            SessionEvent::FireCompleted {
                seq,
                backend,
                outcome,
            } => f
                .debug_struct("FireCompleted")
                .field("seq", seq)
                .field("backend", backend)
                .field("ok", &outcome.is_ok())
                .finish(),
            SessionEvent::LocalModuleLoaded(outcome) => f
                .debug_tuple("LocalModuleLoaded")
                .field(&outcome.as_ref().map(|b| b.name()))
                .finish(),
            SessionEvent::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// A fire request ready to run off the loop.
#[derive(Clone)]
pub struct FireTicket {
    pub seq: u64,
    pub net: Net,
    pub backend: Arc<dyn FireBackend>,
}

impl FireTicket {
    /// Run the request and package the result as an event.
    pub async fn run(self) -> SessionEvent {
        let outcome = self.backend.fire(&self.net).await;
        SessionEvent::FireCompleted {
            seq: self.seq,
            backend: self.backend.name(),
            outcome,
        }
    }
}

impl std::fmt::Debug for FireTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FireTicket")
            .field("seq", &self.seq)
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

/// Long-latency work the loop must start on the controller's behalf.
#[derive(Debug)]
pub enum Command {
    Fire(FireTicket),
    LoadLocal(LocalLoadRequest),
}
