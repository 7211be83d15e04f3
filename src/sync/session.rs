//! sync::session
//!
//! The event loop around a [`SyncController`].
//!
//! # Design
//!
//! ```text
//!  host (stdin, UI) ──┐
//!                     │   mpsc::unbounded_channel    ┌────────────────┐
//!  fire tasks ────────┼─────────────────────────────▶│ Session::run   │
//!                     │       SessionEvent           │  controller    │
//!  module load task ──┘                              └────────────────┘
//! ```
//!
//! The loop takes one event at a time and hands it to the controller, which
//! runs to completion before the next event is taken. Fire requests and the
//! module load run as spawned tasks and post their results back into the
//! same channel. Change notifications queued by the in-memory editor are
//! delivered to the controller right after the turn that caused them, ahead
//! of anything already waiting in the channel, as a widget that notifies
//! synchronously would.
//!
//! `Shutdown` stops taking new work but lets spawned tasks report back
//! first, so a scripted session that fires and quits still sees its result.
//! Each task is watched by a small supervisor that reports a panicked or
//! cancelled task as a failed fire or a failed load, so every spawned task
//! reports back exactly once.

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use super::controller::SyncController;
use super::event::{Command, SessionEvent};
use crate::backend::{ExecutionError, LocalLoadRequest};
use crate::editor::MemoryEditor;

/// Sending side of a session, cheap to clone.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Post an event. Returns false once the session has stopped.
    pub fn send(&self, event: SessionEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// The user changed the editor text.
    pub fn edit(&self, text: impl Into<String>) -> bool {
        self.send(SessionEvent::EditorChanged(text.into()))
    }

    /// The user asked to fire.
    pub fn fire(&self) -> bool {
        self.send(SessionEvent::FireRequested)
    }

    /// Stop the loop.
    pub fn shutdown(&self) -> bool {
        self.send(SessionEvent::Shutdown)
    }
}

/// A running session: controller plus its event channel.
pub struct Session {
    controller: SyncController,
    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    editor_feed: Option<MemoryEditor>,
    local: Option<LocalLoadRequest>,
    /// Spawned tasks that have not reported back yet.
    in_flight: usize,
}

impl Session {
    pub fn new(controller: SyncController) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller,
            tx,
            rx,
            editor_feed: None,
            local: None,
            in_flight: 0,
        }
    }

    /// Deliver change notifications queued by `editor` to the controller.
    ///
    /// `editor` must be a clone of the widget the controller's editor
    /// adapter wraps.
    pub fn with_editor_feed(mut self, editor: MemoryEditor) -> Self {
        self.editor_feed = Some(editor);
        self
    }

    /// Load this module when the session starts.
    pub fn with_local_module(mut self, request: Option<LocalLoadRequest>) -> Self {
        self.local = request;
        self
    }

    /// Handle for posting events.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.tx.clone(),
        }
    }

    /// Start the controller and process events until `Shutdown` and every
    /// spawned task has reported back.
    ///
    /// Must be called inside a tokio runtime. Returns the controller so the
    /// caller can inspect the final state.
    pub async fn run(mut self) -> SyncController {
        if let Some(command) = self.controller.start(self.local.take()) {
            self.spawn(command);
        }

        let mut stopping = false;
        loop {
            self.pump_editor();
            if stopping && self.in_flight == 0 {
                break;
            }
            let Some(event) = self.rx.recv().await else {
                break;
            };
            trace!(?event, "session event");
            match event {
                SessionEvent::Shutdown => {
                    debug!(in_flight = self.in_flight, "session shutting down");
                    stopping = true;
                    continue;
                }
                SessionEvent::FireCompleted { .. } | SessionEvent::LocalModuleLoaded(_) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                }
                SessionEvent::FireRequested | SessionEvent::EditorChanged(_) if stopping => {
                    debug!("session stopping, dropping event");
                    continue;
                }
                _ => {}
            }
            if let Some(command) = self.controller.handle(event) {
                self.spawn(command);
            }
        }

        self.controller
    }

    fn pump_editor(&mut self) {
        let Some(editor) = &self.editor_feed else {
            return;
        };
        for text in editor.drain_changes() {
            self.controller.editor_changed(text);
        }
    }

    fn spawn(&mut self, command: Command) {
        self.in_flight += 1;
        let tx = self.tx.clone();
        match command {
            Command::Fire(ticket) => {
                let (seq, backend) = (ticket.seq, ticket.backend.name());
                let task = tokio::spawn(ticket.run());
                tokio::spawn(async move {
                    let event = task.await.unwrap_or_else(|err| {
                        warn!(seq, backend, error = %err, "fire task failed");
                        SessionEvent::FireCompleted {
                            seq,
                            backend,
                            outcome: Err(ExecutionError::TaskFailed(err.to_string())),
                        }
                    });
                    let _ = tx.send(event);
                });
            }
            Command::LoadLocal(request) => {
                let task = tokio::spawn(request.load_async());
                tokio::spawn(async move {
                    let outcome = task.await.unwrap_or_else(|err| {
                        warn!(error = %err, "module load task failed");
                        Err(ExecutionError::ModuleLoad(format!("loader task failed: {}", err)))
                    });
                    let _ = tx.send(SessionEvent::LocalModuleLoaded(outcome));
                });
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("controller", &self.controller)
            .field("local", &self.local)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}
