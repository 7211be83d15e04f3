//! sync
//!
//! Keeps the canonical net, the editor text and the rendered graph in step.
//!
//! # Architecture
//!
//! [`SyncController`] owns the canonical [`AppState`] together with the
//! editor adapter, the render adapter and the execution dispatcher. It is a
//! plain synchronous state machine: each handler takes one event, updates
//! state, pushes text and renders, and possibly returns a [`Command`]
//! describing slow work to start. [`Session`] is the async shell that runs
//! those commands on tokio and feeds their results back as
//! [`SessionEvent`]s.
//!
//! # Feedback loops
//!
//! Text pushed by the controller is tagged [`Origin::Controller`], so the
//! widget's echo of it is ignored exactly once instead of being parsed again.
//!
//! # Ordering
//!
//! Fire requests carry a sequence number. Only the result of the most
//! recently issued request may become canonical; earlier results that arrive
//! later are dropped.
//!
//! [`Origin::Controller`]: crate::editor::Origin::Controller

mod controller;
mod event;
mod session;
mod state;

pub use controller::{ControllerOptions, EditOutcome, FireOutcome, SyncController};
pub use event::{Command, FireTicket, SessionEvent};
pub use session::{Session, SessionHandle};
pub use state::{AppState, ErrorBanner, ErrorSource};
