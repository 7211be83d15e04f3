//! sync::controller
//!
//! The single owner of canonical state.
//!
//! # Contract
//!
//! Every handler runs to completion against `&mut self`; nothing else can
//! observe or mutate [`AppState`] in between. Handlers never block: work that
//! takes time is returned as a [`Command`] for the session loop to run, and
//! its result comes back later as a separate event.
//!
//! Every net that becomes canonical has passed `validate`: edited text on its
//! way in from the editor, fire results before they are installed, whatever
//! backend produced them.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::event::{Command, FireTicket, SessionEvent};
use super::state::{AppState, ErrorSource};
use crate::backend::{
    BackendMode, BackendState, ExecutionDispatcher, ExecutionError, FireBackend, LocalLoadRequest,
};
use crate::core::codec::{self, NetError, DEFAULT_INDENT};
use crate::core::config::Config;
use crate::core::net::Net;
use crate::core::verify::validate;
use crate::editor::{EditorAdapter, Origin};
use crate::render::RenderAdapter;

/// Controller behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Put rejected editor changes on the error banner.
    pub report_invalid_edits: bool,
    /// Indent of text pushed into the editor.
    pub indent: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            report_invalid_edits: true,
            indent: DEFAULT_INDENT,
        }
    }
}

impl ControllerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            report_invalid_edits: config.report_invalid_edits(),
            indent: config.editor_indent(),
        }
    }
}

/// Result of handling an editor change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The notification echoed a controller push and was dropped.
    EchoIgnored,
    /// The text was valid and is now canonical.
    Installed,
    /// The text was rejected; canonical state is unchanged.
    Rejected(NetError),
}

/// Result of handling a fire completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// The returned net is now canonical.
    Installed,
    /// The backend failed; the banner shows why.
    Failed(ExecutionError),
    /// A newer fire was issued after this one; the result was dropped.
    Stale,
}

/// Keeps the canonical net, the editor text and the rendering in step.
pub struct SyncController {
    state: AppState,
    editor: EditorAdapter,
    renderer: RenderAdapter,
    dispatcher: ExecutionDispatcher,
    options: ControllerOptions,
}

impl SyncController {
    /// Controller over the default net. Nothing is pushed until [`start`].
    ///
    /// [`start`]: SyncController::start
    pub fn new(
        editor: EditorAdapter,
        renderer: RenderAdapter,
        dispatcher: ExecutionDispatcher,
        options: ControllerOptions,
    ) -> Self {
        Self::with_net(Net::default_net(), editor, renderer, dispatcher, options)
    }

    /// Controller over `net`, which the caller has already validated.
    pub fn with_net(
        net: Net,
        editor: EditorAdapter,
        renderer: RenderAdapter,
        dispatcher: ExecutionDispatcher,
        options: ControllerOptions,
    ) -> Self {
        Self {
            state: AppState::new(net),
            editor,
            renderer,
            dispatcher,
            options,
        }
    }

    /// Current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Canonical net.
    pub fn net(&self) -> &Net {
        &self.state.net
    }

    /// Current banner text.
    pub fn banner(&self) -> &str {
        self.state.banner()
    }

    /// Backend selection state.
    pub fn backend_state(&self) -> &BackendState {
        self.dispatcher.state()
    }

    /// Backend mode.
    pub fn backend_mode(&self) -> BackendMode {
        self.dispatcher.mode()
    }

    /// Text currently in the editor.
    pub fn editor_text(&self) -> String {
        self.editor.text()
    }

    /// Echoes still expected from controller pushes.
    pub fn pending_echoes(&self) -> usize {
        self.editor.pending_echoes()
    }

    /// Canonical net as text, as pushed into the editor.
    pub fn canonical_text(&self) -> String {
        codec::serialize_with_indent(&self.state.net, self.options.indent)
    }

    /// Start the session.
    ///
    /// Pushes the canonical net into the editor, renders it, and, when a local
    /// module is configured, marks the load as started and returns the load
    /// for the loop to run.
    #[instrument(skip_all)]
    pub fn start(&mut self, local: Option<LocalLoadRequest>) -> Option<Command> {
        info!(
            places = self.state.net.places.len(),
            transitions = self.state.net.transitions.len(),
            "session started"
        );
        self.push_canonical_text();
        self.render();

        local.map(|request| {
            debug!(module = %request.module.display(), "loading local module");
            self.dispatcher.begin_local_load();
            Command::LoadLocal(request)
        })
    }

    /// Route one event to its handler.
    pub fn handle(&mut self, event: SessionEvent) -> Option<Command> {
        match event {
            SessionEvent::EditorChanged(text) => {
                self.editor_changed(text);
                None
            }
            SessionEvent::FireRequested => Some(Command::Fire(self.request_fire())),
            SessionEvent::FireCompleted {
                seq,
                backend,
                outcome,
            } => {
                debug!(seq, backend, ok = outcome.is_ok(), "fire completed");
                self.fire_completed(seq, outcome);
                None
            }
            SessionEvent::LocalModuleLoaded(outcome) => {
                self.local_module_loaded(outcome);
                None
            }
            SessionEvent::Shutdown => None,
        }
    }

    /// Handle a change notification from the editor.
    pub fn editor_changed(&mut self, text: impl Into<String>) -> EditOutcome {
        let change = self.editor.on_change(text);
        if change.origin == Origin::Controller {
            debug!("ignoring editor echo");
            return EditOutcome::EchoIgnored;
        }

        match codec::parse_validated(&change.text) {
            Ok(net) => {
                debug!(tokens = net.token_count(), "installing edited net");
                self.state.net = net;
                self.state.clear_error_from(ErrorSource::Edit);
                self.render();
                EditOutcome::Installed
            }
            Err(err) => {
                debug!(error = %err, "rejecting edited text");
                if self.options.report_invalid_edits {
                    self.state.set_error(ErrorSource::Edit, err.to_string());
                    self.render();
                }
                EditOutcome::Rejected(err)
            }
        }
    }

    /// Issue a fire request against the canonical net.
    ///
    /// Any fire still in flight becomes stale.
    pub fn request_fire(&mut self) -> FireTicket {
        let seq = self.state.next_fire();
        let backend = self.dispatcher.active_backend();
        debug!(seq, backend = backend.name(), "fire requested");
        FireTicket {
            seq,
            net: self.state.net.clone(),
            backend,
        }
    }

    /// Handle the result of fire request `seq`.
    pub fn fire_completed(&mut self, seq: u64, outcome: Result<Net, ExecutionError>) -> FireOutcome {
        if !self.state.is_current_fire(seq) {
            debug!(seq, latest = self.state.latest_fire, "discarding stale fire result");
            return FireOutcome::Stale;
        }

        let outcome = outcome.and_then(|net| {
            validate(&net)?;
            Ok(net)
        });
        match outcome {
            Ok(net) => {
                self.state.net = net;
                self.state.error = None;
                self.push_canonical_text();
                self.render();
                FireOutcome::Installed
            }
            Err(err) => {
                warn!(seq, error = %err, "fire failed");
                self.state.set_error(ErrorSource::Fire, err.to_string());
                self.render();
                FireOutcome::Failed(err)
            }
        }
    }

    /// Handle the outcome of the local module load.
    pub fn local_module_loaded(&mut self, outcome: Result<Arc<dyn FireBackend>, ExecutionError>) {
        self.dispatcher.complete_local_load(outcome);
    }

    /// Fire through the active backend and apply the result in one call.
    ///
    /// For hosts without an event loop; the controller is borrowed for the
    /// whole round trip.
    pub async fn fire_now(&mut self) -> FireOutcome {
        let ticket = self.request_fire();
        let outcome = ticket.backend.fire(&ticket.net).await;
        self.fire_completed(ticket.seq, outcome)
    }

    fn push_canonical_text(&mut self) {
        let text = self.canonical_text();
        self.editor.set_text(&text, Origin::Controller);
    }

    fn render(&mut self) {
        self.renderer.render(&self.state.net, self.state.banner());
    }
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("state", &self.state)
            .field("editor", &self.editor)
            .field("renderer", &self.renderer)
            .field("dispatcher", &self.dispatcher)
            .field("options", &self.options)
            .finish()
    }
}
