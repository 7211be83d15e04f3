//! editor
//!
//! Thin wrapper around the external text-editing component.
//!
//! # Origin tagging
//!
//! Every programmatic push carries an [`Origin`]. A push tagged
//! [`Origin::Controller`] registers one pending echo: the widget will report
//! the new text back as a change, and that next notification is tagged
//! `Controller` so the controller can ignore it exactly once. Pushes tagged
//! [`Origin::User`] (for example loading a file on the user's behalf) register
//! nothing, and their echo is handled like typing.
//!
//! The widget itself is behind [`TextEditor`]; [`MemoryEditor`] is an
//! in-memory implementation used by headless sessions and tests.

mod memory;

pub use memory::MemoryEditor;

use tracing::trace;

/// Who caused a text update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The person at the keyboard (or something acting for them).
    User,
    /// The sync controller mirroring canonical state.
    Controller,
}

/// A change notification after origin tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorChange {
    pub text: String,
    pub origin: Origin,
}

/// The external text-editing component.
pub trait TextEditor {
    /// Replace the whole buffer. The component reports the change back
    /// through its normal change notification.
    fn set_value(&mut self, text: &str);

    /// Current buffer contents.
    fn value(&self) -> String;
}

/// Adapter between the controller and the text widget.
pub struct EditorAdapter {
    editor: Box<dyn TextEditor>,
    pending_echoes: usize,
}

impl EditorAdapter {
    pub fn new(editor: Box<dyn TextEditor>) -> Self {
        Self {
            editor,
            pending_echoes: 0,
        }
    }

    /// Push `text` into the widget.
    pub fn set_text(&mut self, text: &str, origin: Origin) {
        if origin == Origin::Controller {
            self.pending_echoes += 1;
        }
        trace!(?origin, pending = self.pending_echoes, "pushing text to editor");
        self.editor.set_value(text);
    }

    /// Tag an upstream change notification.
    pub fn on_change(&mut self, text: impl Into<String>) -> EditorChange {
        let origin = if self.pending_echoes > 0 {
            self.pending_echoes -= 1;
            Origin::Controller
        } else {
            Origin::User
        };
        EditorChange {
            text: text.into(),
            origin,
        }
    }

    /// Current widget text.
    pub fn text(&self) -> String {
        self.editor.value()
    }

    /// Echoes still expected from controller pushes.
    pub fn pending_echoes(&self) -> usize {
        self.pending_echoes
    }
}

impl std::fmt::Debug for EditorAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorAdapter")
            .field("pending_echoes", &self.pending_echoes)
            .finish_non_exhaustive()
    }
}
