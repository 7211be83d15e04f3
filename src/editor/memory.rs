//! editor::memory
//!
//! In-memory text widget.
//!
//! Behaves like a browser editor component: `set_value` queues a change
//! notification, which the host drains and forwards to the controller.
//! Simulated typing only updates the buffer; the host forwards the user's
//! change itself, as it would for a real keystroke event.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::TextEditor;

/// In-memory editor. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryEditor {
    inner: Arc<Mutex<MemoryEditorInner>>,
}

#[derive(Debug, Default)]
struct MemoryEditorInner {
    text: String,
    changes: VecDeque<String>,
    set_calls: usize,
}

impl MemoryEditor {
    /// Editor holding `text`, with no pending notifications.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryEditorInner {
                text: text.into(),
                ..Default::default()
            })),
        }
    }

    /// Simulate the user replacing the buffer.
    pub fn type_text(&self, text: impl Into<String>) {
        self.inner.lock().unwrap().text = text.into();
    }

    /// Take all queued change notifications, oldest first.
    pub fn drain_changes(&self) -> Vec<String> {
        self.inner.lock().unwrap().changes.drain(..).collect()
    }

    /// Number of programmatic `set_value` calls.
    pub fn set_calls(&self) -> usize {
        self.inner.lock().unwrap().set_calls
    }

    /// Current text.
    pub fn text(&self) -> String {
        self.inner.lock().unwrap().text.clone()
    }
}

impl TextEditor for MemoryEditor {
    fn set_value(&mut self, text: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.text = text.to_string();
        inner.changes.push_back(text.to_string());
        inner.set_calls += 1;
    }

    fn value(&self) -> String {
        self.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_queues_notification() {
        let mut editor = MemoryEditor::new("start");
        editor.set_value("next");
        assert_eq!(editor.value(), "next");
        assert_eq!(editor.set_calls(), 1);
        assert_eq!(editor.drain_changes(), vec!["next".to_string()]);
        assert!(editor.drain_changes().is_empty());
    }

    #[test]
    fn typing_only_updates_buffer() {
        let editor = MemoryEditor::new("");
        editor.type_text("typed");
        assert_eq!(editor.text(), "typed");
        assert_eq!(editor.set_calls(), 0);
        assert!(editor.drain_changes().is_empty());
    }
}
