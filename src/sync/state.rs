//! sync::state
//!
//! Canonical session state owned by the controller.

use crate::core::net::Net;

/// What put the current message on the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    /// A rejected editor change.
    Edit,
    /// A failed fire request.
    Fire,
}

/// Message shown on the error banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub source: ErrorSource,
}

/// Canonical state of one session.
///
/// Read and written only inside a single controller handler, so it carries
/// no locking of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// The canonical net. Always passes `validate`.
    pub net: Net,
    /// Current banner message, if any.
    pub error: Option<ErrorBanner>,
    /// Sequence number of the most recently issued fire request. Zero means
    /// none has been issued.
    pub latest_fire: u64,
}

impl AppState {
    pub fn new(net: Net) -> Self {
        Self {
            net,
            error: None,
            latest_fire: 0,
        }
    }

    /// Banner text; empty when there is no error.
    pub fn banner(&self) -> &str {
        self.error.as_ref().map(|e| e.message.as_str()).unwrap_or("")
    }

    pub(crate) fn set_error(&mut self, source: ErrorSource, message: impl Into<String>) {
        self.error = Some(ErrorBanner {
            message: message.into(),
            source,
        });
    }

    /// Clear the banner if `source` put it there.
    pub(crate) fn clear_error_from(&mut self, source: ErrorSource) {
        if self.error.as_ref().is_some_and(|e| e.source == source) {
            self.error = None;
        }
    }

    /// Issue the next fire sequence number.
    pub(crate) fn next_fire(&mut self) -> u64 {
        self.latest_fire += 1;
        self.latest_fire
    }

    /// Whether `seq` is the latest issued fire.
    pub fn is_current_fire(&self, seq: u64) -> bool {
        seq != 0 && seq == self.latest_fire
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Net::default_net())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_default_net_without_error() {
        let state = AppState::default();
        assert_eq!(state.net, Net::default_net());
        assert_eq!(state.banner(), "");
        assert!(!state.is_current_fire(0));
    }

    #[test]
    fn only_latest_fire_is_current() {
        let mut state = AppState::default();
        let first = state.next_fire();
        let second = state.next_fire();
        assert!(!state.is_current_fire(first));
        assert!(state.is_current_fire(second));
    }

    #[test]
    fn clear_only_matching_source() {
        let mut state = AppState::default();
        state.set_error(ErrorSource::Fire, "unreachable");
        state.clear_error_from(ErrorSource::Edit);
        assert_eq!(state.banner(), "unreachable");
        state.clear_error_from(ErrorSource::Fire);
        assert_eq!(state.banner(), "");
    }
}
