//! logging
//!
//! Diagnostic tracing for the library and the CLI.
//!
//! Diagnostics go to stderr and are controlled by `RUST_LOG`. They are not
//! part of command output, which goes through [`crate::ui::output`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "petriscope=debug,warn"
    } else {
        "warn"
    }
}

/// Install the global subscriber.
///
/// Reads `RUST_LOG`; falls back to `warn`, or to debug output for this crate
/// when `debug` is set. Output: stderr, compact format. Calling this twice is
/// harmless; the second call leaves the first subscriber in place.
///
/// # Example
/// ```bash
/// RUST_LOG=petriscope::sync=trace petriscope session net.json
/// ```
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_raises_crate_level_only() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).starts_with("petriscope=debug"));
    }

    #[test]
    fn init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
