//! Petriscope - edit, render and fire Petri nets
//!
//! Petriscope keeps one canonical Petri net and mirrors it into two views: a
//! JSON text representation shown in an editor, and a graph handed to a
//! rendering component. A "fire" request sends the net to an execution
//! backend, either a remote HTTP service or a locally loaded compiled
//! module, and installs the returned net.
//!
//! # Architecture
//!
//! - [`core`] - Net model, JSON codec, validation, configuration
//! - [`backend`] - Fire backends and the remote/local selection state machine
//! - [`render`] - Mapping from net to graph elements
//! - [`editor`] - Text widget adapter with origin-tagged updates
//! - [`sync`] - Controller and event loop tying the views together
//! - [`cli`] - Command-line interface
//! - [`ui`] - User-facing output
//! - [`logging`] - Diagnostic tracing setup
//!
//! # Invariants
//!
//! 1. Only validated nets become canonical
//! 2. A failed fire never changes canonical state
//! 3. Text pushed by the controller is never parsed back
//! 4. Once the local module is active, every fire goes to it

pub mod backend;
pub mod cli;
pub mod core;
pub mod editor;
pub mod logging;
pub mod render;
pub mod sync;
pub mod ui;
