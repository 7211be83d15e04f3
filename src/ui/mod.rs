//! ui
//!
//! User-facing output for the command line.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! The headless session draws through [`crate::render::text`]; everything
//! else the CLI prints goes through this module.

pub mod output;
