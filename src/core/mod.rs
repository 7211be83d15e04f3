//! core
//!
//! The net model: domain types, text codec, verification and configuration.
//!
//! # Modules
//!
//! - [`net`] - Places, transitions, arcs, tokens and derived views
//! - [`codec`] - Text representation (`parse` / `serialize`)
//! - [`verify`] - Referential integrity checks (`validate`)
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Nets are replaced wholesale, never patched
//! - Every externally sourced net is validated before it becomes canonical
//! - All verification is deterministic

pub mod codec;
pub mod config;
pub mod net;
pub mod verify;

pub use codec::{parse, parse_validated, serialize, NetError, ParseError};
pub use net::{token_count_by_place, Arc, ArcDirection, Net, Place, Token, Transition};
pub use verify::{validate, SchemaError, Violation};
