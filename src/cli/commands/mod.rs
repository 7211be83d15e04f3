//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Reads and validates its input net
//! 2. Calls into the library
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! `fire` and `session` talk to backends, which are async. They build a
//! tokio runtime and block on it, so the rest of the CLI stays synchronous.

mod completion;
mod fire;
mod inspect;
mod session;

pub use completion::completion;
pub use fire::fire;
pub use inspect::{default_net, marking, render, validate};
pub use session::session;

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context as _, Result};

use super::args::Command;
use super::Context;
use crate::core::codec::{self, NetError};
use crate::core::net::Net;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Default => inspect::default_net(),
        Command::Validate { file } => inspect::validate(ctx, &file),
        Command::Render { file } => inspect::render(&file),
        Command::Marking { file, enabled } => inspect::marking(&file, enabled),
        Command::Fire {
            file,
            endpoint,
            module,
            write,
        } => fire::fire(ctx, &file, endpoint, module, write),
        Command::Session {
            file,
            endpoint,
            module,
        } => session::session(ctx, file.as_deref(), endpoint, module),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Whether `path` means stdin.
fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read net text from a file, or stdin for `-`.
fn read_text(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read net from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read, parse and validate a net file.
fn load_net(path: &Path) -> Result<Net> {
    let text = read_text(path)?;
    match codec::parse_validated(&text) {
        Ok(net) => Ok(net),
        Err(NetError::Parse(err)) => bail!("{}: {}", path.display(), err),
        Err(NetError::Schema(err)) => bail!(
            "{}: {}\n{}",
            path.display(),
            err,
            crate::ui::output::format_violations(&err.violations)
        ),
    }
}
