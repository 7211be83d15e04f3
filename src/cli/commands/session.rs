//! session command - Headless interactive session
//!
//! Runs the same controller an interactive front end would, with an
//! in-memory editor and a text surface on stdout. Commands are read from
//! stdin, one per line.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use super::fire::apply_overrides;
use super::load_net;
use crate::backend::{create_dispatcher, LocalLoadRequest};
use crate::cli::Context;
use crate::core::config::Config;
use crate::core::net::Net;
use crate::editor::{EditorAdapter, MemoryEditor};
use crate::render::text::TextSurface;
use crate::render::RenderAdapter;
use crate::sync::{ControllerOptions, Session, SessionHandle, SyncController};
use crate::ui::output;

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Fire,
    Load(PathBuf),
    Show,
    Quit,
    Empty,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (cmd, arg) = line
            .split_once(char::is_whitespace)
            .map(|(c, a)| (c, a.trim()))
            .unwrap_or((line, ""));
        match cmd {
            "" => Input::Empty,
            "fire" => Input::Fire,
            "load" if !arg.is_empty() => Input::Load(PathBuf::from(arg)),
            "show" => Input::Show,
            "quit" | "exit" => Input::Quit,
            _ => Input::Unknown(line.to_string()),
        }
    }
}

/// Run the session command.
pub fn session(
    ctx: &Context,
    file: Option<&Path>,
    endpoint: Option<String>,
    module: Option<PathBuf>,
) -> Result<()> {
    let mut config = ctx.load_config()?;
    apply_overrides(&mut config, endpoint, module)?;
    let net = match file {
        Some(file) => load_net(file)?,
        None => Net::default_net(),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    rt.block_on(session_async(ctx, &config, net))
}

async fn session_async(ctx: &Context, config: &Config, net: Net) -> Result<()> {
    let editor = MemoryEditor::new("");
    let dispatcher = create_dispatcher(config).context("Failed to set up fire backend")?;
    let controller = SyncController::with_net(
        net,
        EditorAdapter::new(Box::new(editor.clone())),
        RenderAdapter::new(Box::new(TextSurface::new(std::io::stdout()))),
        dispatcher,
        ControllerOptions::from_config(config),
    );

    let session = Session::new(controller)
        .with_editor_feed(editor.clone())
        .with_local_module(LocalLoadRequest::from_config(config));
    let input = tokio::spawn(read_commands(session.handle(), editor));

    let controller = session.run().await;
    input.abort();

    output::print(
        format!(
            "session ended: {} tokens, {} backend",
            controller.net().token_count(),
            controller.backend_mode()
        ),
        ctx.verbosity(),
    );
    Ok(())
}

/// Forward stdin commands to the session until `quit` or end of input.
async fn read_commands(handle: SessionHandle, editor: MemoryEditor) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read session input");
                break;
            }
        };

        let delivered = match Input::parse(&line) {
            Input::Empty => true,
            Input::Fire => handle.fire(),
            Input::Load(path) => match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    editor.type_text(text.clone());
                    handle.edit(text)
                }
                Err(e) => {
                    output::error(format!("Failed to read {}: {}", path.display(), e));
                    true
                }
            },
            Input::Show => {
                output::data(editor.text());
                true
            }
            Input::Quit => break,
            Input::Unknown(line) => {
                output::error(format!(
                    "unknown command '{}' (expected fire, load <file>, show, quit)",
                    line
                ));
                true
            }
        };
        if !delivered {
            return;
        }
    }

    handle.shutdown();
}
