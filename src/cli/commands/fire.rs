//! fire command - Run one fire through the dispatcher
//!
//! # Design
//!
//! The command replays a session's backend selection once: the dispatcher
//! starts remote-only, a configured module is loaded, and whichever backend
//! is active afterwards serves the request. A module that fails to load is
//! reported and the remote service is used.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use tracing::debug;

use super::{is_stdin, load_net};
use crate::backend::{create_dispatcher, BackendState, LocalLoadRequest, LocalModuleStatus};
use crate::cli::Context;
use crate::core::codec;
use crate::core::config::Config;
use crate::ui::output;

/// Run the fire command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn fire(
    ctx: &Context,
    file: &Path,
    endpoint: Option<String>,
    module: Option<PathBuf>,
    write: bool,
) -> Result<()> {
    if write && is_stdin(file) {
        bail!("--write needs a file, not stdin");
    }

    let mut config = ctx.load_config()?;
    apply_overrides(&mut config, endpoint, module)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    rt.block_on(fire_async(ctx, &config, file, write))
}

/// Flags take precedence over the config file.
pub(super) fn apply_overrides(
    config: &mut Config,
    endpoint: Option<String>,
    module: Option<PathBuf>,
) -> Result<()> {
    if let Some(endpoint) = endpoint {
        config
            .set_remote_endpoint(endpoint)
            .context("Invalid --endpoint")?;
    }
    if let Some(module) = module {
        config.set_local_module(module).context("Invalid --module")?;
    }
    Ok(())
}

async fn fire_async(ctx: &Context, config: &Config, file: &Path, write: bool) -> Result<()> {
    let net = load_net(file)?;
    let mut dispatcher = create_dispatcher(config).context("Failed to set up fire backend")?;

    if let Some(request) = LocalLoadRequest::from_config(config) {
        dispatcher.begin_local_load();
        dispatcher.complete_local_load(request.load_async().await);
        if let BackendState::RemoteOnly {
            local: LocalModuleStatus::Failed(reason),
        } = dispatcher.state()
        {
            output::warn(
                format!("{}; using {}", reason, config.remote_endpoint()),
                ctx.verbosity(),
            );
        }
    }

    debug!(backend = %dispatcher.mode(), "firing");
    let next = dispatcher
        .fire(&net)
        .await
        .with_context(|| format!("Fire failed ({} backend)", dispatcher.mode()))?;
    let text = codec::serialize_with_indent(&next, config.editor_indent());

    if write {
        std::fs::write(file, format!("{}\n", text))
            .with_context(|| format!("Failed to write {}", file.display()))?;
        output::print(
            format!("{}: fired via {} backend", file.display(), dispatcher.mode()),
            ctx.verbosity(),
        );
    } else {
        output::data(text);
    }
    Ok(())
}
