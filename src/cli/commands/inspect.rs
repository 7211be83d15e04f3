//! Read-only commands: default, validate, render, marking.

use std::path::Path;

use anyhow::{bail, Context as _, Result};

use super::{load_net, read_text};
use crate::cli::Context;
use crate::core::codec::{self, NetError};
use crate::core::net::Net;
use crate::render::Scene;
use crate::ui::output;

/// Print the default net.
pub fn default_net() -> Result<()> {
    output::data(codec::serialize(&Net::default_net()));
    Ok(())
}

/// Parse and validate a net file, listing every violation.
pub fn validate(ctx: &Context, file: &Path) -> Result<()> {
    let text = read_text(file)?;
    match codec::parse_validated(&text) {
        Ok(net) => {
            output::print(
                format!(
                    "{}: ok ({} places, {} transitions, {} arcs, {} tokens)",
                    file.display(),
                    net.places.len(),
                    net.transitions.len(),
                    net.input_arcs.len() + net.output_arcs.len(),
                    net.tokens.len()
                ),
                ctx.verbosity(),
            );
            Ok(())
        }
        Err(NetError::Parse(err)) => bail!("{}: {}", file.display(), err),
        Err(NetError::Schema(err)) => {
            output::print(
                format!(
                    "{}: {} violation(s)\n{}",
                    file.display(),
                    err.violations.len(),
                    output::format_violations(&err.violations)
                ),
                ctx.verbosity(),
            );
            bail!("{}: {}", file.display(), err)
        }
    }
}

/// Print the graph-component input for a net.
pub fn render(file: &Path) -> Result<()> {
    let net = load_net(file)?;
    let scene = Scene::for_net(&net);
    let json = serde_json::to_string_pretty(&scene).context("Failed to encode scene")?;
    output::data(json);
    Ok(())
}

/// Print token counts per place.
pub fn marking(file: &Path, enabled: bool) -> Result<()> {
    let net = load_net(file)?;
    output::data(output::format_marking(&net.token_count_by_place()));
    if enabled {
        let ids: Vec<&str> = net
            .enabled_transitions()
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        output::data(format!("enabled: {}", ids.join(" ")));
    }
    Ok(())
}
