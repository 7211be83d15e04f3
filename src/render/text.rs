//! render::text
//!
//! Plain-text surface for terminal sessions.
//!
//! Draws the scene as an outline: places with their token counts,
//! transitions, then arcs. The banner is printed only when it changes.

use std::io::Write;

use tracing::warn;

use super::{ElementKind, Scene, Surface};

/// Surface printing to a writer.
pub struct TextSurface<W: Write> {
    out: W,
    banner: String,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            banner: String::new(),
        }
    }

    /// Consume the surface and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_scene(&mut self, scene: &Scene) -> std::io::Result<()> {
        let nodes = |kind: ElementKind| {
            scene
                .elements
                .iter()
                .filter(move |e| e.kind == kind)
                .map(|e| match &e.label {
                    Some(label) => format!("{}({})", e.id, label),
                    None => e.id.clone(),
                })
                .collect::<Vec<_>>()
                .join(" ")
        };

        writeln!(self.out, "places:      {}", nodes(ElementKind::Place))?;
        writeln!(self.out, "transitions: {}", nodes(ElementKind::Transition))?;
        let arcs: Vec<String> = scene
            .elements
            .iter()
            .filter(|e| e.kind.is_edge())
            .map(|e| {
                format!(
                    "{}->{}",
                    e.source.as_deref().unwrap_or("?"),
                    e.target.as_deref().unwrap_or("?")
                )
            })
            .collect();
        writeln!(self.out, "arcs:        {}", arcs.join(" "))?;
        self.out.flush()
    }
}

impl<W: Write> Surface for TextSurface<W> {
    fn draw(&mut self, scene: &Scene) {
        if let Err(e) = self.write_scene(scene) {
            warn!(error = %e, "failed to write scene");
        }
    }

    fn set_banner(&mut self, message: &str) {
        if message == self.banner {
            return;
        }
        self.banner = message.to_string();
        let result = if message.is_empty() {
            writeln!(self.out, "(error cleared)")
        } else {
            writeln!(self.out, "error: {}", message)
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to write banner");
        }
    }
}
