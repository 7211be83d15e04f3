//! render::surface
//!
//! The boundary to the external graph component and error banner.

use std::sync::{Arc, Mutex};

use super::Scene;

/// External display: graph component plus the single-line error banner.
pub trait Surface {
    /// Replace the whole graph with `scene` and run its layout.
    fn draw(&mut self, scene: &Scene);

    /// Show `message` on the banner; empty clears it.
    fn set_banner(&mut self, message: &str);
}

/// Surface that keeps what it was given, for tests and headless use.
///
/// Clones share state, so a test can hand one clone to the adapter and
/// inspect through another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    inner: Arc<Mutex<RecordingInner>>,
}

#[derive(Debug, Default)]
struct RecordingInner {
    last_scene: Option<Scene>,
    banner: String,
    draws: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent scene drawn.
    pub fn last_scene(&self) -> Option<Scene> {
        self.inner.lock().unwrap().last_scene.clone()
    }

    /// Current banner text.
    pub fn banner(&self) -> String {
        self.inner.lock().unwrap().banner.clone()
    }

    /// Number of draws.
    pub fn draw_count(&self) -> usize {
        self.inner.lock().unwrap().draws
    }
}

impl Surface for RecordingSurface {
    fn draw(&mut self, scene: &Scene) {
        let mut inner = self.inner.lock().unwrap();
        inner.last_scene = Some(scene.clone());
        inner.draws += 1;
    }

    fn set_banner(&mut self, message: &str) {
        self.inner.lock().unwrap().banner = message.to_string();
    }
}
