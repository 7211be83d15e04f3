//! Integration tests for the sync controller running inside a session loop.
//!
//! These tests drive a full session (in-memory editor, recording surface,
//! scripted backends) through the public event interface and check the
//! state it ends in.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use petriscope::backend::mock::MockBackend;
use petriscope::backend::{
    BackendMode, BackendState, ExecutionDispatcher, ExecutionError, FireBackend, LocalLoadRequest,
    LocalModuleStatus,
};
use petriscope::core::codec;
use petriscope::core::net::{Net, Token};
use petriscope::core::verify::validate;
use petriscope::editor::{EditorAdapter, MemoryEditor};
use petriscope::render::{RecordingSurface, RenderAdapter};
use petriscope::sync::{ControllerOptions, Session, SyncController};

// =============================================================================
// Test Fixtures
// =============================================================================

struct Fixture {
    session: Session,
    editor: MemoryEditor,
    surface: RecordingSurface,
}

fn fixture(remote: Arc<dyn FireBackend>) -> Fixture {
    let editor = MemoryEditor::new("");
    let surface = RecordingSurface::new();
    let controller = SyncController::new(
        EditorAdapter::new(Box::new(editor.clone())),
        RenderAdapter::new(Box::new(surface.clone())),
        ExecutionDispatcher::new(remote),
        ControllerOptions::default(),
    );
    let session = Session::new(controller).with_editor_feed(editor.clone());
    Fixture {
        session,
        editor,
        surface,
    }
}

fn fired_default() -> Net {
    let mut net = Net::default_net();
    net.tokens[0].place_id = "p2".to_string();
    net
}

/// Backend whose first call is slow and every later call fast, each
/// returning a different net.
struct RacingBackend {
    calls: AtomicUsize,
}

#[async_trait]
impl FireBackend for RacingBackend {
    fn name(&self) -> &'static str {
        "racing"
    }

    async fn fire(&self, net: &Net) -> Result<Net, ExecutionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let mut next = net.clone();
        if call == 0 {
            tokio::time::sleep(Duration::from_millis(200)).await;
            next.tokens[0].place_id = "p3".to_string();
        } else {
            next.tokens[0].place_id = "p2".to_string();
        }
        Ok(next)
    }
}

/// Backend that returns a net with a token in a place that does not exist.
struct DanglingBackend;

#[async_trait]
impl FireBackend for DanglingBackend {
    fn name(&self) -> &'static str {
        "dangling"
    }

    async fn fire(&self, net: &Net) -> Result<Net, ExecutionError> {
        let mut next = net.clone();
        next.tokens.push(Token {
            id: "x".into(),
            place_id: "p99".into(),
            color: String::new(),
        });
        Ok(next)
    }
}

/// Backend that panics on every fire.
struct PanickingBackend;

#[async_trait]
impl FireBackend for PanickingBackend {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn fire(&self, _net: &Net) -> Result<Net, ExecutionError> {
        panic!("fire implementation crashed");
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn default_net_fire_installs_valid_result() {
    let remote = MockBackend::named("remote").respond_with(fired_default());
    let f = fixture(Arc::new(remote.clone()));
    let handle = f.session.handle();
    handle.fire();
    handle.shutdown();

    let controller = f.session.run().await;

    assert!(validate(controller.net()).is_ok());
    assert_eq!(controller.net(), &fired_default());
    assert_eq!(controller.banner(), "");
    assert_eq!(remote.calls(), vec![Net::default_net()]);

    // Start and fire each pushed text once; both echoes were swallowed.
    assert_eq!(f.editor.set_calls(), 2);
    assert_eq!(f.editor.text(), codec::serialize(&fired_default()));
    assert_eq!(controller.pending_echoes(), 0);
    assert_eq!(f.surface.draw_count(), 2);
    let scene = f.surface.last_scene().unwrap();
    assert_eq!(scene.element("p2").unwrap().label.as_deref(), Some("1"));
}

#[tokio::test]
async fn failing_fire_keeps_net_and_shows_banner() {
    let remote = MockBackend::named("remote")
        .fail_next(ExecutionError::Network("connection refused".into()));
    let f = fixture(Arc::new(remote));
    let handle = f.session.handle();
    handle.fire();
    handle.shutdown();

    let controller = f.session.run().await;

    assert_eq!(controller.net(), &Net::default_net());
    assert!(f.surface.banner().contains("connection refused"));
    assert_eq!(f.editor.set_calls(), 1);
    assert_eq!(f.surface.draw_count(), 2);
}

#[tokio::test]
async fn later_fire_wins_over_slower_earlier_one() {
    let f = fixture(Arc::new(RacingBackend {
        calls: AtomicUsize::new(0),
    }));
    let handle = f.session.handle();
    handle.fire();
    handle.fire();
    handle.shutdown();

    let controller = f.session.run().await;

    assert_eq!(controller.net(), &fired_default());
    assert_eq!(controller.state().latest_fire, 2);
    assert_eq!(f.editor.text(), codec::serialize(&fired_default()));
}

#[tokio::test]
async fn user_edits_flow_through_the_loop() {
    let f = fixture(Arc::new(MockBackend::new()));
    let handle = f.session.handle();

    let mut without_p1 = Net::default_net();
    without_p1.places.retain(|p| p.id != "p1");
    handle.edit(codec::serialize(&without_p1));
    handle.edit("{ \"places\": ");
    handle.edit(codec::serialize(&fired_default()));
    handle.shutdown();

    let controller = f.session.run().await;

    assert_eq!(controller.net(), &fired_default());
    assert_eq!(controller.banner(), "");
    // Only the start push reached the editor; edits are never pushed back.
    assert_eq!(f.editor.set_calls(), 1);
}

#[tokio::test]
async fn dangling_edit_is_rejected_and_reported() {
    let f = fixture(Arc::new(MockBackend::new()));
    let handle = f.session.handle();

    let mut without_p1 = Net::default_net();
    without_p1.places.retain(|p| p.id != "p1");
    handle.edit(codec::serialize(&without_p1));
    handle.shutdown();

    let controller = f.session.run().await;

    assert_eq!(controller.net(), &Net::default_net());
    assert!(f.surface.banner().contains("p1t1"), "{}", f.surface.banner());
}

#[tokio::test]
async fn missing_module_leaves_session_remote() {
    let remote = MockBackend::named("remote");
    let f = fixture(Arc::new(remote.clone()));
    let request = LocalLoadRequest {
        module: "/nonexistent/libpetri_fire.so".into(),
        fire_symbol: "petri_fire".into(),
        free_symbol: "petri_free".into(),
    };
    let session = f.session.with_local_module(Some(request));
    let handle = session.handle();
    handle.fire();
    handle.shutdown();

    let controller = session.run().await;

    assert!(matches!(
        controller.backend_state(),
        BackendState::RemoteOnly {
            local: LocalModuleStatus::Failed(_)
        }
    ));
    assert_eq!(controller.backend_mode(), BackendMode::Remote);
    assert_eq!(remote.call_count(), 1);
}

#[tokio::test]
async fn backend_returning_invalid_net_is_rejected() {
    let f = fixture(Arc::new(DanglingBackend));
    let handle = f.session.handle();
    handle.fire();
    handle.shutdown();

    let controller = f.session.run().await;

    assert_eq!(controller.net(), &Net::default_net());
    assert!(validate(controller.net()).is_ok());
    assert!(f.surface.banner().contains("p99"), "{}", f.surface.banner());
    assert_eq!(f.editor.set_calls(), 1);
}

#[tokio::test]
async fn panicking_backend_fails_the_fire_and_session_still_ends() {
    let f = fixture(Arc::new(PanickingBackend));
    let handle = f.session.handle();
    handle.fire();
    handle.shutdown();

    let controller = tokio::time::timeout(Duration::from_secs(3), f.session.run())
        .await
        .expect("session should end after a panicking fire");

    assert_eq!(controller.net(), &Net::default_net());
    assert!(
        f.surface.banner().contains("fire task failed"),
        "{}",
        f.surface.banner()
    );
}
