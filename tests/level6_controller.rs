//! Level 6: Controller Tests
//!
//! Tests the Slint-facing controller: callback factories, the selection
//! model, connector path strings, keyboard commands and re-entrancy.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{NotificationTracker, Pair};
use slint::{Model, SharedString};
use symbol_composer::{EditorController, ManipulationOutcome, Modifiers, ObjectId, Rect};

struct Fixture {
    ctrl: EditorController,
    tracker: NotificationTracker,
    a: ObjectId,
    b: ObjectId,
    central: ObjectId,
}

/// The standard pair, with its editor moved into a controller. The tracker
/// stays attached to the editor's notifications.
fn controller() -> Fixture {
    let Pair { scene, a, b, central } = Pair::new();
    Fixture {
        ctrl: EditorController::new(scene.editor),
        tracker: scene.tracker,
        a,
        b,
        central,
    }
}

// ============================================================================
// Callback factories
// ============================================================================

#[test]
fn test_pointer_callbacks_move_a_symbol() {
    let f = controller();
    let ctrl = &f.ctrl;
    let down = ctrl.pointer_down_callback();
    let motion = ctrl.pointer_move_callback();
    let up = ctrl.pointer_up_callback();

    down(50.0, 30.0, false, false, false);
    motion(60.0, 30.0, false, false, false);
    motion(70.0, 40.0, false, false, false);
    up(70.0, 40.0, false, false, false);

    let bounds = ctrl.with(|e| e.composition().view.bounds(f.a)).flatten();
    assert_eq!(bounds, Some(Rect::new(20.0, 10.0, 100.0, 50.0)));
    assert_eq!(*f.tracker.versions.borrow(), vec![4]);
}

#[test]
fn test_connector_path_follows_commits() {
    let f = controller();
    let ctrl = &f.ctrl;
    let connector = ctrl
        .with(|e| e.composition().view.symbol(f.a).unwrap().origin_connections[0])
        .unwrap();
    let path = ctrl.compute_connector_path();
    assert_eq!(path(connector, 3), SharedString::from("M 100 25 L 190 25"));

    ctrl.pointer_down(50.0, 30.0, Modifiers::NONE);
    ctrl.pointer_move(50.0, 80.0, Modifiers::NONE);
    ctrl.pointer_up(50.0, 80.0, Modifiers::NONE);

    assert_ne!(path(connector, 4), SharedString::from("M 100 25 L 190 25"));
}

#[test]
fn test_status_text_mirrors_hover() {
    let f = controller();
    let ctrl = &f.ctrl;
    ctrl.pointer_move(500.0, 300.0, Modifiers::NONE);
    let background = ctrl.status_text();
    ctrl.pointer_move(50.0, 30.0, Modifiers::NONE);
    let body = ctrl.status_text();

    assert_ne!(background, body);
    assert_eq!(f.tracker.statuses.borrow().last().map(String::as_str), Some(body.as_str()));
}

// ============================================================================
// Selection model
// ============================================================================

#[test]
fn test_selection_model_tracks_box_selection() {
    let f = controller();
    let ctrl = &f.ctrl;
    let model = ctrl.selection_model();

    ctrl.pointer_down(-20.0, -20.0, Modifiers::NONE);
    ctrl.pointer_move(200.0, 100.0, Modifiers::NONE);
    ctrl.pointer_move(450.0, 100.0, Modifiers::NONE);
    ctrl.pointer_up(450.0, 100.0, Modifiers::NONE);

    let selected: Vec<i32> = model.iter().collect();
    assert!(selected.contains(&f.a));
    assert!(selected.contains(&f.b));
    assert!(selected.contains(&f.central));
}

#[test]
fn test_delete_and_undo_through_controller() {
    let f = controller();
    let ctrl = &f.ctrl;
    let model = ctrl.selection_model();
    ctrl.pointer_down(350.0, 30.0, Modifiers::NONE);
    ctrl.pointer_up(350.0, 30.0, Modifiers::NONE);
    assert_eq!(model.row_count(), 1);

    let removed = ctrl.delete_selection();
    assert!(removed.contains(&f.b));
    assert_eq!(model.row_count(), 0);

    assert!(ctrl.undo());
    let restored = ctrl.with(|e| e.composition().view.contains(f.b));
    assert_eq!(restored, Some(true));
}

#[test]
fn test_nudge_and_cancel() {
    let f = controller();
    let ctrl = &f.ctrl;
    ctrl.pointer_down(50.0, 30.0, Modifiers::NONE);
    ctrl.pointer_up(50.0, 30.0, Modifiers::NONE);
    ctrl.nudge(10.0, 0.0);

    ctrl.pointer_down(60.0, 30.0, Modifiers::NONE);
    ctrl.pointer_move(120.0, 30.0, Modifiers::NONE);
    assert_eq!(ctrl.cancel(), Some(ManipulationOutcome::Cancelled));

    let bounds = ctrl.with(|e| e.composition().view.bounds(f.a)).flatten();
    assert_eq!(bounds, Some(Rect::new(10.0, 0.0, 100.0, 50.0)));
}

// ============================================================================
// Re-entrancy
// ============================================================================

#[test]
fn test_reentrant_notification_is_coalesced() {
    let f = controller();
    let ctrl = &f.ctrl;
    let nested = Rc::new(RefCell::new(Vec::new()));
    let inner = ctrl.clone();
    let sink = nested.clone();
    ctrl.with(|editor| {
        editor.notifications_mut().on_version(move |_| {
            // A host reacting to a commit by feeding another event.
            sink.borrow_mut().push(inner.pointer_move(0.0, 0.0, Modifiers::NONE));
        });
    });

    ctrl.pointer_down(50.0, 30.0, Modifiers::NONE);
    ctrl.pointer_move(90.0, 30.0, Modifiers::NONE);
    let outcome = ctrl.pointer_up(90.0, 30.0, Modifiers::NONE);

    assert!(matches!(outcome, Some(ManipulationOutcome::Committed { .. })));
    assert_eq!(*nested.borrow(), vec![None]);
}
