//! Level 1: Pointer Routing Tests
//!
//! Tests zone classification, tentative actions, cursor hints and status
//! text while hovering over symbols, connectors and the background.

mod common;

use common::{Pair, Scene, CONCEPT, FIXED};
use symbol_composer::{
    AuxiliaryAction, BoundsGeometry, ClickCommand, Composition, CursorHint, Editor, EditorConfig,
    ManipulationKind, Modifiers, Point, PointedVisual, ResizeHandle, Zone,
};

fn hover(scene: &mut Scene, at: Point, modifiers: Modifiers) -> PointedVisual {
    scene.editor.pointer_move(at, modifiers);
    scene.editor.pointed().expect("hover should classify the position")
}

// ============================================================================
// Symbol zones
// ============================================================================

#[test]
fn test_body_offers_edit_in_place() {
    let mut pair = Pair::new();
    let pointed = hover(&mut pair.scene, Point::new(50.0, 30.0), Modifiers::NONE);

    assert_eq!(pointed.object, Some(pair.a));
    assert_eq!(pointed.zone, Zone::Body);
    assert_eq!(pointed.action.drag, Some(ManipulationKind::Move));
    assert_eq!(pointed.action.click, ClickCommand::EditInPlace);
    assert_eq!(pointed.cursor, CursorHint::Text);
}

#[test]
fn test_headline_edits_name_unless_toggling() {
    let mut pair = Pair::new();
    let plain = hover(&mut pair.scene, Point::new(50.0, 10.0), Modifiers::NONE);
    assert_eq!(plain.zone, Zone::Headline);
    assert_eq!(plain.action.click, ClickCommand::EditName);

    let ctrl = hover(&mut pair.scene, Point::new(50.0, 10.0), Modifiers::ctrl());
    assert_eq!(ctrl.zone, Zone::Headline);
    assert_eq!(ctrl.action.click, ClickCommand::Select);
    assert_eq!(ctrl.action.drag, Some(ManipulationKind::Move));
    assert_eq!(ctrl.cursor, CursorHint::Move);
}

#[test]
fn test_border_is_move_panel() {
    let mut pair = Pair::new();
    let pointed = hover(&mut pair.scene, Point::new(2.0, 10.0), Modifiers::NONE);

    assert_eq!(pointed.zone, Zone::MovePanel);
    assert_eq!(pointed.cursor, CursorHint::Move);
}

#[test]
fn test_edge_handle_wins_over_move_panel() {
    let mut pair = Pair::new();
    let pointed = hover(&mut pair.scene, Point::new(2.0, 25.0), Modifiers::NONE);

    assert_eq!(pointed.zone, Zone::ResizeHandle(ResizeHandle::LEFT));
    assert_eq!(pointed.cursor, CursorHint::ResizeHorizontal);
    assert_eq!(
        pointed.action.drag,
        Some(ManipulationKind::Resize {
            handle: ResizeHandle::LEFT,
            symmetric: false,
        })
    );
}

#[test]
fn test_small_central_symbol_is_mostly_movable() {
    let mut pair = Pair::new();

    // Central symbol (190,15,20,20): edge handles would swamp it.
    let inner = hover(&mut pair.scene, Point::new(196.0, 21.0), Modifiers::NONE);
    assert_eq!(inner.object, Some(pair.central));
    assert_eq!(inner.zone, Zone::Body);
    assert_eq!(inner.action.drag, Some(ManipulationKind::Move));

    let top = hover(&mut pair.scene, Point::new(200.0, 17.0), Modifiers::NONE);
    assert_eq!(top.zone, Zone::MovePanel);

    let corner = hover(&mut pair.scene, Point::new(208.0, 33.0), Modifiers::NONE);
    assert_eq!(corner.zone, Zone::ResizeHandle(ResizeHandle::BOTTOM_RIGHT));
}

#[test]
fn test_alt_makes_resize_symmetric() {
    let mut pair = Pair::new();
    let pointed = hover(&mut pair.scene, Point::new(96.0, 46.0), Modifiers::alt());

    assert_eq!(
        pointed.action.drag,
        Some(ManipulationKind::Resize {
            handle: ResizeHandle::BOTTOM_RIGHT,
            symmetric: true,
        })
    );
    assert_eq!(pointed.cursor, CursorHint::ResizeNwSe);
}

#[test]
fn test_action_button_zone() {
    let mut pair = Pair::new();
    let pointed = hover(&mut pair.scene, Point::new(90.0, 40.0), Modifiers::NONE);

    assert_eq!(pointed.zone, Zone::ActionButton(AuxiliaryAction::SwitchDetails));
    assert_eq!(pointed.action.click, ClickCommand::SwitchDetails);
    assert_eq!(pointed.cursor, CursorHint::Hand);
}

#[test]
fn test_fixed_axis_handles_are_omitted() {
    let mut scene = Scene::new();
    let fixed = scene.concept(FIXED, "F", Point::new(50.0, 125.0));

    // Right edge handle only frees the fixed width.
    let edge = hover(&mut scene, Point::new(98.0, 125.0), Modifiers::NONE);
    assert_eq!(edge.object, Some(fixed));
    assert_eq!(edge.zone, Zone::MovePanel);

    // Corner still frees the height.
    let corner = hover(&mut scene, Point::new(98.0, 102.0), Modifiers::NONE);
    assert_eq!(corner.zone, Zone::ResizeHandle(ResizeHandle::TOP_RIGHT));
}

#[test]
fn test_locked_symbol_offers_nothing() {
    let mut pair = Pair::new();
    pair.scene.editor.composition_mut().view.get_mut(pair.a).unwrap().locked = true;

    let pointed = hover(&mut pair.scene, Point::new(2.0, 25.0), Modifiers::NONE);

    assert_eq!(pointed.object, Some(pair.a));
    assert_eq!(pointed.action.drag, None);
    assert_eq!(pointed.cursor, CursorHint::NotAllowed);
}

// ============================================================================
// Connector zones
// ============================================================================

#[test]
fn test_connector_idea_end_offers_relink() {
    let mut pair = Pair::new();
    let pointed = hover(&mut pair.scene, Point::new(100.0, 25.0), Modifiers::NONE);

    assert_eq!(pointed.object, Some(pair.origin_connector()));
    assert_eq!(pointed.zone, Zone::ConnectorIdeaEnd);
    assert_eq!(pointed.action.drag, Some(ManipulationKind::Relink));
    assert_eq!(pointed.cursor, CursorHint::Crosshair);
}

#[test]
fn test_connector_midpoint_offers_displace() {
    let mut pair = Pair::new();
    let pointed = hover(&mut pair.scene, Point::new(145.0, 25.0), Modifiers::NONE);

    assert_eq!(pointed.zone, Zone::ConnectorWaypoint);
    assert_eq!(pointed.action.drag, Some(ManipulationKind::Displace));
}

#[test]
fn test_connector_body_only_selects() {
    let mut pair = Pair::new();
    let pointed = hover(&mut pair.scene, Point::new(120.0, 26.0), Modifiers::NONE);

    assert_eq!(pointed.zone, Zone::ConnectorBody);
    assert_eq!(pointed.action.drag, None);
    assert_eq!(pointed.action.click, ClickCommand::Select);
}

// ============================================================================
// Background, notifications and scale
// ============================================================================

#[test]
fn test_background_offers_box_selection() {
    let mut pair = Pair::new();
    let pointed = hover(&mut pair.scene, Point::new(500.0, 300.0), Modifiers::NONE);

    assert_eq!(pointed.object, None);
    assert_eq!(pointed.zone, Zone::Background);
    assert_eq!(pointed.action.drag, Some(ManipulationKind::SelectBox));
}

#[test]
fn test_hover_emits_status_and_cursor_once() {
    let mut pair = Pair::new();
    hover(&mut pair.scene, Point::new(50.0, 30.0), Modifiers::NONE);
    hover(&mut pair.scene, Point::new(50.0, 30.0), Modifiers::NONE);
    hover(&mut pair.scene, Point::new(51.0, 30.0), Modifiers::NONE);

    let statuses = pair.scene.tracker.statuses.borrow();
    assert_eq!(statuses.len(), 1);
    assert_eq!(pair.scene.editor.status_text().as_str(), statuses[0]);
    assert_eq!(*pair.scene.tracker.cursors.borrow(), vec![CursorHint::Text]);
}

#[test]
fn test_hover_never_changes_geometry() {
    let mut pair = Pair::new();
    let version = pair.scene.editor.composition().view.version();
    for x in [2.0, 50.0, 96.0, 100.0, 145.0, 500.0] {
        hover(&mut pair.scene, Point::new(x, 25.0), Modifiers::NONE);
    }
    assert_eq!(pair.scene.editor.composition().view.version(), version);
    assert!(pair.scene.tracker.versions.borrow().is_empty());
}

#[test]
fn test_display_scale_converts_pointer_and_tolerances() {
    let editor = Editor::new(Composition::new(common::test_domain()), EditorConfig::default())
        .with_geometry(BoundsGeometry::default().with_display_scale(2.0));
    let mut scene = Scene::with_editor(editor);
    let a = scene.concept(CONCEPT, "A", Point::new(50.0, 25.0));

    // View (100, 60) is world (50, 30).
    let body = hover(&mut scene, Point::new(100.0, 60.0), Modifiers::NONE);
    assert_eq!(body.object, Some(a));
    assert_eq!(body.zone, Zone::Body);

    // Handles shrink to 4 world units; world x = 5 is outside.
    let panel = hover(&mut scene, Point::new(10.0, 50.0), Modifiers::NONE);
    assert_eq!(panel.zone, Zone::Body);
    let handle = hover(&mut scene, Point::new(2.0, 50.0), Modifiers::NONE);
    assert_eq!(handle.zone, Zone::ResizeHandle(ResizeHandle::LEFT));
}
