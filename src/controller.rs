//! High-level controller binding an [`Editor`] to a Slint UI.
//!
//! The [`EditorController`] is a cheap, cloneable handle. Its callback
//! factories return closures that can be handed straight to generated Slint
//! `on_*` setters.
//!
//! # Example
//!
//! ```ignore
//! use symbol_composer::{EditorController, Editor};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = EditorController::new(Editor::new(composition, config));
//!
//!     window.on_pointer_down(ctrl.pointer_down_callback());
//!     window.on_pointer_move(ctrl.pointer_move_callback());
//!     window.on_pointer_up(ctrl.pointer_up_callback());
//!     window.on_compute_connector_path(ctrl.compute_connector_path());
//!     window.set_selection(ctrl.selection_model().into());
//!
//!     ctrl.with(|editor| {
//!         let w = window.as_weak();
//!         editor.notifications_mut().on_status(move |text| {
//!             if let Some(w) = w.upgrade() {
//!                 w.set_status(text.clone());
//!             }
//!         });
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use log::trace;
use slint::{SharedString, VecModel};

use crate::editor::Editor;
use crate::geometry::{Point, Rect, Vector};
use crate::manipulation::ManipulationOutcome;
use crate::router::Modifiers;
use crate::view::ObjectId;

/// Shared handle to an editor plus the Slint model mirroring its selection.
///
/// UI callbacks may re-enter the controller (a notification handler that
/// triggers another event, say). Such nested calls find the editor already
/// borrowed and are dropped, never queued.
#[derive(Clone)]
pub struct EditorController {
    editor: Rc<RefCell<Editor>>,
    selection: Rc<VecModel<ObjectId>>,
}

impl EditorController {
    pub fn new(editor: Editor) -> Self {
        let selection = Rc::new(VecModel::default());
        editor.selection().sync_to_model(&selection);
        Self {
            editor: Rc::new(RefCell::new(editor)),
            selection,
        }
    }

    /// Runs `f` on the editor, or returns `None` when it is busy.
    pub fn with<R>(&self, f: impl FnOnce(&mut Editor) -> R) -> Option<R> {
        let Ok(mut editor) = self.editor.try_borrow_mut() else {
            trace!("Re-entrant editor call coalesced");
            return None;
        };
        let result = f(&mut editor);
        editor.selection().sync_to_model(&self.selection);
        Some(result)
    }

    /// Selected object ids, kept in sync after every call.
    pub fn selection_model(&self) -> Rc<VecModel<ObjectId>> {
        self.selection.clone()
    }

    pub fn status_text(&self) -> SharedString {
        self.editor
            .try_borrow()
            .map(|editor| editor.status_text())
            .unwrap_or_default()
    }

    // === Callback factories ===

    /// Returns a callback for `pointer-down(x, y, ctrl, shift, alt)`.
    pub fn pointer_down_callback(&self) -> impl Fn(f32, f32, bool, bool, bool) {
        let ctrl = self.clone();
        move |x, y, c, s, a| {
            ctrl.pointer_down(x, y, Modifiers { ctrl: c, shift: s, alt: a });
        }
    }

    /// Returns a callback for `pointer-move(x, y, ctrl, shift, alt)`.
    pub fn pointer_move_callback(&self) -> impl Fn(f32, f32, bool, bool, bool) {
        let ctrl = self.clone();
        move |x, y, c, s, a| {
            ctrl.pointer_move(x, y, Modifiers { ctrl: c, shift: s, alt: a });
        }
    }

    /// Returns a callback for `pointer-up(x, y, ctrl, shift, alt)`.
    pub fn pointer_up_callback(&self) -> impl Fn(f32, f32, bool, bool, bool) {
        let ctrl = self.clone();
        move |x, y, c, s, a| {
            ctrl.pointer_up(x, y, Modifiers { ctrl: c, shift: s, alt: a });
        }
    }

    /// Returns a callback for `compute-connector-path(id, version)`.
    ///
    /// The version argument only makes Slint re-evaluate the binding after
    /// a commit; the path is always computed from the current state.
    pub fn compute_connector_path(&self) -> impl Fn(ObjectId, i32) -> SharedString {
        let editor = self.editor.clone();
        move |connector, _version| {
            editor
                .try_borrow()
                .ok()
                .and_then(|editor| editor.connector_path(connector))
                .unwrap_or_default()
                .into()
        }
    }

    // === Direct handlers ===

    pub fn pointer_down(&self, x: f32, y: f32, modifiers: Modifiers) -> Option<ManipulationOutcome> {
        self.with(|editor| editor.pointer_down(Point::new(x, y), modifiers))
    }

    pub fn pointer_move(&self, x: f32, y: f32, modifiers: Modifiers) -> Option<ManipulationOutcome> {
        self.with(|editor| editor.pointer_move(Point::new(x, y), modifiers))
    }

    pub fn pointer_up(&self, x: f32, y: f32, modifiers: Modifiers) -> Option<ManipulationOutcome> {
        self.with(|editor| editor.pointer_up(Point::new(x, y), modifiers))
    }

    /// Escape.
    pub fn cancel(&self) -> Option<ManipulationOutcome> {
        self.with(|editor| editor.cancel())
    }

    /// Arrow keys. Failures are reported through the message notification.
    pub fn nudge(&self, dx: f32, dy: f32) {
        self.with(|editor| editor.nudge(Vector::new(dx, dy)).ok());
    }

    /// Delete key.
    pub fn delete_selection(&self) -> Vec<ObjectId> {
        self.with(|editor| editor.delete_selection().unwrap_or_default())
            .unwrap_or_default()
    }

    pub fn undo(&self) -> bool {
        self.with(|editor| editor.undo()).unwrap_or(false)
    }

    /// Visible area in view coordinates, used for auto-scrolling.
    pub fn set_viewport(&self, x: f32, y: f32, width: f32, height: f32) {
        self.with(|editor| editor.set_viewport(Some(Rect::new(x, y, width, height))));
    }
}
