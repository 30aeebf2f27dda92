//! Per-view pointer manipulation state machine.
//!
//! ```text
//! Idle ──down──▶ Pointing ──move past threshold──▶ Manipulating(kind)
//!   ▲               │ up (click)                       │ up (commit)
//!   └───────────────┴──────── Cancelled / Committed ◀──┘
//! ```
//!
//! Pointer deltas accumulate onto a working rect or point. Nothing is
//! written to the composition until the definitive pointer-up, where the
//! commit runs inside a named transaction.

use std::time::Instant;

use log::{debug, trace, warn};

use crate::config::EditorConfig;
use crate::error::ComposerError;
use crate::geometry::{Point, Rect, Vector};
use crate::grid::Snapper;
use crate::hit_test::{objects_in_selection_box, GeometrySurface};
use crate::notify::Notifications;
use crate::operations::Operations;
use crate::router::{
    ClickCommand, CursorHint, ManipulationKind, Modifiers, PointerInputRouter, TentativeAction,
};
use crate::scroll::AutoScroller;
use crate::selection::SelectionManager;
use crate::transaction::TransactionBoundary;
use crate::validation::LinkValidator;
use crate::view::{Composition, ObjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManipulationState {
    #[default]
    Idle,
    /// Pressed, still within the click threshold.
    Pointing,
    Manipulating(ManipulationKind),
}

/// What a pointer event resulted in.
#[derive(Debug, Clone, PartialEq)]
pub enum ManipulationOutcome {
    /// Nothing to do (hover, or an event without a pressed button).
    Ignored,
    Pointing,
    Dragging(ManipulationKind),
    /// Released without dragging; `command` was dispatched for `object`.
    Clicked {
        object: Option<ObjectId>,
        command: ClickCommand,
    },
    Committed {
        kind: ManipulationKind,
        version: u64,
    },
    /// The commit was rejected and rolled back.
    Failed(String),
    Cancelled,
}

/// Live feedback while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Preview {
    Rect { object: ObjectId, rect: Rect },
    Point { object: ObjectId, point: Point },
    SelectBox(Rect),
}

/// Borrowed editor state a pointer event works on.
pub struct Collaborators<'a> {
    pub composition: &'a mut Composition,
    pub selection: &'a mut SelectionManager,
    pub router: &'a mut PointerInputRouter,
    pub notifications: &'a mut Notifications,
    pub transactions: &'a mut dyn TransactionBoundary,
    pub scroller: &'a mut AutoScroller,
    pub validator: &'a dyn LinkValidator,
    pub geometry: &'a dyn GeometrySurface,
    pub config: &'a EditorConfig,
}

impl Collaborators<'_> {
    fn sync_selection(&mut self) {
        self.selection.apply_to_view(&mut self.composition.view);
    }
}

/// Manipulation in progress for one view.
#[derive(Debug, Clone, Default)]
pub struct ManipulationContext {
    state: ManipulationState,
    object: Option<ObjectId>,
    action: Option<TentativeAction>,
    modifiers: Modifiers,
    /// Press and last pointer positions, view coordinates.
    press: Point,
    last: Point,
    /// Object bounds at press time.
    start_rect: Rect,
    /// Pointer position at press time, world coordinates.
    start_point: Point,
    /// Accumulated world-space drag.
    accumulated: Vector,
    /// Set once the pointer left the click threshold.
    travelled: bool,
}

impl ManipulationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ManipulationState {
        self.state
    }

    pub fn is_manipulating(&self) -> bool {
        matches!(self.state, ManipulationState::Manipulating(_))
    }

    pub fn object(&self) -> Option<ObjectId> {
        self.object
    }

    /// Working rect: start bounds shifted by the accumulated drag.
    pub fn working_rect(&self) -> Rect {
        self.start_rect.translate(self.accumulated)
    }

    /// Working point: the pointer in world coordinates.
    pub fn working_point(&self) -> Point {
        self.start_point + self.accumulated
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drops a manipulation whose object has disappeared. Returns whether
    /// anything was cancelled.
    pub fn refresh(&mut self, collab: &mut Collaborators) -> bool {
        if collab.selection.prune(&collab.composition.view) > 0 {
            collab.sync_selection();
        }
        let stale = self
            .object
            .is_some_and(|id| !collab.composition.view.contains(id));
        if self.state == ManipulationState::Idle || !stale {
            return false;
        }
        debug!(object_id = self.object.unwrap_or_default(); "Manipulated object vanished, returning to idle");
        self.abort(collab);
        true
    }

    /// Aborts any manipulation in flight (Escape).
    pub fn cancel(&mut self, collab: &mut Collaborators) -> ManipulationOutcome {
        if self.state == ManipulationState::Idle {
            return ManipulationOutcome::Ignored;
        }
        debug!(state:? = self.state; "Manipulation cancelled");
        self.abort(collab);
        ManipulationOutcome::Cancelled
    }

    fn abort(&mut self, collab: &mut Collaborators) {
        self.reset();
        collab.scroller.reset();
        collab.router.invalidate();
        collab.notifications.emit_cursor(CursorHint::Default);
    }

    pub fn pointer_down(
        &mut self,
        collab: &mut Collaborators,
        position: Point,
        modifiers: Modifiers,
    ) -> ManipulationOutcome {
        self.refresh(collab);
        if self.state != ManipulationState::Idle {
            self.abort(collab);
        }

        let pointed = collab.router.determine_pointed_visual(
            collab.composition,
            collab.geometry,
            position,
            modifiers,
            false,
            collab.notifications,
        );

        let start_point = collab.geometry.to_world(position);
        self.state = ManipulationState::Pointing;
        self.object = pointed.object;
        self.action = Some(pointed.action);
        self.modifiers = modifiers;
        self.press = position;
        self.last = position;
        self.start_point = start_point;
        self.accumulated = Vector::ZERO;
        self.travelled = false;
        self.start_rect = pointed
            .object
            .and_then(|id| collab.composition.view.bounds(id))
            .unwrap_or(Rect::new(start_point.x, start_point.y, 0.0, 0.0));

        if let Some(id) = pointed.object {
            collab.selection.handle_press(id, modifiers.toggles_selection());
            collab.sync_selection();
        }
        trace!(object:? = pointed.object, zone:? = pointed.zone; "Pointer down");
        ManipulationOutcome::Pointing
    }

    /// Non-definitive pointer move. `now` drives the auto-scroll throttle.
    pub fn pointer_move(
        &mut self,
        collab: &mut Collaborators,
        position: Point,
        modifiers: Modifiers,
        now: Instant,
    ) -> ManipulationOutcome {
        if self.refresh(collab) {
            return ManipulationOutcome::Cancelled;
        }
        match self.state {
            ManipulationState::Idle => {
                collab.router.determine_pointed_visual(
                    collab.composition,
                    collab.geometry,
                    position,
                    modifiers,
                    false,
                    collab.notifications,
                );
                ManipulationOutcome::Ignored
            }
            ManipulationState::Pointing => {
                self.track(collab, position, modifiers);
                let threshold = collab.config.manipulation().click_threshold();
                self.travelled |= position.distance(self.press) > threshold;
                let drag = self.action.and_then(|a| a.drag);
                match drag {
                    Some(kind) if self.travelled => {
                        self.state = ManipulationState::Manipulating(kind);
                        debug!(object:? = self.object, kind:? = kind; "Manipulation started");
                        ManipulationOutcome::Dragging(kind)
                    }
                    _ => ManipulationOutcome::Pointing,
                }
            }
            ManipulationState::Manipulating(kind) => {
                self.track(collab, position, modifiers);
                if let Some(delta) = collab.scroller.tick(position, now) {
                    collab.notifications.emit_scroll(delta);
                }
                ManipulationOutcome::Dragging(kind)
            }
        }
    }

    fn track(&mut self, collab: &Collaborators, position: Point, modifiers: Modifiers) {
        let scale = collab.geometry.display_scale();
        let delta = position - self.last;
        self.accumulated += Vector::new(delta.dx / scale, delta.dy / scale);
        self.last = position;
        self.modifiers = modifiers;
    }

    /// Definitive pointer release: a click or a commit.
    pub fn pointer_up(
        &mut self,
        collab: &mut Collaborators,
        position: Point,
        modifiers: Modifiers,
    ) -> ManipulationOutcome {
        if self.refresh(collab) {
            return ManipulationOutcome::Cancelled;
        }
        let outcome = match self.state {
            ManipulationState::Idle => return ManipulationOutcome::Ignored,
            ManipulationState::Pointing => {
                self.track(collab, position, modifiers);
                self.click(collab, position)
            }
            ManipulationState::Manipulating(kind) => {
                self.track(collab, position, modifiers);
                self.commit(collab, kind)
            }
        };
        self.reset();
        collab.scroller.reset();
        collab.router.invalidate();
        outcome
    }

    fn click(&mut self, collab: &mut Collaborators, position: Point) -> ManipulationOutcome {
        let threshold = collab.config.manipulation().click_threshold();
        if self.travelled || position.distance(self.press) > threshold {
            trace!(object:? = self.object; "Press travelled without a manipulation");
            return ManipulationOutcome::Cancelled;
        }
        let toggle = self.modifiers.toggles_selection();
        let world = collab.geometry.to_world(position);
        let under = collab.geometry.hit_test(collab.composition, world);

        match self.object {
            None => {
                if !toggle {
                    collab.selection.clear();
                    collab.sync_selection();
                }
                ManipulationOutcome::Clicked {
                    object: None,
                    command: ClickCommand::Select,
                }
            }
            Some(id) if under == Some(id) => {
                // The press already toggled; a plain click collapses the group.
                if !toggle {
                    collab.selection.handle_interaction(id, false);
                    collab.sync_selection();
                }
                let command = self
                    .action
                    .map(|a| a.click)
                    .unwrap_or(ClickCommand::Select);
                if command.is_external() {
                    collab.notifications.emit_command(command, id);
                }
                debug!(object_id = id, command:? = command; "Click dispatched");
                ManipulationOutcome::Clicked {
                    object: Some(id),
                    command,
                }
            }
            Some(_) => ManipulationOutcome::Cancelled,
        }
    }

    fn commit(&mut self, collab: &mut Collaborators, kind: ManipulationKind) -> ManipulationOutcome {
        if kind == ManipulationKind::SelectBox {
            let area = Rect::from_corners(self.start_point, self.working_point());
            let ids = objects_in_selection_box(collab.composition, &area);
            debug!(count = ids.len(); "Box selection");
            collab.selection.replace_selection(ids);
            collab.sync_selection();
            return ManipulationOutcome::Committed {
                kind,
                version: collab.composition.view.version(),
            };
        }

        let Some(object) = self.object else {
            return ManipulationOutcome::Cancelled;
        };
        let config = collab.config;
        let ops = Operations::new(
            collab.geometry,
            config.manipulation(),
            Snapper::from_config(config.grid()),
        );

        collab
            .transactions
            .start_command_variation(kind.name(), collab.composition);
        let result: Result<bool, ComposerError> = match kind {
            ManipulationKind::Move => ops
                .commit_move(
                    collab.composition,
                    object,
                    self.working_rect(),
                    collab.selection,
                    self.modifiers,
                )
                .map(|moved| !moved.is_empty()),
            ManipulationKind::Resize { handle, symmetric } => {
                let rect = ops.resized_rect(
                    collab.composition,
                    object,
                    self.start_rect,
                    self.accumulated,
                    handle,
                    symmetric,
                    true,
                );
                ops.commit_resize(collab.composition, object, rect)
            }
            ManipulationKind::Displace => ops
                .commit_displace(collab.composition, object, self.working_point())
                .map(|_| true),
            ManipulationKind::Relink => ops
                .commit_relink(
                    collab.composition,
                    collab.validator,
                    object,
                    self.working_point(),
                )
                .map(|relinked| relinked.is_some()),
            ManipulationKind::SelectBox => Ok(false),
        };

        match result {
            Ok(true) => {
                collab.transactions.complete_command_variation();
                let version = collab.composition.view.bump_version();
                collab.notifications.emit_version(version);
                ManipulationOutcome::Committed { kind, version }
            }
            Ok(false) => {
                collab.transactions.discard_command_variation(collab.composition);
                ManipulationOutcome::Cancelled
            }
            Err(error) => {
                collab.transactions.discard_command_variation(collab.composition);
                let message = error.to_string();
                warn!(object_id = object, kind = kind.name(), error = message.as_str(); "Manipulation rejected");
                collab.notifications.emit_message(&message);
                ManipulationOutcome::Failed(message)
            }
        }
    }

    /// Working geometry of the manipulation in progress.
    pub fn preview(
        &self,
        composition: &Composition,
        geometry: &dyn GeometrySurface,
        config: &EditorConfig,
    ) -> Option<Preview> {
        let ManipulationState::Manipulating(kind) = self.state else {
            return None;
        };
        if kind == ManipulationKind::SelectBox {
            return Some(Preview::SelectBox(Rect::from_corners(
                self.start_point,
                self.working_point(),
            )));
        }
        let object = self.object?;
        let preview = match kind {
            ManipulationKind::Move => Preview::Rect {
                object,
                rect: self.working_rect(),
            },
            ManipulationKind::Resize { handle, symmetric } => {
                let ops = Operations::new(
                    geometry,
                    config.manipulation(),
                    Snapper::from_config(config.grid()),
                );
                Preview::Rect {
                    object,
                    rect: ops.resized_rect(
                        composition,
                        object,
                        self.start_rect,
                        self.accumulated,
                        handle,
                        symmetric,
                        false,
                    ),
                }
            }
            ManipulationKind::Displace | ManipulationKind::Relink | ManipulationKind::SelectBox => {
                Preview::Point {
                    object,
                    point: self.working_point(),
                }
            }
        };
        Some(preview)
    }
}
