//! Pointer input routing: which zone of which object lies under the
//! pointer, and what pressing there would do.
//!
//! The router never mutates geometry. Its only side effects go through
//! [`Notifications`]: the assistance text and the cursor shape.

use log::trace;

use crate::config::ManipulationConfig;
use crate::geometry::{Axis, Point, Rect};
use crate::hit_test::GeometrySurface;
use crate::notify::Notifications;
use crate::path::self_reference_point;
use crate::view::{Composition, ConnectorData, ObjectId, VisualKind, VisualObject};

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    /// Ctrl or Shift: clicks toggle selection membership.
    pub fn toggles_selection(&self) -> bool {
        self.ctrl || self.shift
    }
}

/// Resize handle identified by the direction it pulls in: `-1`, `0` or `1`
/// on each axis. Corner handles are non-zero on both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeHandle {
    pub horizontal: i8,
    pub vertical: i8,
}

impl ResizeHandle {
    pub const TOP_LEFT: ResizeHandle = ResizeHandle::new(-1, -1);
    pub const TOP: ResizeHandle = ResizeHandle::new(0, -1);
    pub const TOP_RIGHT: ResizeHandle = ResizeHandle::new(1, -1);
    pub const RIGHT: ResizeHandle = ResizeHandle::new(1, 0);
    pub const BOTTOM_RIGHT: ResizeHandle = ResizeHandle::new(1, 1);
    pub const BOTTOM: ResizeHandle = ResizeHandle::new(0, 1);
    pub const BOTTOM_LEFT: ResizeHandle = ResizeHandle::new(-1, 1);
    pub const LEFT: ResizeHandle = ResizeHandle::new(-1, 0);

    /// Corners first so they win where they overlap edge handles.
    pub const ALL: [ResizeHandle; 8] = [
        Self::TOP_LEFT,
        Self::TOP_RIGHT,
        Self::BOTTOM_RIGHT,
        Self::BOTTOM_LEFT,
        Self::TOP,
        Self::RIGHT,
        Self::BOTTOM,
        Self::LEFT,
    ];

    pub const fn new(horizontal: i8, vertical: i8) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn direction(self, axis: Axis) -> i8 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn frees(self, axis: Axis) -> bool {
        self.direction(axis) != 0
    }

    /// Whether this handle is offered on `bounds` with handles of `size`.
    ///
    /// An edge handle needs an edge at least three handles long. Corners
    /// need one such edge, except the bottom-right corner, which small
    /// symbols keep so they stay resizable.
    pub fn fits(self, bounds: &Rect, size: f32) -> bool {
        let wide = bounds.width >= size * 3.0;
        let tall = bounds.height >= size * 3.0;
        match (self.horizontal, self.vertical) {
            (0, _) => wide,
            (_, 0) => tall,
            _ => wide || tall || self == Self::BOTTOM_RIGHT,
        }
    }

    /// Square handle area inside `bounds`.
    pub fn area(self, bounds: &Rect, size: f32) -> Rect {
        let place = |direction: i8, start: f32, extent: f32| match direction {
            -1 => start,
            1 => start + extent - size,
            _ => start + (extent - size) * 0.5,
        };
        Rect::new(
            place(self.horizontal, bounds.x, bounds.width),
            place(self.vertical, bounds.y, bounds.height),
            size,
            size,
        )
    }

    pub fn cursor(self) -> CursorHint {
        match (self.horizontal, self.vertical) {
            (_, 0) => CursorHint::ResizeHorizontal,
            (0, _) => CursorHint::ResizeVertical,
            (h, v) if h == v => CursorHint::ResizeNwSe,
            _ => CursorHint::ResizeNeSw,
        }
    }
}

/// Auxiliary buttons along the bottom edge of a symbol, right to left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxiliaryAction {
    SwitchDetails,
    SwitchRelated,
    ShowComposite,
    AddDetail,
}

impl AuxiliaryAction {
    pub const ALL: [AuxiliaryAction; 4] = [
        AuxiliaryAction::SwitchDetails,
        AuxiliaryAction::SwitchRelated,
        AuxiliaryAction::ShowComposite,
        AuxiliaryAction::AddDetail,
    ];

    pub fn command(self) -> ClickCommand {
        match self {
            AuxiliaryAction::SwitchDetails => ClickCommand::SwitchDetails,
            AuxiliaryAction::SwitchRelated => ClickCommand::SwitchRelated,
            AuxiliaryAction::ShowComposite => ClickCommand::ShowComposite,
            AuxiliaryAction::AddDetail => ClickCommand::AddDetail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    ResizeHandle(ResizeHandle),
    MovePanel,
    /// Dedicated edit sub-zone of a symbol.
    Headline,
    ActionButton(AuxiliaryAction),
    Body,
    ConnectorIdeaEnd,
    ConnectorWaypoint,
    ConnectorBody,
    Background,
}

/// Geometric manipulation a drag would start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulationKind {
    Move,
    Resize {
        handle: ResizeHandle,
        symmetric: bool,
    },
    Displace,
    Relink,
    SelectBox,
}

impl ManipulationKind {
    /// Transaction name used when committing.
    pub fn name(&self) -> &'static str {
        match self {
            ManipulationKind::Move => "Move",
            ManipulationKind::Resize { .. } => "Resize",
            ManipulationKind::Displace => "Displace",
            ManipulationKind::Relink => "Relink",
            ManipulationKind::SelectBox => "Select",
        }
    }
}

/// Command dispatched when a press is released without dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickCommand {
    EditInPlace,
    EditName,
    SwitchDetails,
    SwitchRelated,
    ShowComposite,
    AddDetail,
    GoToShortcut,
    Select,
}

impl ClickCommand {
    /// Whether the command is carried out by the host (everything except
    /// plain selection).
    pub fn is_external(self) -> bool {
        self != ClickCommand::Select
    }
}

/// What a press at the pointed position would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TentativeAction {
    pub drag: Option<ManipulationKind>,
    pub click: ClickCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Move,
    ResizeHorizontal,
    ResizeVertical,
    ResizeNwSe,
    ResizeNeSw,
    /// Clickable command.
    Hand,
    /// Relink target selection.
    Crosshair,
    Text,
    NotAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointedVisual {
    pub object: Option<ObjectId>,
    pub zone: Zone,
    pub action: TentativeAction,
    pub cursor: CursorHint,
    pub status: &'static str,
}

impl PointedVisual {
    fn background() -> Self {
        Self {
            object: None,
            zone: Zone::Background,
            action: TentativeAction {
                drag: Some(ManipulationKind::SelectBox),
                click: ClickCommand::Select,
            },
            cursor: CursorHint::Default,
            status: "Drag to select an area",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedPointing {
    position: Point,
    modifiers: Modifiers,
    version: u64,
    result: PointedVisual,
}

/// Per-view zone classifier with a one-entry cache.
#[derive(Debug, Clone)]
pub struct PointerInputRouter {
    config: ManipulationConfig,
    cache: Option<CachedPointing>,
}

impl PointerInputRouter {
    pub fn new(config: ManipulationConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Last classification, if any.
    pub fn cached(&self) -> Option<PointedVisual> {
        self.cache.map(|c| c.result)
    }

    /// Classifies the pointer position (view coordinates).
    ///
    /// Unchanged position, modifiers and view version return the cached
    /// result; so does any call while `manipulating` is set.
    pub fn determine_pointed_visual(
        &mut self,
        composition: &Composition,
        geometry: &dyn GeometrySurface,
        position: Point,
        modifiers: Modifiers,
        manipulating: bool,
        notifications: &mut Notifications,
    ) -> PointedVisual {
        if let Some(cached) = self.cache {
            let unchanged = cached.position == position
                && cached.modifiers == modifiers
                && cached.version == composition.view.version();
            if manipulating || unchanged {
                trace!(x = position.x, y = position.y; "Pointed visual served from cache");
                return cached.result;
            }
        }

        let result = self.classify(composition, geometry, position, modifiers);
        notifications.emit_status(result.status);
        notifications.emit_cursor(result.cursor);
        self.cache = Some(CachedPointing {
            position,
            modifiers,
            version: composition.view.version(),
            result,
        });
        result
    }

    fn classify(
        &self,
        composition: &Composition,
        geometry: &dyn GeometrySurface,
        position: Point,
        modifiers: Modifiers,
    ) -> PointedVisual {
        let world = geometry.to_world(position);
        let Some(id) = geometry.hit_test(composition, world) else {
            return PointedVisual::background();
        };
        let Some(object) = composition.view.get(id) else {
            return PointedVisual::background();
        };
        // Tolerances are configured in view units.
        let unit = 1.0 / geometry.display_scale();

        let pointed = match &object.kind {
            VisualKind::Connector(data) => self.classify_connector(composition, object, data, world, unit),
            VisualKind::Symbol(_) | VisualKind::Complement(_) => {
                self.classify_body(composition, object, world, modifiers, unit)
            }
        };
        PointedVisual {
            object: Some(id),
            ..pointed
        }
    }

    fn classify_body(
        &self,
        composition: &Composition,
        object: &VisualObject,
        at: Point,
        modifiers: Modifiers,
        unit: f32,
    ) -> PointedVisual {
        let bounds = object.bounds;
        let definition = composition.symbol_definition(object.id);
        let is_symbol = object.as_symbol().is_some();
        let capabilities = object.capabilities();
        let toggling = modifiers.toggles_selection();

        if object.locked {
            return pointed(
                Zone::Body,
                None,
                ClickCommand::Select,
                CursorHint::NotAllowed,
                "Locked: cannot be moved or resized",
            );
        }

        // Resize handles.
        if capabilities.can_resize {
            let (fixed_width, fixed_height) = definition
                .map(|d| (d.fixed_width, d.fixed_height))
                .unwrap_or((false, false));
            let size = self.config.handle_size() * unit;
            for handle in ResizeHandle::ALL {
                let free_horizontal = handle.frees(Axis::Horizontal) && !fixed_width;
                let free_vertical = handle.frees(Axis::Vertical) && !fixed_height;
                if (!free_horizontal && !free_vertical) || !handle.fits(&bounds, size) {
                    continue;
                }
                if handle.area(&bounds, size).contains(at) {
                    return pointed(
                        Zone::ResizeHandle(handle),
                        Some(ManipulationKind::Resize {
                            handle,
                            symmetric: modifiers.alt,
                        }),
                        ClickCommand::Select,
                        handle.cursor(),
                        if modifiers.alt {
                            "Drag to resize symmetrically"
                        } else {
                            "Drag to resize (Alt: symmetric)"
                        },
                    );
                }
            }
        }

        let movable = capabilities.can_move;
        let drag = movable.then_some(ManipulationKind::Move);

        // Move panel along the border.
        let panel = self.config.move_panel_width() * unit;
        if movable && !bounds.inflate(-panel).contains(at) {
            return pointed(
                Zone::MovePanel,
                drag,
                ClickCommand::Select,
                CursorHint::Move,
                "Drag to move (Ctrl: with outgoing, Shift: with incoming)",
            );
        }

        let editable = definition.is_some_and(|d| d.in_place_editable);

        // Headline.
        let headline = Rect::new(bounds.x, bounds.y, bounds.width, self.config.headline_height() * unit);
        if is_symbol && editable && headline.contains(at) {
            return if toggling {
                pointed(Zone::Headline, drag, ClickCommand::Select, CursorHint::Move, "Click to toggle selection")
            } else {
                pointed(Zone::Headline, drag, ClickCommand::EditName, CursorHint::Text, "Click to edit the name")
            };
        }

        // Auxiliary action buttons, right to left along the bottom edge.
        if is_symbol {
            let button = self.config.action_button_size() * unit;
            let fits = bounds.width >= button * AuxiliaryAction::ALL.len() as f32 + panel * 2.0
                && bounds.height >= headline.height + button + panel;
            if fits {
                for (i, action) in AuxiliaryAction::ALL.into_iter().enumerate() {
                    let area = Rect::new(
                        bounds.right() - panel - button * (i as f32 + 1.0),
                        bounds.bottom() - panel - button,
                        button,
                        button,
                    );
                    if area.contains(at) {
                        return pointed(
                            Zone::ActionButton(action),
                            drag,
                            action.command(),
                            CursorHint::Hand,
                            action_status(action),
                        );
                    }
                }
            }
        }

        // Default: edit-in-place, go to the main symbol, or just move.
        let shortcut = object.as_symbol().is_some_and(|s| s.shortcut);
        let is_complement = object.as_complement().is_some();
        if !toggling && shortcut {
            pointed(Zone::Body, drag, ClickCommand::GoToShortcut, CursorHint::Hand, "Click to go to the original symbol")
        } else if !toggling && (editable || is_complement) {
            pointed(Zone::Body, drag, ClickCommand::EditInPlace, CursorHint::Text, "Click to edit, drag to move")
        } else if toggling {
            pointed(Zone::Body, drag, ClickCommand::Select, CursorHint::Move, "Click to toggle selection")
        } else {
            pointed(Zone::Body, drag, ClickCommand::Select, CursorHint::Move, "Drag to move")
        }
    }

    fn classify_connector(
        &self,
        composition: &Composition,
        object: &VisualObject,
        data: &ConnectorData,
        at: Point,
        unit: f32,
    ) -> PointedVisual {
        if object.locked {
            return pointed(
                Zone::ConnectorBody,
                None,
                ClickCommand::Select,
                CursorHint::NotAllowed,
                "Locked: cannot be rerouted",
            );
        }

        let reach = self.config.handle_size() * unit;
        let idea_end = data.edge_at(data.idea_end);
        if at.distance(idea_end) <= reach {
            return pointed(
                Zone::ConnectorIdeaEnd,
                Some(ManipulationKind::Relink),
                ClickCommand::Select,
                CursorHint::Crosshair,
                "Drag onto another symbol to relink",
            );
        }

        let waypoint_handle = match data.waypoint {
            Some(waypoint) => waypoint,
            None if data.is_self_reference() => {
                let bounds = composition.view.bounds(data.origin).unwrap_or_default();
                self_reference_point(&bounds, self.config.self_reference_offset())
            }
            None => data.midpoint(),
        };
        if at.distance(waypoint_handle) <= reach {
            return pointed(
                Zone::ConnectorWaypoint,
                Some(ManipulationKind::Displace),
                ClickCommand::Select,
                CursorHint::Move,
                "Drag to reroute the connector",
            );
        }

        pointed(
            Zone::ConnectorBody,
            None,
            ClickCommand::Select,
            CursorHint::Hand,
            "Click to select the connector",
        )
    }
}

fn pointed(
    zone: Zone,
    drag: Option<ManipulationKind>,
    click: ClickCommand,
    cursor: CursorHint,
    status: &'static str,
) -> PointedVisual {
    PointedVisual {
        object: None,
        zone,
        action: TentativeAction { drag, click },
        cursor,
        status,
    }
}

fn action_status(action: AuxiliaryAction) -> &'static str {
    match action {
        AuxiliaryAction::SwitchDetails => "Click to show or hide details",
        AuxiliaryAction::SwitchRelated => "Click to show or hide related ideas",
        AuxiliaryAction::ShowComposite => "Click to open the composite view",
        AuxiliaryAction::AddDetail => "Click to add a detail",
    }
}
