//! Placement of auto-created dependents.
//!
//! Given a base symbol and a positioning mode, [`AutoLayoutPositioner`]
//! computes where a new dependent concept (and the relationship symbol that
//! connects it) should go. It is a local greedy heuristic: unrelated
//! symbols are never moved, so dense diagrams may still overlap.

use log::debug;

use crate::error::ComposerError;
use crate::geometry::{Axis, Point, Quadrant, Rect, Size};
use crate::topology::{connectors_of, neighbors};
use crate::view::{Composition, ObjectId};

/// Distance lost per existing connection when radialized.
pub const RADIAL_COMPACTION_PER_CONNECTION: f32 = 6.0;
/// Radial compaction never removes more than this share of the distance.
pub const RADIAL_COMPACTION_MAX_RATIO: f32 = 0.75;
/// Share of the new symbol's size added to the distance on a vertical
/// locating axis (leaves room for labels).
pub const VERTICAL_SIZE_FACTOR: f32 = 1.5;
pub const HORIZONTAL_SIZE_FACTOR: f32 = 0.5;
/// Sibling stacking offset, as a share of the new symbol's size.
pub const VERTICAL_STACK_FACTOR: f32 = 1.5;
pub const HORIZONTAL_STACK_FACTOR: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositioningMode {
    ToTop,
    #[default]
    ToBottom,
    ToLeft,
    ToRight,
    VerticalAlternated,
    HorizontalAlternated,
    /// Pick a free quadrant from the existing connections.
    Automatic,
}

impl PositioningMode {
    /// Axis along which the dependent is pushed away from the base.
    pub fn locating_axis(self) -> Axis {
        match self {
            PositioningMode::VerticalAlternated
            | PositioningMode::ToLeft
            | PositioningMode::ToRight => Axis::Horizontal,
            _ => Axis::Vertical,
        }
    }

    pub fn is_alternated(self) -> bool {
        matches!(
            self,
            PositioningMode::VerticalAlternated | PositioningMode::HorizontalAlternated
        )
    }
}

/// Which side of the base the dependent goes to along the locating axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

impl Side {
    fn sign(self) -> f32 {
        match self {
            Side::Before => -1.0,
            Side::After => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    pub base: ObjectId,
    pub mode: PositioningMode,
    pub radialized: bool,
    pub relationship_size: Size,
    pub new_size: Size,
}

/// Computed centers for the dependent and its connecting relationship.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Point,
    pub relationship_center: Point,
    pub side: Side,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoLayoutPositioner;

impl AutoLayoutPositioner {
    pub fn new() -> Self {
        Self
    }

    pub fn place(
        &self,
        composition: &Composition,
        request: &PlacementRequest,
    ) -> Result<Placement, ComposerError> {
        let view = &composition.view;
        let base_symbol = view
            .symbol(request.base)
            .ok_or(ComposerError::NotASymbol(request.base))?;
        let base = view
            .bounds(request.base)
            .ok_or(ComposerError::StaleReference(request.base))?;
        let connection_count = base_symbol.connection_count();

        let linear = |mode| self.place_linear(composition, request, &base, mode, connection_count);
        let placement = match request.mode {
            PositioningMode::Automatic => match self.free_quadrant(composition, request.base, &base) {
                Quadrant::Up => linear(PositioningMode::ToTop),
                Quadrant::Down | Quadrant::Inside => linear(PositioningMode::ToBottom),
                Quadrant::Left => linear(PositioningMode::ToLeft),
                Quadrant::Right => linear(PositioningMode::ToRight),
                diagonal => self.place_diagonal(request, &base, diagonal, connection_count),
            },
            mode => linear(mode),
        };

        debug!(
            base = request.base,
            x = placement.center.x,
            y = placement.center.y,
            connections = connection_count;
            "Dependent placement computed"
        );
        Ok(placement)
    }

    /// Center-to-center distance along `axis`, radially compacted if asked.
    pub fn distance(
        &self,
        axis: Axis,
        base: Size,
        relationship: Size,
        new: Size,
        radialized: bool,
        connection_count: usize,
    ) -> f32 {
        let factor = match axis {
            Axis::Vertical => VERTICAL_SIZE_FACTOR,
            Axis::Horizontal => HORIZONTAL_SIZE_FACTOR,
        };
        let distance = base.along(axis) + relationship.along(axis) + factor * new.along(axis);
        if radialized {
            let compaction = (connection_count as f32 * RADIAL_COMPACTION_PER_CONNECTION)
                .min(distance * RADIAL_COMPACTION_MAX_RATIO);
            distance - compaction
        } else {
            distance
        }
    }

    /// Side for the mode; alternated modes use the parity of the base's
    /// connection count (even goes before).
    pub fn side(&self, mode: PositioningMode, connection_count: usize) -> Side {
        match mode {
            PositioningMode::ToTop | PositioningMode::ToLeft => Side::Before,
            PositioningMode::ToBottom | PositioningMode::ToRight | PositioningMode::Automatic => {
                Side::After
            }
            PositioningMode::VerticalAlternated | PositioningMode::HorizontalAlternated => {
                if connection_count % 2 == 0 {
                    Side::Before
                } else {
                    Side::After
                }
            }
        }
    }

    fn place_linear(
        &self,
        composition: &Composition,
        request: &PlacementRequest,
        base: &Rect,
        mode: PositioningMode,
        connection_count: usize,
    ) -> Placement {
        let axis = mode.locating_axis();
        let variating = axis.perpendicular();
        let side = self.side(mode, connection_count);
        let distance = self.distance(
            axis,
            base.size(),
            request.relationship_size,
            request.new_size,
            request.radialized,
            connection_count,
        );

        let base_center = base.center();
        let located = base_center.along(axis) + side.sign() * distance;

        let stack_factor = match axis {
            Axis::Vertical => VERTICAL_STACK_FACTOR,
            Axis::Horizontal => HORIZONTAL_STACK_FACTOR,
        };
        let siblings = self.siblings_on_side(composition, request.base, base_center, axis, side);
        let varied = match side {
            Side::Before => siblings
                .iter()
                .map(|p| p.along(variating))
                .reduce(f32::min)
                .map(|extreme| extreme - stack_factor * request.new_size.along(variating)),
            Side::After => siblings
                .iter()
                .map(|p| p.along(variating))
                .reduce(f32::max)
                .map(|extreme| extreme + stack_factor * request.new_size.along(variating)),
        }
        .unwrap_or_else(|| base_center.along(variating));

        let center = base_center.with_along(axis, located).with_along(variating, varied);
        Placement {
            center,
            relationship_center: base_center.midpoint(center),
            side,
        }
    }

    fn place_diagonal(
        &self,
        request: &PlacementRequest,
        base: &Rect,
        quadrant: Quadrant,
        connection_count: usize,
    ) -> Placement {
        let (col, row) = quadrant.direction();
        let dx = self.distance(
            Axis::Horizontal,
            base.size(),
            request.relationship_size,
            request.new_size,
            request.radialized,
            connection_count,
        );
        let dy = self.distance(
            Axis::Vertical,
            base.size(),
            request.relationship_size,
            request.new_size,
            request.radialized,
            connection_count,
        );
        let base_center = base.center();
        let center = Point::new(
            base_center.x + f32::from(col) * dx,
            base_center.y + f32::from(row) * dy,
        );
        Placement {
            center,
            relationship_center: base_center.midpoint(center),
            side: if row < 0 { Side::Before } else { Side::After },
        }
    }

    /// Quadrant opposite the first existing connection, or the first one no
    /// connection occupies. Without connections the new symbol goes below.
    pub fn free_quadrant(&self, composition: &Composition, base_id: ObjectId, base: &Rect) -> Quadrant {
        let occupied: Vec<Quadrant> = neighbors(&composition.view, base_id)
            .into_iter()
            .filter_map(|n| composition.view.bounds(n))
            .map(|b| Quadrant::of(b.center(), base))
            .collect();

        let Some(first) = occupied.first().copied() else {
            return Quadrant::Down;
        };
        let opposite = first.opposite();
        if opposite != Quadrant::Inside && !occupied.contains(&opposite) {
            return opposite;
        }
        Quadrant::ALL
            .into_iter()
            .find(|q| !occupied.contains(q))
            .unwrap_or(opposite)
    }

    /// Centers of dependents already placed on `side` of the base, looking
    /// through relationship central symbols.
    fn siblings_on_side(
        &self,
        composition: &Composition,
        base_id: ObjectId,
        base_center: Point,
        axis: Axis,
        side: Side,
    ) -> Vec<Point> {
        let view = &composition.view;
        let mut dependents: Vec<ObjectId> = Vec::new();
        for neighbor in neighbors(view, base_id) {
            let is_central = view
                .symbol(neighbor)
                .and_then(|s| composition.domain.idea(s.idea))
                .is_some_and(|idea| idea.is_relationship());
            if is_central && !connectors_of(view, neighbor).is_empty() {
                for dependent in neighbors(view, neighbor) {
                    if dependent != base_id && !dependents.contains(&dependent) {
                        dependents.push(dependent);
                    }
                }
            } else if !dependents.contains(&neighbor) {
                dependents.push(neighbor);
            }
        }

        dependents
            .into_iter()
            .filter_map(|d| view.bounds(d))
            .map(|b| b.center())
            .filter(|c| {
                let offset = c.along(axis) - base_center.along(axis);
                match side {
                    Side::Before => offset < 0.0,
                    Side::After => offset > 0.0,
                }
            })
            .collect()
    }
}
