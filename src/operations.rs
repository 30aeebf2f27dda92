//! Geometric commits: Move, Resize, Displace and Relink.
//!
//! These functions mutate the composition directly. The manipulation state
//! machine wraps each call in a transaction and discards it on error.

use std::collections::HashSet;

use log::{debug, trace};

use crate::config::ManipulationConfig;
use crate::error::ComposerError;
use crate::geometry::{distance_to_segment, Axis, Point, Rect, Size, Vector};
use crate::grid::Snapper;
use crate::hit_test::GeometrySurface;
use crate::router::{Modifiers, ResizeHandle};
use crate::selection::SelectionManager;
use crate::topology::{
    attach, connectors_of, detach, incoming_subtree, neighbors, outgoing_subtree,
    translate_connector, ConnectionTopology,
};
use crate::validation::{LinkRequest, LinkValidator};
use crate::view::{ComplementOwner, Composition, ConnectorEnd, ObjectId};

/// Commit-time helpers bound to one view's collaborators.
pub struct Operations<'a> {
    geometry: &'a dyn GeometrySurface,
    config: &'a ManipulationConfig,
    snapper: Snapper,
}

impl<'a> Operations<'a> {
    pub fn new(geometry: &'a dyn GeometrySurface, config: &'a ManipulationConfig, snapper: Snapper) -> Self {
        Self {
            geometry,
            config,
            snapper,
        }
    }

    fn topology(&self) -> ConnectionTopology<'a> {
        ConnectionTopology::new(self.geometry, self.config.self_reference_offset())
    }

    // ------------------------------------------------------------------
    // Move
    // ------------------------------------------------------------------

    /// Every object that moves together with `object`.
    ///
    /// The manipulated object comes first, followed by the rest of the
    /// selection (when `object` is selected), the Ctrl/Shift subtrees, the
    /// anchored complements of every moved symbol and the hidden central
    /// symbols whose linked symbols all move.
    pub fn move_set(
        &self,
        composition: &Composition,
        object: ObjectId,
        selection: &SelectionManager,
        modifiers: Modifiers,
    ) -> Vec<ObjectId> {
        let view = &composition.view;
        let movable = |id: ObjectId| {
            view.get(id)
                .is_some_and(|o| o.capabilities().can_move && !o.locked)
        };

        let mut set = vec![object];
        let mut seen = HashSet::from([object]);
        let mut push = |id: ObjectId, set: &mut Vec<ObjectId>| {
            if seen.insert(id) {
                set.push(id);
            }
        };

        if selection.contains(object) {
            for id in selection.ids() {
                if movable(id) {
                    push(id, &mut set);
                }
            }
        }

        if modifiers.ctrl || modifiers.shift {
            let roots: Vec<ObjectId> = set.iter().copied().filter(|&id| view.symbol(id).is_some()).collect();
            for root in roots {
                if modifiers.ctrl {
                    for id in outgoing_subtree(view, root) {
                        if movable(id) {
                            push(id, &mut set);
                        }
                    }
                }
                if modifiers.shift {
                    for id in incoming_subtree(view, root) {
                        if movable(id) {
                            push(id, &mut set);
                        }
                    }
                }
            }
        }

        let symbols: Vec<ObjectId> = set.iter().copied().filter(|&id| view.symbol(id).is_some()).collect();
        for symbol in &symbols {
            let Some(data) = view.symbol(*symbol) else {
                continue;
            };
            for complement in &data.complements {
                let anchored = view
                    .get(*complement)
                    .and_then(|o| o.as_complement())
                    .is_some_and(|c| c.anchored && c.owner == ComplementOwner::Symbol(*symbol));
                if anchored {
                    push(*complement, &mut set);
                }
            }
        }

        let moved: HashSet<ObjectId> = set.iter().copied().collect();
        let hidden: Vec<ObjectId> = view
            .objects()
            .filter(|o| !moved.contains(&o.id) && composition.is_hidden_central_symbol(o.id))
            .map(|o| o.id)
            .collect();
        for central in hidden {
            let linked = neighbors(view, central);
            if !linked.is_empty() && linked.iter().all(|id| moved.contains(id)) {
                push(central, &mut set);
            }
        }

        set
    }

    /// Translates every object in `objects` by `offset` and keeps the
    /// connectors touching them consistent.
    pub fn apply_move(&self, composition: &mut Composition, objects: &[ObjectId], offset: Vector) {
        let moved: HashSet<ObjectId> = objects.iter().copied().collect();
        for id in objects {
            if let Some(object) = composition.view.get_mut(*id) {
                object.bounds = object.bounds.translate(offset);
            }
        }

        let mut connectors = Vec::new();
        for id in objects {
            for connector in connectors_of(&composition.view, *id) {
                if !connectors.contains(&connector) {
                    connectors.push(connector);
                }
            }
        }

        let topology = self.topology();
        for connector in connectors {
            let Some(data) = composition.view.connector(connector) else {
                continue;
            };
            if moved.contains(&data.origin) && moved.contains(&data.target) {
                translate_connector(&mut composition.view, connector, offset);
            } else {
                topology.recompute_connector(composition, connector);
            }
        }
    }

    /// Commits a move of `object` whose working rect ended at `working`.
    /// Returns the moved ids, empty when snapping left the object in place.
    pub fn commit_move(
        &self,
        composition: &mut Composition,
        object: ObjectId,
        working: Rect,
        selection: &SelectionManager,
        modifiers: Modifiers,
    ) -> Result<Vec<ObjectId>, ComposerError> {
        let start = composition
            .view
            .bounds(object)
            .ok_or(ComposerError::StaleReference(object))?;
        let target = self.snapper.rect_position(working);
        let offset = target.top_left() - start.top_left();
        if offset.is_zero() {
            trace!(object_id = object; "Move ended at its start");
            return Ok(Vec::new());
        }
        let objects = self.move_set(composition, object, selection, modifiers);
        self.apply_move(composition, &objects, offset);
        debug!(object_id = object, moved = objects.len(), dx = offset.dx, dy = offset.dy; "Move committed");
        Ok(objects)
    }

    /// Nudges `objects` by `offset` without snapping, the keyboard variant of
    /// a move.
    pub fn nudge(&self, composition: &mut Composition, objects: &[ObjectId], offset: Vector) {
        self.apply_move(composition, objects, offset);
    }

    // ------------------------------------------------------------------
    // Resize
    // ------------------------------------------------------------------

    /// Smallest size `object` may be resized to.
    pub fn minimum_size(&self, composition: &Composition, object: ObjectId) -> Size {
        let format_min = composition
            .symbol_definition(object)
            .and_then(|d| d.min_size)
            .unwrap_or_else(|| self.config.min_symbol_size());
        self.snapper.minimum_size(format_min)
    }

    /// Rect obtained by dragging `handle` of `start` by `delta`.
    ///
    /// Only axes freed by the handle and not fixed by the format change.
    /// When `snap` is set the moving edges land on the grid.
    pub fn resized_rect(
        &self,
        composition: &Composition,
        object: ObjectId,
        start: Rect,
        delta: Vector,
        handle: ResizeHandle,
        symmetric: bool,
        snap: bool,
    ) -> Rect {
        let (fixed_width, fixed_height) = composition
            .symbol_definition(object)
            .map(|d| (d.fixed_width, d.fixed_height))
            .unwrap_or((false, false));
        let minimum = self.minimum_size(composition, object);
        let snapper = if snap { self.snapper } else { Snapper::new(false, 0.0) };

        let (x, width) = if fixed_width {
            (start.x, start.width)
        } else {
            resize_axis(
                start.x,
                start.width,
                handle.direction(Axis::Horizontal),
                delta.dx,
                symmetric,
                minimum.width,
                snapper,
            )
        };
        let (y, height) = if fixed_height {
            (start.y, start.height)
        } else {
            resize_axis(
                start.y,
                start.height,
                handle.direction(Axis::Vertical),
                delta.dy,
                symmetric,
                minimum.height,
                snapper,
            )
        };
        Rect::new(x, y, width, height)
    }

    /// Applies a resized rect and recomputes the attached connectors.
    /// Returns false when the rect is unchanged.
    pub fn commit_resize(
        &self,
        composition: &mut Composition,
        object: ObjectId,
        rect: Rect,
    ) -> Result<bool, ComposerError> {
        let target = composition
            .view
            .get_mut(object)
            .ok_or(ComposerError::StaleReference(object))?;
        if !target.capabilities().can_resize {
            return Err(ComposerError::Unsupported {
                object,
                operation: "resize",
            });
        }
        if target.bounds == rect {
            return Ok(false);
        }
        target.bounds = rect;
        self.topology().recompute_symbol(composition, object);
        debug!(object_id = object, width = rect.width, height = rect.height; "Resize committed");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Displace
    // ------------------------------------------------------------------

    /// Reroutes `connector` through `point`.
    ///
    /// A point on the straight line between the two anchors clears the
    /// waypoint. The connectors of a simple relationship with a hidden
    /// central symbol and a single link move the central symbol instead.
    pub fn commit_displace(
        &self,
        composition: &mut Composition,
        connector: ObjectId,
        point: Point,
    ) -> Result<(), ComposerError> {
        let data = composition
            .view
            .connector(connector)
            .cloned()
            .ok_or(ComposerError::StaleReference(connector))?;
        let point = self.snapper.point(point);
        let topology = self.topology();

        let central = [data.origin, data.target]
            .into_iter()
            .find(|&symbol| composition.is_hidden_central_symbol(symbol));
        if let Some(central) = central {
            let relationship = composition.view.symbol(central).map(|s| s.idea);
            let single_link = relationship
                .and_then(|r| composition.domain.idea(r))
                .is_some_and(|idea| idea.links().len() == 1);
            if single_link {
                if let Some(object) = composition.view.get_mut(central) {
                    object.bounds = object.bounds.with_center(point);
                }
                topology.recompute_symbol(composition, central);
                debug!(connector_id = connector, central = central; "Central symbol displaced");
                return Ok(());
            }
        }

        let straight = !data.is_self_reference()
            && topology
                .straight_anchor_line(composition, connector)
                .is_some_and(|(a, b)| distance_to_segment(point, a, b) <= self.config.straighten_tolerance());
        let waypoint = (!straight).then_some(point);
        if let Some(data) = composition
            .view
            .get_mut(connector)
            .and_then(|o| o.as_connector_mut())
        {
            data.waypoint = waypoint;
        }
        topology.recompute_connector(composition, connector);
        debug!(connector_id = connector, straightened = straight; "Displace committed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Relink
    // ------------------------------------------------------------------

    /// Moves the idea end of `connector` onto the symbol under `at`.
    ///
    /// Returns the new symbol, or `None` when there is nothing to relink to
    /// (no symbol under the pointer, or the current one).
    pub fn commit_relink(
        &self,
        composition: &mut Composition,
        validator: &dyn LinkValidator,
        connector: ObjectId,
        at: Point,
    ) -> Result<Option<ObjectId>, ComposerError> {
        let data = composition
            .view
            .connector(connector)
            .cloned()
            .ok_or(ComposerError::StaleReference(connector))?;
        let fixed = data.symbol_at(data.idea_end.opposite());
        let current = data.symbol_at(data.idea_end);
        let Some(new_symbol) = self.geometry.symbol_at(composition, at, Some(fixed)) else {
            return Ok(None);
        };
        if new_symbol == current {
            return Ok(None);
        }

        let idea = composition
            .view
            .symbol(new_symbol)
            .map(|s| s.idea)
            .ok_or(ComposerError::NotASymbol(new_symbol))?;
        let relationship = data.link.relationship;
        let link = composition
            .domain
            .idea(relationship)
            .and_then(|r| r.link(data.link.link))
            .cloned()
            .ok_or(ComposerError::IdeaNotFound(relationship))?;

        validator
            .validate(&LinkRequest::relink(relationship, &link, idea), &composition.domain)
            .into_result()?;

        composition.domain.set_link_idea(relationship, link.id, idea)?;
        detach(&mut composition.view, connector);
        if let Some(data) = composition
            .view
            .get_mut(connector)
            .and_then(|o| o.as_connector_mut())
        {
            match data.idea_end {
                ConnectorEnd::Origin => data.origin = new_symbol,
                ConnectorEnd::Target => data.target = new_symbol,
            }
        }
        attach(&mut composition.view, connector);
        self.topology().recompute_connector(composition, connector);
        debug!(connector_id = connector, from = current, to = new_symbol; "Relink committed");
        Ok(Some(new_symbol))
    }
}

/// One axis of a resize.
///
/// `direction` is the handle's pull on this axis: `-1` moves the leading
/// edge, `1` the trailing edge, `0` leaves the axis alone. Symmetric resizes
/// move both edges so the center stays put. A size pushed below `minimum`
/// is clamped, keeping the anchored edge (or the center) in place.
fn resize_axis(
    start: f32,
    extent: f32,
    direction: i8,
    delta: f32,
    symmetric: bool,
    minimum: f32,
    snapper: Snapper,
) -> (f32, f32) {
    let end = start + extent;
    let center = start + extent * 0.5;
    match direction {
        1 => {
            let moved = snapper.value(end + delta);
            let change = moved - end;
            if symmetric {
                let extent = (extent + change * 2.0).max(minimum);
                (center - extent * 0.5, extent)
            } else {
                (start, (extent + change).max(minimum))
            }
        }
        -1 => {
            let moved = snapper.value(start + delta);
            let change = start - moved;
            if symmetric {
                let extent = (extent + change * 2.0).max(minimum);
                (center - extent * 0.5, extent)
            } else {
                let extent = (extent + change).max(minimum);
                (end - extent, extent)
            }
        }
        _ => (start, extent),
    }
}
