//! Connection topology: which connectors touch which symbols, and where
//! their edge points sit.
//!
//! The adjacency lists live on [`SymbolData`](crate::view::SymbolData). The
//! free functions here keep them consistent; [`ConnectionTopology`] adds the
//! geometry-dependent part (edge points computed against rendered outlines).

use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::error::ComposerError;
use crate::geometry::{Point, Vector};
use crate::hit_test::GeometrySurface;
use crate::path::{route_in_view, self_reference_point};
use crate::view::{
    ComplementOwner, Composition, ConnectorData, ConnectorEnd, LinkRef, ObjectId, View, VisualKind,
};

/// Registers `connector` in the lists of both of its symbols.
pub fn attach(view: &mut View, connector: ObjectId) {
    let Some((origin, target)) = view.connector(connector).map(|c| (c.origin, c.target)) else {
        return;
    };
    if let Some(symbol) = view.get_mut(origin).and_then(|o| o.as_symbol_mut()) {
        if !symbol.origin_connections.contains(&connector) {
            symbol.origin_connections.push(connector);
        }
    }
    if let Some(symbol) = view.get_mut(target).and_then(|o| o.as_symbol_mut()) {
        if !symbol.target_connections.contains(&connector) {
            symbol.target_connections.push(connector);
        }
    }
}

/// Removes `connector` from the lists of both of its symbols.
pub fn detach(view: &mut View, connector: ObjectId) {
    let Some((origin, target)) = view.connector(connector).map(|c| (c.origin, c.target)) else {
        return;
    };
    if let Some(symbol) = view.get_mut(origin).and_then(|o| o.as_symbol_mut()) {
        symbol.origin_connections.retain(|&c| c != connector);
    }
    if let Some(symbol) = view.get_mut(target).and_then(|o| o.as_symbol_mut()) {
        symbol.target_connections.retain(|&c| c != connector);
    }
}

/// Connectors attached to `symbol`, outgoing first.
pub fn connectors_of(view: &View, symbol: ObjectId) -> Vec<ObjectId> {
    view.symbol(symbol)
        .map(|s| s.connections())
        .unwrap_or_default()
}

/// Symbols at the other end of every connector attached to `symbol`.
pub fn neighbors(view: &View, symbol: ObjectId) -> Vec<ObjectId> {
    let mut result = Vec::new();
    for connector in connectors_of(view, symbol) {
        let Some(data) = view.connector(connector) else {
            continue;
        };
        let other = if data.origin == symbol {
            data.target
        } else {
            data.origin
        };
        if other != symbol && !result.contains(&other) {
            result.push(other);
        }
    }
    result
}

/// Connector visualizing the given domain link.
pub fn connector_for_link(view: &View, link: LinkRef) -> Option<ObjectId> {
    view.objects()
        .find(|o| o.as_connector().is_some_and(|c| c.link == link))
        .map(|o| o.id)
}

/// Symbols reachable from `root` by following connectors origin → target.
pub fn outgoing_subtree(view: &View, root: ObjectId) -> Vec<ObjectId> {
    traverse(view, root, ConnectorEnd::Origin)
}

/// Symbols reachable from `root` by following connectors target → origin.
pub fn incoming_subtree(view: &View, root: ObjectId) -> Vec<ObjectId> {
    traverse(view, root, ConnectorEnd::Target)
}

fn traverse(view: &View, root: ObjectId, from: ConnectorEnd) -> Vec<ObjectId> {
    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    let mut result = Vec::new();

    while let Some(current) = queue.pop_front() {
        let Some(symbol) = view.symbol(current) else {
            continue;
        };
        let connectors = match from {
            ConnectorEnd::Origin => &symbol.origin_connections,
            ConnectorEnd::Target => &symbol.target_connections,
        };
        for connector in connectors {
            let Some(data) = view.connector(*connector) else {
                continue;
            };
            let next = data.symbol_at(from.opposite());
            if visited.insert(next) {
                result.push(next);
                queue.push_back(next);
            }
        }
    }
    result
}

/// Shifts a connector's waypoint and both edge points by `offset`, keeping
/// its shape.
pub fn translate_connector(view: &mut View, connector: ObjectId, offset: Vector) {
    if let Some(object) = view.get_mut(connector) {
        object.bounds = object.bounds.translate(offset);
        if let Some(data) = object.as_connector_mut() {
            data.origin_edge += offset;
            data.target_edge += offset;
            if let Some(waypoint) = data.waypoint.as_mut() {
                *waypoint += offset;
            }
        }
    }
}

/// Removes objects from the view together with everything that cannot exist
/// without them.
///
/// Deleting a symbol deletes its connectors and its anchored local
/// complements; unanchored local complements are handed over to the view.
/// Every deleted connector also drops its domain link. Returns the ids that
/// were actually removed.
pub fn delete_objects(composition: &mut Composition, ids: &[ObjectId]) -> Vec<ObjectId> {
    let view = &composition.view;
    let mut doomed: Vec<ObjectId> = Vec::new();
    let mut push = |id: ObjectId, doomed: &mut Vec<ObjectId>| {
        if view.contains(id) && !doomed.contains(&id) {
            doomed.push(id);
        }
    };

    for &id in ids {
        push(id, &mut doomed);
        if let Some(symbol) = view.symbol(id) {
            for connector in symbol.connections() {
                push(connector, &mut doomed);
            }
            for &complement in &symbol.complements {
                if view
                    .get(complement)
                    .and_then(|o| o.as_complement())
                    .is_some_and(|c| c.anchored)
                {
                    push(complement, &mut doomed);
                }
            }
        }
    }

    let mut removed = Vec::with_capacity(doomed.len());
    for id in doomed {
        let view = &mut composition.view;
        if view.connector(id).is_some() {
            detach(view, id);
        }
        let Some(object) = view.remove(id) else {
            continue;
        };
        match &object.kind {
            VisualKind::Connector(data) => {
                composition
                    .domain
                    .remove_link(data.link.relationship, data.link.link);
            }
            VisualKind::Symbol(data) => {
                for &complement in &data.complements {
                    if let Some(VisualKind::Complement(c)) =
                        view.get_mut(complement).map(|o| &mut o.kind)
                    {
                        c.owner = ComplementOwner::View;
                        c.anchored = false;
                    }
                }
            }
            VisualKind::Complement(data) => {
                if let ComplementOwner::Symbol(owner) = data.owner {
                    if let Some(symbol) = view.get_mut(owner).and_then(|o| o.as_symbol_mut()) {
                        symbol.complements.retain(|&c| c != id);
                    }
                }
            }
        }
        debug!(object_id = id; "Visual object deleted");
        removed.push(id);
    }
    removed
}

/// Geometry-aware topology maintenance.
pub struct ConnectionTopology<'g> {
    geometry: &'g dyn GeometrySurface,
    self_reference_offset: f32,
}

impl<'g> ConnectionTopology<'g> {
    pub fn new(geometry: &'g dyn GeometrySurface, self_reference_offset: f32) -> Self {
        Self {
            geometry,
            self_reference_offset,
        }
    }

    /// Creates a connector between two symbols, registers it and computes
    /// its edge points.
    pub fn connect(
        &self,
        composition: &mut Composition,
        link: LinkRef,
        origin: ObjectId,
        target: ObjectId,
        idea_end: ConnectorEnd,
    ) -> Result<ObjectId, ComposerError> {
        for symbol in [origin, target] {
            if composition.view.symbol(symbol).is_none() {
                return Err(ComposerError::NotASymbol(symbol));
            }
        }
        let origin_center = composition.view.bounds(origin).unwrap_or_default().center();
        let target_center = composition.view.bounds(target).unwrap_or_default().center();
        let data = ConnectorData {
            link,
            origin,
            target,
            origin_edge: origin_center,
            target_edge: target_center,
            waypoint: None,
            idea_end,
        };
        let id = composition
            .view
            .insert(Default::default(), VisualKind::Connector(data));
        attach(&mut composition.view, id);
        self.recompute_connector(composition, id);
        debug!(connector_id = id, origin = origin, target = target; "Connector created");
        Ok(id)
    }

    /// Recomputes the edge point(s) of `connector` on `symbol`'s outline.
    ///
    /// The edge point lies where the segment between the symbol's center and
    /// the counterpart anchor (waypoint if any, else the other symbol's
    /// center) leaves the outline. When the anchors overlap it falls back to
    /// the center.
    pub fn recompute_edge_point(
        &self,
        composition: &mut Composition,
        connector: ObjectId,
        symbol: ObjectId,
    ) {
        let Some(data) = composition.view.connector(connector) else {
            return;
        };
        let ends: Vec<ConnectorEnd> = if data.is_self_reference() {
            vec![ConnectorEnd::Origin, ConnectorEnd::Target]
        } else {
            data.end_of(symbol).into_iter().collect()
        };
        for end in ends {
            let edge = self.edge_point(composition, connector, end);
            if let (Some(edge), Some(data)) = (
                edge,
                composition
                    .view
                    .get_mut(connector)
                    .and_then(|o| o.as_connector_mut()),
            ) {
                data.set_edge(end, edge);
            }
        }
        self.refresh_bounds(composition, connector);
    }

    /// Recomputes both edge points of a connector.
    pub fn recompute_connector(&self, composition: &mut Composition, connector: ObjectId) {
        let Some((origin, target)) = composition
            .view
            .connector(connector)
            .map(|c| (c.origin, c.target))
        else {
            return;
        };
        self.recompute_edge_point(composition, connector, origin);
        if target != origin {
            self.recompute_edge_point(composition, connector, target);
        }
    }

    /// Recomputes both ends of every connector touching `symbol`. The far
    /// ends aim at this symbol's center, so they move too.
    pub fn recompute_symbol(&self, composition: &mut Composition, symbol: ObjectId) {
        for connector in connectors_of(&composition.view, symbol) {
            self.recompute_connector(composition, connector);
        }
    }

    fn edge_point(
        &self,
        composition: &Composition,
        connector: ObjectId,
        end: ConnectorEnd,
    ) -> Option<Point> {
        let view = &composition.view;
        let data = view.connector(connector)?;
        let symbol = data.symbol_at(end);
        let bounds = view.bounds(symbol)?;
        let center = bounds.center();

        if composition.is_hidden_central_symbol(symbol) {
            return Some(center);
        }

        let toward = if data.is_self_reference() {
            let bend = data
                .waypoint
                .unwrap_or_else(|| self_reference_point(&bounds, self.self_reference_offset));
            match end {
                ConnectorEnd::Origin => Point::new(bend.x, center.y),
                ConnectorEnd::Target => Point::new(center.x, bend.y),
            }
        } else {
            match data.waypoint {
                Some(waypoint) => waypoint,
                None => view
                    .bounds(data.symbol_at(end.opposite()))
                    .map(|b| b.center())
                    .unwrap_or(center),
            }
        };

        Some(
            self.geometry
                .outline_intersection(composition, symbol, toward)
                .unwrap_or(center),
        )
    }

    /// Keeps a connector's bounding rect in sync with its route.
    pub fn refresh_bounds(&self, composition: &mut Composition, connector: ObjectId) {
        let Some(route) = route_in_view(&composition.view, connector, self.self_reference_offset)
        else {
            return;
        };
        if let Some(object) = composition.view.get_mut(connector) {
            object.bounds = route.bounds();
        }
    }

    /// Straight anchor line of a connector, ignoring its waypoint: the
    /// segment between the two edge points it would have without one.
    pub fn straight_anchor_line(
        &self,
        composition: &Composition,
        connector: ObjectId,
    ) -> Option<(Point, Point)> {
        let view = &composition.view;
        let data = view.connector(connector)?;
        let origin_center = view.bounds(data.origin)?.center();
        let target_center = view.bounds(data.target)?.center();
        Some((origin_center, target_center))
    }
}
