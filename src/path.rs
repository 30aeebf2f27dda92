use crate::geometry::{distance_to_segment, Point, Rect};
use crate::view::{ConnectorData, ObjectId, View};

/// Ordered points of a connector's visible path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectorRoute {
    pub points: Vec<Point>,
}

impl ConnectorRoute {
    /// Bounding rectangle of the route.
    pub fn bounds(&self) -> Rect {
        Rect::bounding(self.points.iter().copied()).unwrap_or_default()
    }

    /// Shortest distance from `p` to any segment of the route.
    pub fn distance_to(&self, p: Point) -> f32 {
        match self.points.as_slice() {
            [] => f32::INFINITY,
            [only] => p.distance(*only),
            points => points
                .windows(2)
                .map(|w| distance_to_segment(p, w[0], w[1]))
                .fold(f32::INFINITY, f32::min),
        }
    }

    /// SVG path commands for the route (e.g. "M 10 20 L 60 20 L 60 80")
    pub fn path_commands(&self) -> String {
        let mut commands = String::with_capacity(self.points.len() * 16);
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                commands.push(' ');
            }
            let op = if i == 0 { 'M' } else { 'L' };
            commands.push_str(&format!("{} {} {}", op, p.x, p.y));
        }
        commands
    }
}

/// Default bend point of a self-referencing connector.
pub fn self_reference_point(symbol_bounds: &Rect, offset: f32) -> Point {
    Point::new(symbol_bounds.right() + offset, symbol_bounds.top() - offset)
}

/// Compute the polyline a connector is drawn along.
///
/// Straight connectors run from the origin edge point to the target edge
/// point, through the waypoint when one is set. Self-referencing connectors
/// are bent around the top-right corner of their symbol so they stay visible.
///
/// # Arguments
/// * `connector` - Connector endpoints and waypoint
/// * `symbol_bounds` - Bounds of the origin symbol (only used for self-references)
/// * `self_reference_offset` - Distance of the bend from the symbol corner
pub fn connector_route(
    connector: &ConnectorData,
    symbol_bounds: &Rect,
    self_reference_offset: f32,
) -> ConnectorRoute {
    let start = connector.origin_edge;
    let end = connector.target_edge;

    if connector.is_self_reference() {
        let bend = connector
            .waypoint
            .unwrap_or_else(|| self_reference_point(symbol_bounds, self_reference_offset));
        return ConnectorRoute {
            points: vec![
                start,
                Point::new(bend.x, start.y),
                bend,
                Point::new(end.x, bend.y),
                end,
            ],
        };
    }

    let points = match connector.waypoint {
        Some(waypoint) => vec![start, waypoint, end],
        None => vec![start, end],
    };
    ConnectorRoute { points }
}

/// Route of the connector `connector` as currently stored in `view`.
pub fn route_in_view(
    view: &View,
    connector: ObjectId,
    self_reference_offset: f32,
) -> Option<ConnectorRoute> {
    let data = view.connector(connector)?;
    let symbol_bounds = view.bounds(data.origin).unwrap_or_default();
    Some(connector_route(data, &symbol_bounds, self_reference_offset))
}
