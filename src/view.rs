//! Visual layer: the objects a view owns and manipulates.
//!
//! Every manipulable item is a [`VisualObject`] whose [`VisualKind`] tells
//! symbols, connectors and complements apart. What an object supports is
//! exposed through [`Capabilities`], so the interaction code dispatches on
//! capabilities and pattern matches on the kind instead of relying on a type
//! hierarchy.

use std::collections::HashMap;

use crate::domain::{Domain, IdeaDefinition, IdeaId, LinkId};
use crate::geometry::{Point, Rect};

pub type ObjectId = i32;

/// What the user may do with a visual object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_move: bool,
    pub can_resize: bool,
    pub can_connect: bool,
}

impl Capabilities {
    pub const SYMBOL: Capabilities = Capabilities {
        can_move: true,
        can_resize: true,
        can_connect: true,
    };
    pub const CONNECTOR: Capabilities = Capabilities {
        can_move: false,
        can_resize: false,
        can_connect: true,
    };
    pub const COMPLEMENT: Capabilities = Capabilities {
        can_move: true,
        can_resize: true,
        can_connect: false,
    };
    pub const NONE: Capabilities = Capabilities {
        can_move: false,
        can_resize: false,
        can_connect: false,
    };
}

/// Node data: the rendered body of an idea.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolData {
    pub idea: IdeaId,
    /// Secondary rendering of an idea whose main symbol lives elsewhere.
    pub shortcut: bool,
    /// Locally owned complements.
    pub complements: Vec<ObjectId>,
    /// Connectors whose origin is this symbol (outgoing).
    pub origin_connections: Vec<ObjectId>,
    /// Connectors whose target is this symbol (incoming).
    pub target_connections: Vec<ObjectId>,
}

impl SymbolData {
    pub fn new(idea: IdeaId) -> Self {
        Self {
            idea,
            ..Default::default()
        }
    }

    /// Total number of attached connectors, counting a self-reference twice.
    pub fn connection_count(&self) -> usize {
        self.origin_connections.len() + self.target_connections.len()
    }

    /// Outgoing then incoming connectors, deduplicated.
    pub fn connections(&self) -> Vec<ObjectId> {
        let mut all = self.origin_connections.clone();
        for id in &self.target_connections {
            if !all.contains(id) {
                all.push(*id);
            }
        }
        all
    }
}

/// Reference from a connector to the domain link it visualizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkRef {
    pub relationship: IdeaId,
    pub link: LinkId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorEnd {
    Origin,
    Target,
}

impl ConnectorEnd {
    pub fn opposite(self) -> ConnectorEnd {
        match self {
            ConnectorEnd::Origin => ConnectorEnd::Target,
            ConnectorEnd::Target => ConnectorEnd::Origin,
        }
    }
}

/// Directed edge between two symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorData {
    pub link: LinkRef,
    pub origin: ObjectId,
    pub target: ObjectId,
    pub origin_edge: Point,
    pub target_edge: Point,
    pub waypoint: Option<Point>,
    /// Which end is attached to the linked idea (the relinkable end).
    pub idea_end: ConnectorEnd,
}

impl ConnectorData {
    pub fn symbol_at(&self, end: ConnectorEnd) -> ObjectId {
        match end {
            ConnectorEnd::Origin => self.origin,
            ConnectorEnd::Target => self.target,
        }
    }

    pub fn edge_at(&self, end: ConnectorEnd) -> Point {
        match end {
            ConnectorEnd::Origin => self.origin_edge,
            ConnectorEnd::Target => self.target_edge,
        }
    }

    pub fn set_edge(&mut self, end: ConnectorEnd, point: Point) {
        match end {
            ConnectorEnd::Origin => self.origin_edge = point,
            ConnectorEnd::Target => self.target_edge = point,
        }
    }

    /// The end attached to `symbol`, preferring the origin for self-references.
    pub fn end_of(&self, symbol: ObjectId) -> Option<ConnectorEnd> {
        if self.origin == symbol {
            Some(ConnectorEnd::Origin)
        } else if self.target == symbol {
            Some(ConnectorEnd::Target)
        } else {
            None
        }
    }

    pub fn is_self_reference(&self) -> bool {
        self.origin == self.target
    }

    /// Midpoint of the visible straight route.
    pub fn midpoint(&self) -> Point {
        self.origin_edge.midpoint(self.target_edge)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplementOwner {
    View,
    Symbol(ObjectId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplementKind {
    Callout,
    GroupRegion,
    Quote,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplementData {
    pub kind: ComplementKind,
    pub owner: ComplementOwner,
    /// Moves along with its owner symbol.
    pub anchored: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisualKind {
    Symbol(SymbolData),
    Connector(ConnectorData),
    Complement(ComplementData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualObject {
    pub id: ObjectId,
    pub bounds: Rect,
    pub selected: bool,
    /// Locked objects cannot be moved or resized.
    pub locked: bool,
    pub kind: VisualKind,
}

impl VisualObject {
    pub fn capabilities(&self) -> Capabilities {
        match self.kind {
            VisualKind::Symbol(_) => Capabilities::SYMBOL,
            VisualKind::Connector(_) => Capabilities::CONNECTOR,
            VisualKind::Complement(_) => Capabilities::COMPLEMENT,
        }
    }

    pub fn as_symbol(&self) -> Option<&SymbolData> {
        match &self.kind {
            VisualKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol_mut(&mut self) -> Option<&mut SymbolData> {
        match &mut self.kind {
            VisualKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_connector(&self) -> Option<&ConnectorData> {
        match &self.kind {
            VisualKind::Connector(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_connector_mut(&mut self) -> Option<&mut ConnectorData> {
        match &mut self.kind {
            VisualKind::Connector(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_complement(&self) -> Option<&ComplementData> {
        match &self.kind {
            VisualKind::Complement(c) => Some(c),
            _ => None,
        }
    }
}

/// Exclusive owner of visual objects, kept in paint (z) order.
#[derive(Debug, Clone, Default)]
pub struct View {
    objects: HashMap<ObjectId, VisualObject>,
    z_order: Vec<ObjectId>,
    next_id: ObjectId,
    version: u64,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ObjectId) -> Option<&VisualObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut VisualObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects from bottom-most to top-most.
    pub fn objects(&self) -> impl DoubleEndedIterator<Item = &VisualObject> + '_ {
        self.z_order.iter().filter_map(move |id| self.objects.get(id))
    }

    pub fn symbol(&self, id: ObjectId) -> Option<&SymbolData> {
        self.objects.get(&id).and_then(VisualObject::as_symbol)
    }

    pub fn connector(&self, id: ObjectId) -> Option<&ConnectorData> {
        self.objects.get(&id).and_then(VisualObject::as_connector)
    }

    pub fn bounds(&self, id: ObjectId) -> Option<Rect> {
        self.objects.get(&id).map(|o| o.bounds)
    }

    /// First symbol representing `idea`.
    pub fn symbol_of_idea(&self, idea: IdeaId) -> Option<ObjectId> {
        self.objects()
            .find(|o| o.as_symbol().is_some_and(|s| s.idea == idea))
            .map(|o| o.id)
    }

    /// Inserts an object under a fresh id, letting `configure` adjust it first.
    pub fn insert_with<F>(&mut self, bounds: Rect, kind: VisualKind, configure: F) -> ObjectId
    where
        F: FnOnce(&mut VisualObject),
    {
        self.next_id += 1;
        let id = self.next_id;
        let mut object = VisualObject {
            id,
            bounds,
            selected: false,
            locked: false,
            kind,
        };
        configure(&mut object);
        self.objects.insert(id, object);
        self.z_order.push(id);
        id
    }

    pub fn insert(&mut self, bounds: Rect, kind: VisualKind) -> ObjectId {
        self.insert_with(bounds, kind, |_| {})
    }

    /// Removes a single object. Topology bookkeeping is the caller's job.
    pub fn remove(&mut self, id: ObjectId) -> Option<VisualObject> {
        self.z_order.retain(|&z| z != id);
        self.objects.remove(&id)
    }

    /// Monotonic change counter, bumped after every committed edit.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn bump_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    /// Raises the counter to at least `floor`, e.g. after restoring an older
    /// snapshot, so versions never repeat.
    pub fn raise_version(&mut self, floor: u64) {
        self.version = self.version.max(floor);
    }
}

/// A view together with the domain it visualizes.
#[derive(Debug, Clone, Default)]
pub struct Composition {
    pub domain: Domain,
    pub view: View,
}

impl Composition {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            view: View::new(),
        }
    }

    /// Definition of the idea a symbol represents.
    pub fn symbol_definition(&self, symbol: ObjectId) -> Option<&IdeaDefinition> {
        let idea = self.view.symbol(symbol)?.idea;
        self.domain.definition_of(idea)
    }

    /// Central symbol of a relationship in this view.
    pub fn central_symbol(&self, relationship: IdeaId) -> Option<ObjectId> {
        self.view.symbol_of_idea(relationship)
    }

    /// Whether `symbol` is the hidden central symbol of a simple relationship.
    pub fn is_hidden_central_symbol(&self, symbol: ObjectId) -> bool {
        let Some(data) = self.view.symbol(symbol) else {
            return false;
        };
        let is_relationship = self
            .domain
            .idea(data.idea)
            .is_some_and(|idea| idea.is_relationship());
        is_relationship
            && self
                .symbol_definition(symbol)
                .is_some_and(|d| d.simple && d.hide_central_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(idea: IdeaId) -> VisualKind {
        VisualKind::Symbol(SymbolData::new(idea))
    }

    #[test]
    fn test_insert_assigns_increasing_ids_in_z_order() {
        let mut view = View::new();
        let a = view.insert(Rect::new(0.0, 0.0, 10.0, 10.0), symbol(1));
        let b = view.insert(Rect::new(5.0, 5.0, 10.0, 10.0), symbol(2));

        assert!(b > a);
        let order: Vec<ObjectId> = view.objects().map(|o| o.id).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_remove_drops_from_z_order() {
        let mut view = View::new();
        let a = view.insert(Rect::default(), symbol(1));
        let b = view.insert(Rect::default(), symbol(2));

        assert!(view.remove(a).is_some());
        assert!(!view.contains(a));
        assert_eq!(view.objects().map(|o| o.id).collect::<Vec<_>>(), vec![b]);
        assert!(view.remove(a).is_none());
    }

    #[test]
    fn test_capabilities_by_kind() {
        let mut view = View::new();
        let s = view.insert(Rect::default(), symbol(1));
        let c = view.insert(
            Rect::default(),
            VisualKind::Complement(ComplementData {
                kind: ComplementKind::Callout,
                owner: ComplementOwner::View,
                anchored: false,
            }),
        );

        assert_eq!(view.get(s).unwrap().capabilities(), Capabilities::SYMBOL);
        assert!(!view.get(c).unwrap().capabilities().can_connect);
    }

    #[test]
    fn test_symbol_of_idea() {
        let mut view = View::new();
        view.insert(Rect::default(), symbol(7));
        let s = view.insert(Rect::default(), symbol(8));
        assert_eq!(view.symbol_of_idea(8), Some(s));
        assert_eq!(view.symbol_of_idea(9), None);
    }

    #[test]
    fn test_connection_count_counts_both_lists() {
        let mut data = SymbolData::new(1);
        data.origin_connections = vec![10, 11];
        data.target_connections = vec![11, 12];
        assert_eq!(data.connection_count(), 4);
        assert_eq!(data.connections(), vec![10, 11, 12]);
    }

    #[test]
    fn test_version_bumps() {
        let mut view = View::new();
        assert_eq!(view.version(), 0);
        assert_eq!(view.bump_version(), 1);
        assert_eq!(view.version(), 1);
    }

    #[test]
    fn test_hidden_central_requires_simple_relationship() {
        let mut domain = Domain::new();
        domain.add_definition(IdeaDefinition::relationship(1, "Loose").with_hidden_central_symbol());
        domain.add_definition(
            IdeaDefinition::relationship(2, "Hidden").simple().with_hidden_central_symbol(),
        );
        let loose = domain.create_relationship(1, "").unwrap();
        let hidden = domain.create_relationship(2, "").unwrap();
        let mut composition = Composition::new(domain);
        let a = composition.view.insert(Rect::default(), symbol(loose));
        let b = composition.view.insert(Rect::default(), symbol(hidden));

        assert!(!composition.is_hidden_central_symbol(a));
        assert!(composition.is_hidden_central_symbol(b));
    }
}
