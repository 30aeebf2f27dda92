//! Editor facade: one view's composition together with its manipulation
//! state and collaborators.
//!
//! Pointer events go through [`Editor::pointer_down`], [`Editor::pointer_move`]
//! and [`Editor::pointer_up`] (or [`Editor::manipulate`] with a definitive
//! flag). Creation and deletion commands run inside their own transactions
//! and report failures through the message notification.

use std::time::Instant;

use log::{debug, info, warn};
use slint::SharedString;

use crate::config::EditorConfig;
use crate::domain::{DefinitionId, IdeaId, OpenMetamodel, RoleType};
use crate::error::ComposerError;
use crate::geometry::{Point, Rect, Vector};
use crate::grid::Snapper;
use crate::hit_test::{BoundsGeometry, GeometrySurface};
use crate::manipulation::{
    Collaborators, ManipulationContext, ManipulationOutcome, ManipulationState, Preview,
};
use crate::notify::Notifications;
use crate::operations::Operations;
use crate::path::route_in_view;
use crate::positioning::{AutoLayoutPositioner, Placement, PlacementRequest, PositioningMode};
use crate::router::{Modifiers, PointedVisual, PointerInputRouter};
use crate::scroll::AutoScroller;
use crate::selection::SelectionManager;
use crate::topology::{delete_objects, ConnectionTopology};
use crate::transaction::{SnapshotHistory, TransactionBoundary};
use crate::validation::{relationship_link_validator, LinkRequest, LinkValidator};
use crate::view::{
    ComplementData, ComplementKind, ComplementOwner, Composition, ConnectorEnd, LinkRef, ObjectId,
    SymbolData, VisualKind,
};

/// Parameters for [`Editor::auto_create_dependent`].
#[derive(Debug, Clone, PartialEq)]
pub struct DependentRequest {
    pub base: ObjectId,
    pub definition: DefinitionId,
    pub name: String,
    pub relationship_definition: DefinitionId,
    /// Role the base symbol's idea plays in the new relationship.
    pub base_role: RoleType,
    pub mode: PositioningMode,
    pub radialized: bool,
}

/// Symbols created by [`Editor::auto_create_dependent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependent {
    pub symbol: ObjectId,
    pub central: ObjectId,
}

pub struct Editor {
    composition: Composition,
    selection: SelectionManager,
    router: PointerInputRouter,
    notifications: Notifications,
    history: Box<dyn TransactionBoundary>,
    validator: Box<dyn LinkValidator>,
    geometry: Box<dyn GeometrySurface>,
    config: EditorConfig,
    scroller: AutoScroller,
    positioner: AutoLayoutPositioner,
    manipulation: ManipulationContext,
}

impl Editor {
    /// Editor with the default collaborators: bounds-based geometry,
    /// snapshot undo history and the standard link rules over an open
    /// metamodel.
    pub fn new(composition: Composition, config: EditorConfig) -> Self {
        Self {
            composition,
            selection: SelectionManager::new(),
            router: PointerInputRouter::new(config.manipulation().clone()),
            notifications: Notifications::new(),
            history: Box::new(SnapshotHistory::default()),
            validator: Box::new(relationship_link_validator(OpenMetamodel)),
            geometry: Box::new(BoundsGeometry::new(config.manipulation())),
            scroller: AutoScroller::new(config.auto_scroll().clone()),
            positioner: AutoLayoutPositioner::new(),
            manipulation: ManipulationContext::new(),
            config,
        }
    }

    pub fn with_geometry(mut self, geometry: impl GeometrySurface + 'static) -> Self {
        self.geometry = Box::new(geometry);
        self.router.invalidate();
        self
    }

    pub fn with_validator(mut self, validator: impl LinkValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn with_transactions(mut self, transactions: impl TransactionBoundary + 'static) -> Self {
        self.history = Box::new(transactions);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Direct access for host-side setup. Call [`Editor::refresh`] after
    /// removing objects.
    pub fn composition_mut(&mut self) -> &mut Composition {
        self.router.invalidate();
        &mut self.composition
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> ManipulationState {
        self.manipulation.state()
    }

    pub fn status_text(&self) -> SharedString {
        self.notifications.current_status()
    }

    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.scroller.set_viewport(viewport);
    }

    pub fn set_grid_snap(&mut self, snap: bool) {
        self.config.grid_mut().set_snap(snap);
    }

    /// Replaces the selection, e.g. from a host-side list.
    pub fn select(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        self.selection.replace_selection(ids);
        self.selection.prune(&self.composition.view);
        self.selection.apply_to_view(&mut self.composition.view);
    }

    /// Classification of the last pointer position.
    pub fn pointed(&self) -> Option<PointedVisual> {
        self.router.cached()
    }

    /// SVG path commands of a connector's current route.
    pub fn connector_path(&self, connector: ObjectId) -> Option<String> {
        route_in_view(
            &self.composition.view,
            connector,
            self.config.manipulation().self_reference_offset(),
        )
        .map(|route| route.path_commands())
    }

    fn split(&mut self) -> (&mut ManipulationContext, Collaborators<'_>) {
        (
            &mut self.manipulation,
            Collaborators {
                composition: &mut self.composition,
                selection: &mut self.selection,
                router: &mut self.router,
                notifications: &mut self.notifications,
                transactions: &mut *self.history,
                scroller: &mut self.scroller,
                validator: &*self.validator,
                geometry: &*self.geometry,
                config: &self.config,
            },
        )
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, position: Point, modifiers: Modifiers) -> ManipulationOutcome {
        let (context, mut collab) = self.split();
        context.pointer_down(&mut collab, position, modifiers)
    }

    pub fn pointer_move(&mut self, position: Point, modifiers: Modifiers) -> ManipulationOutcome {
        self.pointer_move_at(position, modifiers, Instant::now())
    }

    /// [`Editor::pointer_move`] with an explicit clock for the auto-scroll
    /// throttle.
    pub fn pointer_move_at(
        &mut self,
        position: Point,
        modifiers: Modifiers,
        now: Instant,
    ) -> ManipulationOutcome {
        let (context, mut collab) = self.split();
        context.pointer_move(&mut collab, position, modifiers, now)
    }

    pub fn pointer_up(&mut self, position: Point, modifiers: Modifiers) -> ManipulationOutcome {
        let (context, mut collab) = self.split();
        context.pointer_up(&mut collab, position, modifiers)
    }

    /// Single entry point for move, resize, displace and relink: a
    /// non-definitive call updates the working geometry, a definitive one
    /// commits.
    pub fn manipulate(
        &mut self,
        position: Point,
        modifiers: Modifiers,
        definitive: bool,
    ) -> ManipulationOutcome {
        if definitive {
            self.pointer_up(position, modifiers)
        } else {
            self.pointer_move(position, modifiers)
        }
    }

    /// Re-validates the manipulation against the current composition.
    /// Returns whether it had to be cancelled.
    pub fn refresh(&mut self) -> bool {
        let (context, mut collab) = self.split();
        context.refresh(&mut collab)
    }

    pub fn cancel(&mut self) -> ManipulationOutcome {
        let (context, mut collab) = self.split();
        context.cancel(&mut collab)
    }

    pub fn preview(&self) -> Option<Preview> {
        self.manipulation
            .preview(&self.composition, &*self.geometry, &self.config)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Runs `command` inside a named transaction. On success the view
    /// version is bumped and announced; on failure every change is rolled
    /// back and the message is reported.
    fn transact<T>(
        &mut self,
        name: &str,
        command: impl FnOnce(&mut Self) -> Result<T, ComposerError>,
    ) -> Result<T, ComposerError> {
        self.history.start_command_variation(name, &self.composition);
        match command(self) {
            Ok(value) => {
                self.history.complete_command_variation();
                self.router.invalidate();
                let version = self.composition.view.bump_version();
                self.notifications.emit_version(version);
                Ok(value)
            }
            Err(error) => {
                self.history.discard_command_variation(&mut self.composition);
                let message = error.to_string();
                warn!(command = name, error = message.as_str(); "Command rejected");
                self.notifications.emit_message(&message);
                Err(error)
            }
        }
    }

    fn snapper(&self) -> Snapper {
        Snapper::from_config(self.config.grid())
    }

    /// Moves the selected objects by `offset` (arrow keys).
    pub fn nudge(&mut self, offset: Vector) -> Result<(), ComposerError> {
        let first = self.selection.ids().into_iter().find(|&id| {
            self.composition
                .view
                .get(id)
                .is_some_and(|o| o.capabilities().can_move && !o.locked)
        });
        let Some(first) = first else {
            return Ok(());
        };
        self.transact("Nudge", |editor| {
            let ops = Operations::new(&*editor.geometry, editor.config.manipulation(), editor.snapper());
            let objects = ops.move_set(&editor.composition, first, &editor.selection, Modifiers::NONE);
            ops.nudge(&mut editor.composition, &objects, offset);
            Ok(())
        })
    }

    /// Deletes the selection with everything that depends on it. Returns the
    /// removed ids.
    pub fn delete_selection(&mut self) -> Result<Vec<ObjectId>, ComposerError> {
        let ids = self.selection.ids();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let removed = self.transact("Delete", |editor| {
            Ok(delete_objects(&mut editor.composition, &ids))
        })?;
        self.selection.prune(&self.composition.view);
        self.selection.apply_to_view(&mut self.composition.view);
        self.refresh();
        info!(count = removed.len(); "Selection deleted");
        Ok(removed)
    }

    /// Creates a concept idea and its symbol centered on `center`.
    pub fn create_concept(
        &mut self,
        definition: DefinitionId,
        name: &str,
        center: Point,
    ) -> Result<ObjectId, ComposerError> {
        self.transact("Create concept", |editor| {
            editor.insert_concept(definition, name, center)
        })
    }

    /// Creates a relationship linking the ideas of `links` (role, symbol),
    /// with its central symbol at `center` or between the linked symbols.
    /// Returns the central symbol.
    pub fn create_relationship(
        &mut self,
        definition: DefinitionId,
        name: &str,
        links: &[(RoleType, ObjectId)],
        center: Option<Point>,
    ) -> Result<ObjectId, ComposerError> {
        self.transact("Create relationship", |editor| {
            editor.insert_relationship(definition, name, links, center)
        })
    }

    /// Adds one more link to the relationship shown by `central`. Returns
    /// the new connector.
    pub fn extend_relationship(
        &mut self,
        central: ObjectId,
        role: RoleType,
        symbol: ObjectId,
    ) -> Result<ObjectId, ComposerError> {
        self.transact("Extend relationship", |editor| {
            editor.insert_link(central, role, symbol)
        })
    }

    /// Adds an annotation. A symbol owner must exist; the complement is
    /// registered in its list.
    pub fn create_complement(
        &mut self,
        kind: ComplementKind,
        bounds: Rect,
        owner: ComplementOwner,
        anchored: bool,
    ) -> Result<ObjectId, ComposerError> {
        if let ComplementOwner::Symbol(symbol) = owner {
            if self.composition.view.symbol(symbol).is_none() {
                return Err(ComposerError::NotASymbol(symbol));
            }
        }
        self.transact("Create complement", |editor| {
            let bounds = editor.snapper().rect_position(bounds);
            let id = editor.composition.view.insert(
                bounds,
                VisualKind::Complement(ComplementData {
                    kind,
                    owner,
                    anchored,
                }),
            );
            if let ComplementOwner::Symbol(symbol) = owner {
                if let Some(data) = editor
                    .composition
                    .view
                    .get_mut(symbol)
                    .and_then(|o| o.as_symbol_mut())
                {
                    data.complements.push(id);
                }
            }
            debug!(complement_id = id, kind:? = kind; "Complement created");
            Ok(id)
        })
    }

    /// Creates a concept and a relationship connecting it to `base`, placed
    /// by the auto-layout positioner.
    pub fn auto_create_dependent(
        &mut self,
        request: &DependentRequest,
    ) -> Result<Dependent, ComposerError> {
        let domain = &self.composition.domain;
        let new_size = domain
            .definition(request.definition)
            .ok_or(ComposerError::DefinitionNotFound(request.definition))?
            .default_size;
        let relationship_size = domain
            .definition(request.relationship_definition)
            .ok_or(ComposerError::DefinitionNotFound(request.relationship_definition))?
            .default_size;

        let placement: Placement = self.positioner.place(
            &self.composition,
            &PlacementRequest {
                base: request.base,
                mode: request.mode,
                radialized: request.radialized,
                relationship_size,
                new_size,
            },
        )?;

        self.transact("Create dependent", |editor| {
            let symbol = editor.insert_concept(request.definition, &request.name, placement.center)?;
            let links = [
                (request.base_role, request.base),
                (request.base_role.counterpart(), symbol),
            ];
            let central = editor.insert_relationship(
                request.relationship_definition,
                "",
                &links,
                Some(placement.relationship_center),
            )?;
            Ok(Dependent { symbol, central })
        })
    }

    /// Reverts the last committed transaction.
    pub fn undo(&mut self) -> bool {
        self.cancel();
        let floor = self.composition.view.version();
        if !self.history.undo(&mut self.composition) {
            return false;
        }
        self.composition.view.raise_version(floor);
        self.selection.prune(&self.composition.view);
        self.selection.apply_to_view(&mut self.composition.view);
        self.router.invalidate();
        let version = self.composition.view.bump_version();
        self.notifications.emit_version(version);
        debug!(version = version; "Undo");
        true
    }

    // ------------------------------------------------------------------
    // Untransacted building blocks
    // ------------------------------------------------------------------

    fn insert_concept(
        &mut self,
        definition: DefinitionId,
        name: &str,
        center: Point,
    ) -> Result<ObjectId, ComposerError> {
        let size = self
            .composition
            .domain
            .definition(definition)
            .ok_or(ComposerError::DefinitionNotFound(definition))?
            .default_size;
        let idea = self.composition.domain.create_concept(definition, name)?;
        let bounds = self.snapper().rect_position(Rect::from_center(center, size));
        let id = self
            .composition
            .view
            .insert(bounds, VisualKind::Symbol(SymbolData::new(idea)));
        debug!(symbol_id = id, idea = idea; "Concept created");
        Ok(id)
    }

    fn insert_relationship(
        &mut self,
        definition: DefinitionId,
        name: &str,
        links: &[(RoleType, ObjectId)],
        center: Option<Point>,
    ) -> Result<ObjectId, ComposerError> {
        let size = self
            .composition
            .domain
            .definition(definition)
            .ok_or(ComposerError::DefinitionNotFound(definition))?
            .default_size;

        let mut centers = Vec::with_capacity(links.len());
        for (_, symbol) in links {
            let bounds = self
                .composition
                .view
                .bounds(*symbol)
                .filter(|_| self.composition.view.symbol(*symbol).is_some())
                .ok_or(ComposerError::NotASymbol(*symbol))?;
            centers.push(bounds.center());
        }
        let center = center.unwrap_or_else(|| centroid(&centers));

        let relationship = self.composition.domain.create_relationship(definition, name)?;
        let bounds = self.snapper().rect_position(Rect::from_center(center, size));
        let central = self
            .composition
            .view
            .insert(bounds, VisualKind::Symbol(SymbolData::new(relationship)));

        for (role, symbol) in links {
            self.insert_link(central, *role, *symbol)?;
        }
        debug!(central = central, relationship = relationship, links = links.len(); "Relationship created");
        Ok(central)
    }

    /// Validates and adds one link, then draws its connector following the
    /// direction convention: origin ideas point at the central symbol, the
    /// central symbol points at target ideas.
    fn insert_link(
        &mut self,
        central: ObjectId,
        role: RoleType,
        symbol: ObjectId,
    ) -> Result<ObjectId, ComposerError> {
        let relationship = self
            .composition
            .view
            .symbol(central)
            .map(|s| s.idea)
            .ok_or(ComposerError::NotASymbol(central))?;
        let idea: IdeaId = self
            .composition
            .view
            .symbol(symbol)
            .map(|s| s.idea)
            .ok_or(ComposerError::NotASymbol(symbol))?;

        self.validator
            .validate(
                &LinkRequest::new(relationship, role, idea),
                &self.composition.domain,
            )
            .into_result()?;
        let link = self.composition.domain.add_link(relationship, role, idea)?;

        let (origin, target, idea_end) = match role {
            RoleType::Origin => (symbol, central, ConnectorEnd::Origin),
            RoleType::Target => (central, symbol, ConnectorEnd::Target),
        };
        let topology = ConnectionTopology::new(
            &*self.geometry,
            self.config.manipulation().self_reference_offset(),
        );
        topology.connect(
            &mut self.composition,
            LinkRef { relationship, link },
            origin,
            target,
            idea_end,
        )
    }
}

fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    let n = points.len() as f32;
    let (x, y) = points
        .iter()
        .fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
    Point::new(x / n, y / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Domain, IdeaDefinition, RuleMetamodel};
    use crate::geometry::Size;
    use crate::validation::ValidationError;
    use std::cell::RefCell;
    use std::rc::Rc;

    const CONCEPT: DefinitionId = 1;
    const RELATES: DefinitionId = 2;
    const SIMPLE: DefinitionId = 3;

    fn editor() -> Editor {
        let mut domain = Domain::new();
        domain.add_definition(IdeaDefinition::concept(CONCEPT, "Concept").with_default_size(Size::new(50.0, 30.0)));
        domain.add_definition(IdeaDefinition::relationship(RELATES, "Relates"));
        domain.add_definition(IdeaDefinition::relationship(SIMPLE, "Simple").simple());
        Editor::new(Composition::new(domain), EditorConfig::default())
    }

    // ========================================================================
    // Creation
    // ========================================================================

    #[test]
    fn test_create_concept_centers_symbol() {
        let mut editor = editor();
        let id = editor.create_concept(CONCEPT, "A", Point::new(100.0, 100.0)).unwrap();
        assert_eq!(editor.composition().view.bounds(id), Some(Rect::new(75.0, 85.0, 50.0, 30.0)));
        assert_eq!(editor.composition().view.version(), 1);
    }

    #[test]
    fn test_create_concept_unknown_definition() {
        let mut editor = editor();
        let result = editor.create_concept(42, "X", Point::ZERO);
        assert!(matches!(result, Err(ComposerError::DefinitionNotFound(42))));
        assert!(editor.composition().view.is_empty());
    }

    #[test]
    fn test_create_relationship_follows_direction_convention() {
        let mut editor = editor();
        let a = editor.create_concept(CONCEPT, "A", Point::new(0.0, 0.0)).unwrap();
        let b = editor.create_concept(CONCEPT, "B", Point::new(200.0, 0.0)).unwrap();

        let central = editor
            .create_relationship(RELATES, "r", &[(RoleType::Origin, a), (RoleType::Target, b)], None)
            .unwrap();

        let view = &editor.composition().view;
        assert_eq!(view.bounds(central).unwrap().center(), Point::new(100.0, 0.0));
        let outgoing = view.symbol(a).unwrap().origin_connections.clone();
        let incoming = view.symbol(b).unwrap().target_connections.clone();
        assert_eq!(view.connector(outgoing[0]).unwrap().target, central);
        assert_eq!(view.connector(incoming[0]).unwrap().origin, central);
        assert_eq!(view.connector(incoming[0]).unwrap().idea_end, ConnectorEnd::Target);
    }

    #[test]
    fn test_third_link_on_simple_relationship_is_rejected() {
        let mut editor = editor();
        let messages = Rc::new(RefCell::new(Vec::new()));
        let sink = messages.clone();
        editor.notifications_mut().on_message(move |m| sink.borrow_mut().push(m.to_string()));

        let a = editor.create_concept(CONCEPT, "A", Point::new(0.0, 0.0)).unwrap();
        let b = editor.create_concept(CONCEPT, "B", Point::new(200.0, 0.0)).unwrap();
        let c = editor.create_concept(CONCEPT, "C", Point::new(200.0, 200.0)).unwrap();
        let central = editor
            .create_relationship(SIMPLE, "s", &[(RoleType::Origin, a), (RoleType::Target, b)], None)
            .unwrap();
        let objects_before = editor.composition().view.len();
        let version_before = editor.composition().view.version();

        let result = editor.extend_relationship(central, RoleType::Target, c);

        let Err(ComposerError::Validation(ValidationError::SimpleCardinality { .. })) = result else {
            panic!("expected a simple cardinality rejection, got {result:?}");
        };
        assert_eq!(editor.composition().view.len(), objects_before);
        assert_eq!(editor.composition().view.version(), version_before);
        assert_eq!(messages.borrow().len(), 1);
        let rel = editor.composition().view.symbol(central).unwrap().idea;
        assert_eq!(editor.composition().domain.idea(rel).unwrap().links().len(), 2);
    }

    #[test]
    fn test_incompatible_relationship_is_rolled_back() {
        let mut editor = editor().with_validator(relationship_link_validator(
            RuleMetamodel::new().forbid(CONCEPT, CONCEPT, "No concept to concept"),
        ));
        let a = editor.create_concept(CONCEPT, "A", Point::new(0.0, 0.0)).unwrap();
        let b = editor.create_concept(CONCEPT, "B", Point::new(200.0, 0.0)).unwrap();
        let ideas_before = editor.composition().domain.ideas().count();

        let result =
            editor.create_relationship(RELATES, "r", &[(RoleType::Origin, a), (RoleType::Target, b)], None);

        assert!(result.is_err());
        assert_eq!(editor.composition().domain.ideas().count(), ideas_before);
        assert_eq!(editor.composition().view.len(), 2);
    }

    #[test]
    fn test_complement_registered_with_owner() {
        let mut editor = editor();
        let a = editor.create_concept(CONCEPT, "A", Point::new(0.0, 0.0)).unwrap();
        let note = editor
            .create_complement(ComplementKind::Callout, Rect::new(0.0, 40.0, 30.0, 20.0), ComplementOwner::Symbol(a), true)
            .unwrap();
        assert_eq!(editor.composition().view.symbol(a).unwrap().complements, vec![note]);

        let orphan = editor.create_complement(ComplementKind::Text, Rect::default(), ComplementOwner::Symbol(999), false);
        assert!(matches!(orphan, Err(ComposerError::NotASymbol(999))));
    }

    #[test]
    fn test_auto_create_dependent_below_base() {
        let mut editor = editor();
        let base = editor.create_concept(CONCEPT, "Base", Point::new(100.0, 100.0)).unwrap();

        let dependent = editor
            .auto_create_dependent(&DependentRequest {
                base,
                definition: CONCEPT,
                name: "Child".into(),
                relationship_definition: RELATES,
                base_role: RoleType::Origin,
                mode: PositioningMode::ToBottom,
                radialized: false,
            })
            .unwrap();

        // 30 (base) + 20 (relationship) + 1.5 * 30 (new) = 95 below.
        let view = &editor.composition().view;
        assert_eq!(view.bounds(dependent.symbol).unwrap().center(), Point::new(100.0, 195.0));
        assert_eq!(view.bounds(dependent.central).unwrap().center(), Point::new(100.0, 147.5));
        assert_eq!(view.symbol(base).unwrap().origin_connections.len(), 1);
        assert_eq!(view.symbol(dependent.symbol).unwrap().target_connections.len(), 1);
    }

    // ========================================================================
    // Editing
    // ========================================================================

    #[test]
    fn test_nudge_moves_selection() {
        let mut editor = editor();
        let a = editor.create_concept(CONCEPT, "A", Point::new(100.0, 100.0)).unwrap();
        let b = editor.create_concept(CONCEPT, "B", Point::new(300.0, 100.0)).unwrap();
        editor.select([a, b]);

        editor.nudge(Vector::new(0.0, 10.0)).unwrap();

        assert_eq!(editor.composition().view.bounds(a).unwrap().center(), Point::new(100.0, 110.0));
        assert_eq!(editor.composition().view.bounds(b).unwrap().center(), Point::new(300.0, 110.0));
    }

    #[test]
    fn test_delete_selection_cascades() {
        let mut editor = editor();
        let a = editor.create_concept(CONCEPT, "A", Point::new(0.0, 0.0)).unwrap();
        let b = editor.create_concept(CONCEPT, "B", Point::new(200.0, 0.0)).unwrap();
        let central = editor
            .create_relationship(RELATES, "r", &[(RoleType::Origin, a), (RoleType::Target, b)], None)
            .unwrap();
        editor.select([a]);

        let removed = editor.delete_selection().unwrap();

        assert!(removed.contains(&a));
        assert!(editor.selection().is_empty());
        assert!(editor.composition().view.symbol(central).unwrap().origin_connections.len() == 1);
        assert!(editor.composition().view.symbol(central).unwrap().target_connections.is_empty());
    }

    #[test]
    fn test_undo_restores_and_keeps_versions_increasing() {
        let mut editor = editor();
        let versions = Rc::new(RefCell::new(Vec::new()));
        let sink = versions.clone();
        editor.notifications_mut().on_version(move |v| sink.borrow_mut().push(v));

        let a = editor.create_concept(CONCEPT, "A", Point::new(100.0, 100.0)).unwrap();
        editor.select([a]);
        editor.nudge(Vector::new(10.0, 0.0)).unwrap();

        assert!(editor.undo());
        assert_eq!(editor.composition().view.bounds(a).unwrap().center(), Point::new(100.0, 100.0));
        assert!(editor.undo());
        assert!(!editor.composition().view.contains(a));
        assert!(editor.selection().is_empty());
        assert!(!editor.undo());

        assert_eq!(*versions.borrow(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_connector_path_commands() {
        let mut editor = editor();
        let a = editor.create_concept(CONCEPT, "A", Point::new(25.0, 15.0)).unwrap();
        let central = editor
            .create_relationship(RELATES, "r", &[(RoleType::Origin, a)], Some(Point::new(125.0, 15.0)))
            .unwrap();
        let connector = editor.composition().view.symbol(a).unwrap().origin_connections[0];

        assert_eq!(editor.connector_path(connector).as_deref(), Some("M 50 15 L 115 15"));
        assert!(editor.connector_path(central).is_none());
    }
}
