//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use symbol_composer::{
    ClickCommand, Composition, CursorHint, DefinitionId, Domain, Editor, EditorConfig,
    IdeaDefinition, ManipulationOutcome, Modifiers, Notifications, ObjectId, Point, Rect,
    RoleType, Size, Vector,
};

pub const CONCEPT: DefinitionId = 1;
pub const RELATES: DefinitionId = 2;
pub const SIMPLE: DefinitionId = 3;
pub const HIDDEN: DefinitionId = 4;
pub const OTHER: DefinitionId = 5;
pub const FIXED: DefinitionId = 6;

/// Records every notification an editor emits.
#[derive(Default, Clone)]
pub struct NotificationTracker {
    pub statuses: Rc<RefCell<Vec<String>>>,
    pub cursors: Rc<RefCell<Vec<CursorHint>>>,
    pub versions: Rc<RefCell<Vec<u64>>>,
    pub messages: Rc<RefCell<Vec<String>>>,
    /// (command, object_id)
    pub commands: Rc<RefCell<Vec<(ClickCommand, ObjectId)>>>,
    pub scrolls: Rc<RefCell<Vec<Vector>>>,
}

impl NotificationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, notifications: &mut Notifications) {
        let sink = self.statuses.clone();
        notifications.on_status(move |text| sink.borrow_mut().push(text.to_string()));
        let sink = self.cursors.clone();
        notifications.on_cursor(move |cursor| sink.borrow_mut().push(cursor));
        let sink = self.versions.clone();
        notifications.on_version(move |version| sink.borrow_mut().push(version));
        let sink = self.messages.clone();
        notifications.on_message(move |message| sink.borrow_mut().push(message.to_string()));
        let sink = self.commands.clone();
        notifications.on_command(move |command, id| sink.borrow_mut().push((command, id)));
        let sink = self.scrolls.clone();
        notifications.on_scroll(move |delta| sink.borrow_mut().push(delta));
    }

    /// Clear all recorded notifications.
    pub fn clear(&self) {
        self.statuses.borrow_mut().clear();
        self.cursors.borrow_mut().clear();
        self.versions.borrow_mut().clear();
        self.messages.borrow_mut().clear();
        self.commands.borrow_mut().clear();
        self.scrolls.borrow_mut().clear();
    }
}

/// Domain with one definition per kind of symbol the tests need.
pub fn test_domain() -> Domain {
    let mut domain = Domain::new();
    domain.add_definition(IdeaDefinition::concept(CONCEPT, "Concept").with_min_size(Size::new(40.0, 20.0)));
    domain.add_definition(IdeaDefinition::relationship(RELATES, "Relates"));
    domain.add_definition(IdeaDefinition::relationship(SIMPLE, "Simple").simple());
    domain.add_definition(IdeaDefinition::relationship(HIDDEN, "Hidden").simple().with_hidden_central_symbol());
    domain.add_definition(IdeaDefinition::concept(OTHER, "Other"));
    domain.add_definition(IdeaDefinition::concept(FIXED, "Fixed").with_fixed_size(true, false));
    domain
}

/// An editor wired to a notification tracker.
pub struct Scene {
    pub editor: Editor,
    pub tracker: NotificationTracker,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_editor(Editor::new(Composition::new(test_domain()), EditorConfig::default()))
    }

    pub fn with_editor(mut editor: Editor) -> Self {
        let tracker = NotificationTracker::new();
        tracker.attach(editor.notifications_mut());
        Self { editor, tracker }
    }

    pub fn concept(&mut self, definition: DefinitionId, name: &str, center: Point) -> ObjectId {
        self.editor.create_concept(definition, name, center).unwrap()
    }

    pub fn relate(&mut self, definition: DefinitionId, origin: ObjectId, target: ObjectId) -> ObjectId {
        self.editor
            .create_relationship(
                definition,
                "",
                &[(RoleType::Origin, origin), (RoleType::Target, target)],
                None,
            )
            .unwrap()
    }

    pub fn bounds(&self, id: ObjectId) -> Rect {
        self.editor.composition().view.bounds(id).unwrap()
    }

    /// Connectors attached to `symbol`, outgoing first.
    pub fn connectors(&self, symbol: ObjectId) -> Vec<ObjectId> {
        self.editor.composition().view.symbol(symbol).unwrap().connections()
    }

    pub fn click(&mut self, at: Point, modifiers: Modifiers) -> ManipulationOutcome {
        self.editor.pointer_down(at, modifiers);
        self.editor.pointer_up(at, modifiers)
    }

    /// Press, one intermediate move, then release at `to`.
    pub fn drag(&mut self, from: Point, to: Point, modifiers: Modifiers) -> ManipulationOutcome {
        self.editor.pointer_down(from, modifiers);
        self.editor.pointer_move(from.midpoint(to), modifiers);
        self.editor.pointer_move(to, modifiers);
        self.editor.pointer_up(to, modifiers)
    }
}

/// Two concepts joined by a plain relationship:
/// A (0,0,100,50) → central (190,15,20,20) → B (300,0,100,50).
pub struct Pair {
    pub scene: Scene,
    pub a: ObjectId,
    pub b: ObjectId,
    pub central: ObjectId,
}

impl Pair {
    pub fn new() -> Self {
        Self::with_definition(RELATES)
    }

    pub fn with_definition(definition: DefinitionId) -> Self {
        let mut scene = Scene::new();
        let a = scene.concept(CONCEPT, "A", Point::new(50.0, 25.0));
        let b = scene.concept(CONCEPT, "B", Point::new(350.0, 25.0));
        let central = scene.relate(definition, a, b);
        scene.tracker.clear();
        Self { scene, a, b, central }
    }

    /// Connector from A to the central symbol.
    pub fn origin_connector(&self) -> ObjectId {
        self.scene.editor.composition().view.symbol(self.a).unwrap().origin_connections[0]
    }

    /// Connector from the central symbol to B.
    pub fn target_connector(&self) -> ObjectId {
        self.scene.editor.composition().view.symbol(self.b).unwrap().target_connections[0]
    }
}
