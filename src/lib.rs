//! # Symbol Composer
//!
//! Interactive manipulation and auto-layout engine for diagram composers
//! that draw domain ideas as symbols joined by connectors.
//!
//! Every visual object lives in a [`View`]. Symbols represent concepts or
//! relationships of a [`Domain`]; connectors represent the role-based links
//! of a relationship and run between the relationship's central symbol and
//! the linked symbol. Complements (text, stamps, callouts) annotate symbols.
//!
//! ## Features
//!
//! - **Pointer routing** - [`PointerInputRouter`] classifies what lies under
//!   the pointer and which manipulation a drag or click would start
//! - **Manipulations** - move (with selection and subtree propagation),
//!   resize by handle, connector displacement and relinking, box selection
//! - **Link rules** - [`CompositeValidator`] chains existence, simple
//!   relationship cardinality, role uniqueness and metamodel compatibility
//! - **Transactions** - each committed manipulation or command is one
//!   undoable step behind the [`TransactionBoundary`] trait
//! - **Auto-layout** - [`AutoLayoutPositioner`] places new dependent symbols
//!   around a base symbol, stacking siblings that share a side
//!
//! ## Quick Start
//!
//! ```ignore
//! use symbol_composer::*;
//!
//! let mut domain = Domain::new();
//! domain.add_definition(IdeaDefinition::concept(1, "Concept"));
//! domain.add_definition(IdeaDefinition::relationship(2, "Relates"));
//!
//! let mut editor = Editor::new(Composition::new(domain), EditorConfig::default());
//! let a = editor.create_concept(1, "A", Point::new(0.0, 0.0))?;
//! let b = editor.create_concept(1, "B", Point::new(200.0, 0.0))?;
//! editor.create_relationship(2, "", &[(RoleType::Origin, a), (RoleType::Target, b)], None)?;
//!
//! editor.pointer_down(Point::new(0.0, 5.0), Modifiers::NONE);
//! editor.pointer_move(Point::new(0.0, 55.0), Modifiers::NONE);
//! editor.pointer_up(Point::new(0.0, 55.0), Modifiers::NONE);
//! ```
//!
//! For Slint front ends, [`EditorController`] wraps an [`Editor`] and hands
//! out callbacks ready for the generated `on_*` setters.

pub mod config;
pub mod controller;
pub mod domain;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod manipulation;
pub mod notify;
pub mod operations;
pub mod path;
pub mod positioning;
pub mod router;
pub mod scroll;
pub mod selection;
pub mod topology;
pub mod transaction;
pub mod validation;
pub mod view;

pub use config::{AutoScrollConfig, EditorConfig, GridConfig, ManipulationConfig};
pub use controller::EditorController;
pub use domain::{
    DefinitionId, Domain, Idea, IdeaDefinition, IdeaId, LinkId, Metamodel, OpenMetamodel,
    OutlineShape, RoleBasedLink, RoleType, RuleMetamodel,
};
pub use editor::{Dependent, DependentRequest, Editor};
pub use error::ComposerError;
pub use geometry::{Axis, Point, Quadrant, Rect, Size, Vector};
pub use grid::Snapper;
pub use hit_test::{objects_in_selection_box, BoundsGeometry, GeometrySurface};
pub use manipulation::{ManipulationContext, ManipulationOutcome, ManipulationState, Preview};
pub use notify::Notifications;
pub use operations::Operations;
pub use path::{connector_route, route_in_view, ConnectorRoute};
pub use positioning::{AutoLayoutPositioner, Placement, PlacementRequest, PositioningMode, Side};
pub use router::{
    AuxiliaryAction, ClickCommand, CursorHint, ManipulationKind, Modifiers, PointedVisual,
    PointerInputRouter, ResizeHandle, TentativeAction, Zone,
};
pub use scroll::AutoScroller;
pub use selection::SelectionManager;
pub use topology::ConnectionTopology;
pub use transaction::{SnapshotHistory, TransactionBoundary};
pub use validation::{
    relationship_link_validator, CompositeValidator, LinkRequest, LinkValidator, ValidationError,
    ValidationResult,
};
pub use view::{
    Capabilities, ComplementData, ComplementKind, ComplementOwner, Composition, ConnectorData,
    ConnectorEnd, LinkRef, ObjectId, SymbolData, View, VisualKind, VisualObject,
};
