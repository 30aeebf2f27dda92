//! Domain layer: ideas, their definitions and the role-based links between
//! them.
//!
//! A relationship idea owns its [`RoleBasedLink`]s. Each link names the idea
//! playing the link's role. Visual connectors refer back to a link through
//! `(relationship, link)` pairs, so the domain never depends on the view.

use std::collections::HashMap;
use std::fmt;

use crate::error::ComposerError;
use crate::geometry::Size;

pub type IdeaId = i32;
pub type DefinitionId = i32;
pub type LinkId = i32;

/// Role a linked idea plays within a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleType {
    Origin,
    Target,
}

impl RoleType {
    pub fn counterpart(self) -> RoleType {
        match self {
            RoleType::Origin => RoleType::Target,
            RoleType::Target => RoleType::Origin,
        }
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleType::Origin => write!(f, "origin"),
            RoleType::Target => write!(f, "target"),
        }
    }
}

/// Rendered outline of a symbol, used for edge-point intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlineShape {
    #[default]
    Rectangle,
    Ellipse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaCategory {
    Concept,
    Relationship,
}

/// Metamodel definition of an idea type, with the flags the manipulation
/// engine honors.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeaDefinition {
    pub id: DefinitionId,
    pub name: String,
    pub category: IdeaCategory,
    /// Width cannot be changed by resizing.
    pub fixed_width: bool,
    /// Height cannot be changed by resizing.
    pub fixed_height: bool,
    /// At most one origin and one target link.
    pub simple: bool,
    /// The central symbol is not drawn; connectors meet at its position.
    pub hide_central_symbol: bool,
    pub default_size: Size,
    pub min_size: Option<Size>,
    pub outline: OutlineShape,
    pub in_place_editable: bool,
}

impl IdeaDefinition {
    pub fn concept(id: DefinitionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: IdeaCategory::Concept,
            fixed_width: false,
            fixed_height: false,
            simple: false,
            hide_central_symbol: false,
            default_size: Size::new(100.0, 50.0),
            min_size: None,
            outline: OutlineShape::Rectangle,
            in_place_editable: true,
        }
    }

    pub fn relationship(id: DefinitionId, name: impl Into<String>) -> Self {
        Self {
            category: IdeaCategory::Relationship,
            default_size: Size::new(20.0, 20.0),
            outline: OutlineShape::Ellipse,
            in_place_editable: false,
            ..Self::concept(id, name)
        }
    }

    pub fn with_default_size(mut self, size: Size) -> Self {
        self.default_size = size;
        self
    }

    pub fn with_min_size(mut self, size: Size) -> Self {
        self.min_size = Some(size);
        self
    }

    pub fn with_fixed_size(mut self, fixed_width: bool, fixed_height: bool) -> Self {
        self.fixed_width = fixed_width;
        self.fixed_height = fixed_height;
        self
    }

    pub fn with_outline(mut self, outline: OutlineShape) -> Self {
        self.outline = outline;
        self
    }

    pub fn with_in_place_edit(mut self, editable: bool) -> Self {
        self.in_place_editable = editable;
        self
    }

    /// Marks a relationship definition as simple: at most one link per role.
    pub fn simple(mut self) -> Self {
        self.simple = true;
        self
    }

    /// Hides the central symbol. Only takes effect on simple relationships.
    pub fn with_hidden_central_symbol(mut self) -> Self {
        self.hide_central_symbol = true;
        self
    }
}

/// Semantic edge between a relationship and one linked idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleBasedLink {
    pub id: LinkId,
    pub role: RoleType,
    pub idea: IdeaId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdeaKind {
    Concept,
    Relationship { links: Vec<RoleBasedLink> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Idea {
    pub id: IdeaId,
    pub name: String,
    pub definition: DefinitionId,
    pub kind: IdeaKind,
}

impl Idea {
    pub fn is_relationship(&self) -> bool {
        matches!(self.kind, IdeaKind::Relationship { .. })
    }

    /// Links of a relationship; empty for concepts.
    pub fn links(&self) -> &[RoleBasedLink] {
        match &self.kind {
            IdeaKind::Relationship { links } => links,
            IdeaKind::Concept => &[],
        }
    }

    pub fn link(&self, link: LinkId) -> Option<&RoleBasedLink> {
        self.links().iter().find(|l| l.id == link)
    }
}

/// Storage for ideas and their definitions.
#[derive(Debug, Clone, Default)]
pub struct Domain {
    definitions: HashMap<DefinitionId, IdeaDefinition>,
    ideas: HashMap<IdeaId, Idea>,
    next_idea_id: IdeaId,
    next_link_id: LinkId,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_definition(&mut self, definition: IdeaDefinition) {
        self.definitions.insert(definition.id, definition);
    }

    pub fn definition(&self, id: DefinitionId) -> Option<&IdeaDefinition> {
        self.definitions.get(&id)
    }

    pub fn idea(&self, id: IdeaId) -> Option<&Idea> {
        self.ideas.get(&id)
    }

    /// Definition of the given idea.
    pub fn definition_of(&self, idea: IdeaId) -> Option<&IdeaDefinition> {
        self.ideas
            .get(&idea)
            .and_then(|i| self.definitions.get(&i.definition))
    }

    pub fn ideas(&self) -> impl Iterator<Item = &Idea> + '_ {
        self.ideas.values()
    }

    pub fn create_concept(
        &mut self,
        definition: DefinitionId,
        name: impl Into<String>,
    ) -> Result<IdeaId, ComposerError> {
        self.create_idea(definition, name.into(), IdeaCategory::Concept)
    }

    pub fn create_relationship(
        &mut self,
        definition: DefinitionId,
        name: impl Into<String>,
    ) -> Result<IdeaId, ComposerError> {
        self.create_idea(definition, name.into(), IdeaCategory::Relationship)
    }

    fn create_idea(
        &mut self,
        definition: DefinitionId,
        name: String,
        category: IdeaCategory,
    ) -> Result<IdeaId, ComposerError> {
        if !self.definitions.contains_key(&definition) {
            return Err(ComposerError::DefinitionNotFound(definition));
        }
        self.next_idea_id += 1;
        let id = self.next_idea_id;
        let kind = match category {
            IdeaCategory::Concept => IdeaKind::Concept,
            IdeaCategory::Relationship => IdeaKind::Relationship { links: Vec::new() },
        };
        self.ideas.insert(
            id,
            Idea {
                id,
                name,
                definition,
                kind,
            },
        );
        Ok(id)
    }

    /// Appends a link without validation. Callers validate first.
    pub fn add_link(
        &mut self,
        relationship: IdeaId,
        role: RoleType,
        idea: IdeaId,
    ) -> Result<LinkId, ComposerError> {
        if !self.ideas.contains_key(&idea) {
            return Err(ComposerError::IdeaNotFound(idea));
        }
        self.next_link_id += 1;
        let id = self.next_link_id;
        let links = self.links_mut(relationship)?;
        links.push(RoleBasedLink { id, role, idea });
        Ok(id)
    }

    /// Points an existing link at another idea.
    pub fn set_link_idea(
        &mut self,
        relationship: IdeaId,
        link: LinkId,
        idea: IdeaId,
    ) -> Result<(), ComposerError> {
        if !self.ideas.contains_key(&idea) {
            return Err(ComposerError::IdeaNotFound(idea));
        }
        let links = self.links_mut(relationship)?;
        if let Some(existing) = links.iter_mut().find(|l| l.id == link) {
            existing.idea = idea;
        }
        Ok(())
    }

    pub fn remove_link(&mut self, relationship: IdeaId, link: LinkId) {
        if let Ok(links) = self.links_mut(relationship) {
            links.retain(|l| l.id != link);
        }
    }

    /// Removes an idea and every link that referenced it.
    pub fn remove_idea(&mut self, id: IdeaId) -> Option<Idea> {
        let removed = self.ideas.remove(&id)?;
        for idea in self.ideas.values_mut() {
            if let IdeaKind::Relationship { links } = &mut idea.kind {
                links.retain(|l| l.idea != id);
            }
        }
        Some(removed)
    }

    fn links_mut(&mut self, relationship: IdeaId) -> Result<&mut Vec<RoleBasedLink>, ComposerError> {
        match self.ideas.get_mut(&relationship) {
            Some(Idea {
                kind: IdeaKind::Relationship { links },
                ..
            }) => Ok(links),
            _ => Err(ComposerError::IdeaNotFound(relationship)),
        }
    }
}

/// Domain compatibility predicate supplied by the metamodel collaborator.
pub trait Metamodel {
    /// Whether an idea of definition `origin` may be linked to an idea of
    /// definition `target`. The error carries a user-facing reason.
    fn can_link(&self, origin: &IdeaDefinition, target: &IdeaDefinition) -> Result<(), String>;
}

/// Metamodel that allows every pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenMetamodel;

impl Metamodel for OpenMetamodel {
    fn can_link(&self, _origin: &IdeaDefinition, _target: &IdeaDefinition) -> Result<(), String> {
        Ok(())
    }
}

/// Metamodel with an explicit list of forbidden definition pairs.
#[derive(Debug, Clone, Default)]
pub struct RuleMetamodel {
    forbidden: HashMap<(DefinitionId, DefinitionId), String>,
}

impl RuleMetamodel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forbids linking `origin` to `target` (in that direction).
    pub fn forbid(mut self, origin: DefinitionId, target: DefinitionId, reason: impl Into<String>) -> Self {
        self.forbidden.insert((origin, target), reason.into());
        self
    }
}

impl Metamodel for RuleMetamodel {
    fn can_link(&self, origin: &IdeaDefinition, target: &IdeaDefinition) -> Result<(), String> {
        match self.forbidden.get(&(origin.id, target.id)) {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}
