//! Link validation framework.
//!
//! Every link creation, extension and relink is gated by a [`LinkValidator`].
//! Validators are composable: [`CompositeValidator`] runs them in order and
//! stops at the first rejection. [`relationship_link_validator`] assembles
//! the standard rule set.

use thiserror::Error;

use crate::domain::{Domain, IdeaId, LinkId, Metamodel, RoleBasedLink, RoleType};

/// A link that is about to be created, or an existing link about to be
/// pointed at another idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRequest {
    pub relationship: IdeaId,
    pub role: RoleType,
    pub idea: IdeaId,
    /// The link being re-associated, when relinking.
    pub replacing: Option<LinkId>,
}

impl LinkRequest {
    pub fn new(relationship: IdeaId, role: RoleType, idea: IdeaId) -> Self {
        Self {
            relationship,
            role,
            idea,
            replacing: None,
        }
    }

    pub fn relink(relationship: IdeaId, link: &RoleBasedLink, idea: IdeaId) -> Self {
        Self {
            relationship,
            role: link.role,
            idea,
            replacing: Some(link.id),
        }
    }

    /// Existing links of the relationship, minus the one being replaced.
    fn remaining_links<'d>(&self, domain: &'d Domain) -> impl Iterator<Item = &'d RoleBasedLink> + 'd {
        let replacing = self.replacing;
        domain
            .idea(self.relationship)
            .map(|idea| idea.links())
            .unwrap_or_default()
            .iter()
            .filter(move |link| Some(link.id) != replacing)
    }
}

/// Result of link validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Combine two results (AND logic): returns first error if any
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => other,
            invalid => invalid,
        }
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(error) => Err(error),
        }
    }
}

/// Reasons why a link validation failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Idea {0} not found")]
    IdeaNotFound(IdeaId),

    #[error("Idea {0} is not a relationship")]
    NotARelationship(IdeaId),

    /// Simple relationships carry one origin and one target link at most.
    #[error("Simple relationship {relationship} cannot take another {role} link (at most two links, one per role)")]
    SimpleCardinality {
        relationship: IdeaId,
        role: RoleType,
    },

    #[error("Relationship {relationship} already links idea {idea} as {role}")]
    DuplicateRole {
        relationship: IdeaId,
        role: RoleType,
        idea: IdeaId,
    },

    /// Rejected by the metamodel; carries its reason.
    #[error("{0}")]
    Incompatible(String),

    #[error("{0}")]
    Custom(String),
}

/// Trait for link validation rules.
///
/// # Example
///
/// ```
/// # use symbol_composer::domain::Domain;
/// # use symbol_composer::validation::{LinkRequest, LinkValidator, ValidationError, ValidationResult};
/// struct NoSelfLinks;
///
/// impl LinkValidator for NoSelfLinks {
///     fn validate(&self, request: &LinkRequest, _domain: &Domain) -> ValidationResult {
///         if request.idea == request.relationship {
///             ValidationResult::Invalid(ValidationError::Custom("no self links".into()))
///         } else {
///             ValidationResult::Valid
///         }
///     }
/// }
/// ```
pub trait LinkValidator {
    fn validate(&self, request: &LinkRequest, domain: &Domain) -> ValidationResult;
}

/// Both ends of the request must exist and the owner must be a relationship.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExistenceValidator;

impl LinkValidator for ExistenceValidator {
    fn validate(&self, request: &LinkRequest, domain: &Domain) -> ValidationResult {
        let Some(relationship) = domain.idea(request.relationship) else {
            return ValidationResult::Invalid(ValidationError::IdeaNotFound(request.relationship));
        };
        if !relationship.is_relationship() {
            return ValidationResult::Invalid(ValidationError::NotARelationship(
                request.relationship,
            ));
        }
        if domain.idea(request.idea).is_none() {
            return ValidationResult::Invalid(ValidationError::IdeaNotFound(request.idea));
        }
        ValidationResult::Valid
    }
}

/// A simple relationship holds at most two links, one per role. The link
/// being replaced by a relink does not count.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleCapValidator;

impl LinkValidator for SimpleCapValidator {
    fn validate(&self, request: &LinkRequest, domain: &Domain) -> ValidationResult {
        let simple = domain
            .definition_of(request.relationship)
            .is_some_and(|d| d.simple);
        if !simple {
            return ValidationResult::Valid;
        }

        let mut count = 0;
        for link in request.remaining_links(domain) {
            count += 1;
            if link.role == request.role || count >= 2 {
                return ValidationResult::Invalid(ValidationError::SimpleCardinality {
                    relationship: request.relationship,
                    role: request.role,
                });
            }
        }
        ValidationResult::Valid
    }
}

/// No second link with the same role to the same idea.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoleUniquenessValidator;

impl LinkValidator for RoleUniquenessValidator {
    fn validate(&self, request: &LinkRequest, domain: &Domain) -> ValidationResult {
        let duplicate = request
            .remaining_links(domain)
            .any(|link| link.role == request.role && link.idea == request.idea);
        if duplicate {
            ValidationResult::Invalid(ValidationError::DuplicateRole {
                relationship: request.relationship,
                role: request.role,
                idea: request.idea,
            })
        } else {
            ValidationResult::Valid
        }
    }
}

/// Asks the metamodel whether every origin/target pair the new link would
/// form is allowed.
#[derive(Clone, Debug, Default)]
pub struct DomainCompatibilityValidator<M> {
    metamodel: M,
}

impl<M: Metamodel> DomainCompatibilityValidator<M> {
    pub fn new(metamodel: M) -> Self {
        Self { metamodel }
    }
}

impl<M: Metamodel> LinkValidator for DomainCompatibilityValidator<M> {
    fn validate(&self, request: &LinkRequest, domain: &Domain) -> ValidationResult {
        let Some(new_definition) = domain.definition_of(request.idea) else {
            return ValidationResult::Invalid(ValidationError::IdeaNotFound(request.idea));
        };
        let counterpart = request.role.counterpart();

        for link in request.remaining_links(domain) {
            if link.role != counterpart {
                continue;
            }
            let Some(other_definition) = domain.definition_of(link.idea) else {
                continue;
            };
            let verdict = match request.role {
                RoleType::Origin => self.metamodel.can_link(new_definition, other_definition),
                RoleType::Target => self.metamodel.can_link(other_definition, new_definition),
            };
            if let Err(reason) = verdict {
                return ValidationResult::Invalid(ValidationError::Incompatible(reason));
            }
        }
        ValidationResult::Valid
    }
}

/// Composite validator that combines multiple validators
///
/// All validators must return Valid for the link to be valid (AND logic).
/// Returns the first error encountered (short-circuits on failure).
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn LinkValidator>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validators are checked in the order they were added.
    pub fn add<V: LinkValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl LinkValidator for CompositeValidator {
    fn validate(&self, request: &LinkRequest, domain: &Domain) -> ValidationResult {
        for v in &self.validators {
            let result = v.validate(request, domain);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

/// Standard rule set: existence, simple cap, role uniqueness, then the
/// metamodel's compatibility predicate.
pub fn relationship_link_validator<M: Metamodel + 'static>(metamodel: M) -> CompositeValidator {
    CompositeValidator::new()
        .add(ExistenceValidator)
        .add(SimpleCapValidator)
        .add(RoleUniquenessValidator)
        .add(DomainCompatibilityValidator::new(metamodel))
}
