//! Error types for composer operations.
//!
//! [`ComposerError`] is returned by every fallible editor operation. None of
//! its variants is fatal: the interaction layer logs the message, discards
//! the enclosing transaction and returns to idle.

use thiserror::Error;

use crate::domain::{DefinitionId, IdeaId};
use crate::validation::ValidationError;
use crate::view::ObjectId;

#[derive(Debug, Error)]
pub enum ComposerError {
    #[error("Cannot link: {0}")]
    Validation(#[from] ValidationError),

    /// The manipulated object disappeared, e.g. removed by an undo.
    #[error("Visual object {0} no longer exists")]
    StaleReference(ObjectId),

    #[error("Idea {0} not found")]
    IdeaNotFound(IdeaId),

    #[error("Definition {0} not found")]
    DefinitionNotFound(DefinitionId),

    #[error("Visual object {0} is not a symbol")]
    NotASymbol(ObjectId),

    #[error("Visual object {object} does not support {operation}")]
    Unsupported {
        object: ObjectId,
        operation: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl ComposerError {
    /// Whether the error came from link validation rules.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
