//! Module providing the Model struct for representing a model of metabolism and expression.
//!
//! Reactions in an ME-model are derived values: each one is compiled from the
//! [`process_data::ProcessData`] records it is linked to. Editing a record does not
//! touch any reaction, [`model::Model::update_reaction`] (or
//! [`model::Model::update_parent_reactions`]) has to be called to recompile the
//! dependents. Between the edit and the update the compiled stoichiometry is stale.

pub mod compiler;
pub mod dependency;
pub mod global_info;
pub mod metabolite;
pub mod model;
pub mod process_data;
pub mod reaction;

use derive_builder::UninitializedFieldError;
use thiserror::Error;

/// Errors raised while registering, editing or compiling an ME-model
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MeModelError {
    /// Lookup of an id which isn't in the model
    #[error("{0} not found in the model")]
    NotFound(String),
    /// Registering an id which is already present
    #[error("{0} is already in the model")]
    DuplicateId(String),
    /// A record or reaction references an id which isn't in the model
    #[error("{referenced_by} references {id}, which is not in the model")]
    DanglingReference {
        /// The missing id
        id: String,
        /// The record or reaction holding the reference
        referenced_by: String,
    },
    /// A nucleotide sequence which can't be read
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),
    /// A parameter outside of its allowed range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// The id exists but belongs to a different kind of record
    #[error("{id} is not {expected}")]
    WrongKind {
        /// Id that was looked up
        id: String,
        /// The kind which was requested
        expected: &'static str,
    },
    /// A record can't be removed while reactions are still built from it
    #[error("{id} is still used by {reactions:?}")]
    InUse {
        /// Id of the record
        id: String,
        /// Parent reactions of the record
        reactions: Vec<String>,
    },
}

impl From<UninitializedFieldError> for MeModelError {
    fn from(err: UninitializedFieldError) -> Self {
        MeModelError::InvalidParameter(format!("{} must be set", err.field_name()))
    }
}
