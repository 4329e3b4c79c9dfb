//! Core error types

use thiserror::Error;

use crate::field::FieldType;

/// Errors raised while folding fields into the API schema tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("duplicate field with conflicting type at '{path}': existing {existing}, new {new}")]
    ConflictingType {
        path: String,
        existing: FieldType,
        new: FieldType,
    },

    #[error("field '{path}' generates the name '{name}', already used by '{existing}'")]
    DuplicateName {
        path: String,
        name: String,
        existing: String,
    },

    #[error("invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

/// Raised when generated file names cannot be made unique
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("unable to find a free file name for '{candidate}' after {attempts} attempts")]
    Exhausted { candidate: String, attempts: usize },
}

/// Required top-level fields are absent from the naming context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required fields: {}", missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<String>,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to parse options: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
