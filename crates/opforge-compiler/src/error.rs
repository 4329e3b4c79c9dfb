//! Compiler error types
//!
//! Every error names the manifest it originated from, so callers can report
//! which file (and which document or marker) failed without re-deriving it.

use miette::Diagnostic;
use thiserror::Error;

use opforge_core::error::{NamingError, SchemaError, ValidationError};
use opforge_markers::MarkerError;

#[derive(Error, Debug, Diagnostic)]
pub enum CompileError {
    /// Malformed or misplaced marker
    #[error(transparent)]
    #[diagnostic(transparent)]
    Marker(#[from] MarkerError),

    /// Field path conflicts with an existing field
    #[error("{manifest}: {source}")]
    #[diagnostic(code(opforge::compile::schema))]
    Schema {
        manifest: String,
        #[source]
        source: SchemaError,
    },

    /// Cleaned document is not valid YAML
    #[error("{manifest}: document {document}: {source}")]
    #[diagnostic(code(opforge::compile::decode))]
    Decode {
        manifest: String,
        document: usize,
        #[source]
        source: serde_yaml::Error,
    },

    /// Document is not a Kubernetes-style object
    #[error("{manifest}: document {document}: {message}")]
    #[diagnostic(code(opforge::compile::resource))]
    InvalidResource {
        manifest: String,
        document: usize,
        message: String,
    },

    /// Two objects of one unit map to the same resource identifier
    #[error("{manifest}: document {document}: resource name '{name}' is already used by an object in {first}")]
    #[diagnostic(
        code(opforge::compile::duplicate_resource),
        help("rename one of the objects; '-' and '.' in names map to the same identifier")
    )]
    DuplicateResourceName {
        name: String,
        first: String,
        manifest: String,
        document: usize,
    },

    /// Generated file names could not be made unique
    #[error(transparent)]
    #[diagnostic(code(opforge::compile::naming))]
    Naming(#[from] NamingError),

    /// Naming context is incomplete
    #[error("{unit}: {source}")]
    #[diagnostic(
        code(opforge::compile::validation),
        help("set the missing fields in the workload configuration")
    )]
    Validation {
        unit: String,
        #[source]
        source: ValidationError,
    },
}

impl CompileError {
    /// Manifest the error originated from, when it concerns a single one
    pub fn manifest(&self) -> Option<&str> {
        match self {
            Self::Marker(e) => Some(&e.manifest),
            Self::Schema { manifest, .. }
            | Self::Decode { manifest, .. }
            | Self::InvalidResource { manifest, .. }
            | Self::DuplicateResourceName { manifest, .. } => Some(manifest),
            Self::Naming(_) | Self::Validation { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
