//! Marker error types with source locations

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Error kind for categorizing marker errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MarkerErrorKind {
    /// Grammar failure, e.g. an unterminated quote
    Syntax,
    UnknownType,
    /// Unknown, duplicated or missing argument
    InvalidArgument,
    /// Literal not representable in the declared type
    InvalidValue,
    /// Nothing for the marker to annotate
    NoTarget,
    DuplicateTarget,
    ReplaceNotFound,
    /// Collection marker in a unit that belongs to no collection
    CollectionMarkerOutsideCollection,
}

impl MarkerErrorKind {
    /// Convert to a code string for diagnostics
    pub fn to_code_string(&self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::UnknownType => "unknown_type",
            Self::InvalidArgument => "invalid_argument",
            Self::InvalidValue => "invalid_value",
            Self::NoTarget => "no_target",
            Self::DuplicateTarget => "duplicate_target",
            Self::ReplaceNotFound => "replace_not_found",
            Self::CollectionMarkerOutsideCollection => "collection_marker",
        }
    }
}

/// Malformed or misplaced marker, located in its manifest
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("{manifest}:{line}:{column}: {message}")]
#[diagnostic(code(opforge::marker))]
pub struct MarkerError {
    pub message: String,

    pub kind: MarkerErrorKind,

    /// Manifest identifier
    pub manifest: String,

    /// 1-based line of the offending marker
    pub line: usize,

    /// 1-based column of the offending marker
    pub column: usize,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("marker defined here")]
    pub span: Option<SourceSpan>,

    #[help]
    pub suggestion: Option<String>,
}

impl MarkerError {
    /// Create an error for the byte range `offset..offset + len` of `source`
    pub fn new(
        kind: MarkerErrorKind,
        message: impl Into<String>,
        manifest: &str,
        source: &str,
        offset: usize,
        len: usize,
    ) -> Self {
        let offset = offset.min(source.len());
        let (line, column) = line_column(source, offset);

        Self {
            message: message.into(),
            kind,
            manifest: manifest.to_string(),
            line,
            column,
            src: NamedSource::new(manifest, source.to_string()),
            span: Some(SourceSpan::new(offset.into(), len)),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// 1-based line and column of a byte offset
pub(crate) fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

pub type Result<T> = std::result::Result<T, MarkerError>;
