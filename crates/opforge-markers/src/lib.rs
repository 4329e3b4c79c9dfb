//! Opforge Markers - Marker micro-language embedded in manifest comments
//!
//! Markers turn literal manifest values into configurable API fields:
//!
//! ```yaml
//! spec:
//!   replicas: 3  # +opforge:field:name=replicas,type=int,default=2
//! ```
//!
//! Processing a manifest runs three stages:
//! - `scanner`: locate marker comments and the values they annotate
//! - `marker`: classify them into typed [`Marker`] records
//! - `rewriter`: replace annotated values by placeholders such as
//!   `"!!var parent.Spec.Replicas"`, leaving plain YAML behind

pub mod error;
pub mod inspect;
pub mod marker;
pub mod parser;
pub mod rewriter;
pub mod scanner;

pub use error::{MarkerError, MarkerErrorKind, Result};
pub use inspect::{Inspection, inspect};
pub use marker::{FieldMarker, Marker, classify};
pub use parser::{MarkerKind, parse_marker};
pub use rewriter::{downgrade_collection_references, rewrite};
pub use scanner::{Position, ScannedMarker, scan};
