//! Scan, classify and rewrite a manifest in one pass

use opforge_core::workload::UnitKind;

use crate::error::{MarkerError, MarkerErrorKind, Result};
use crate::marker::{Marker, classify};
use crate::rewriter::{downgrade_collection_references, rewrite};
use crate::scanner::scan;

/// Markers of a manifest and its cleaned document
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    /// Manifest text with markers replaced by placeholders
    pub document: String,
    /// Markers in discovery order
    pub markers: Vec<Marker>,
}

impl Inspection {
    pub fn field_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| !m.is_collection())
    }

    pub fn collection_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| m.is_collection())
    }
}

/// Inspect `text` as a manifest of a unit of kind `unit`
///
/// Collection markers are rejected in standalone units. In the collection
/// unit itself, collection placeholders are pointed at the parent resource.
pub fn inspect(manifest: &str, text: &str, unit: UnitKind) -> Result<Inspection> {
    let markers = scan(manifest, text)?
        .iter()
        .map(|scanned| classify(manifest, text, scanned))
        .collect::<Result<Vec<_>>>()?;

    if unit == UnitKind::Standalone {
        if let Some(marker) = markers.iter().find(|m| m.is_collection()) {
            let position = marker.field().position;
            return Err(MarkerError::new(
                MarkerErrorKind::CollectionMarkerOutsideCollection,
                format!(
                    "collection marker '{}' used outside of a collection",
                    marker.field().name
                ),
                manifest,
                text,
                position.offset,
                position.len,
            )
            .with_suggestion("use +opforge:field for standalone workloads"));
        }
    }

    let mut document = rewrite(text, &markers);
    if unit == UnitKind::Collection {
        document = downgrade_collection_references(&document);
    }

    tracing::debug!(manifest, markers = markers.len(), ?unit, "inspected manifest");

    Ok(Inspection { document, markers })
}
