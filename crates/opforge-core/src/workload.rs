//! Naming context of the API a unit is compiled for

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Role of a manifest-processing unit within a workload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitKind {
    /// Not part of any collection
    #[default]
    Standalone,
    /// The collection itself
    Collection,
    /// A component managed by a collection
    Component,
}

impl UnitKind {
    /// Map the `(collection-scoped, collection resources)` flag pair
    pub fn from_flags(collection: bool, collection_resources: bool) -> Self {
        match (collection, collection_resources) {
            (false, _) => Self::Standalone,
            (true, true) => Self::Collection,
            (true, false) => Self::Component,
        }
    }

    pub fn is_collection_scoped(self) -> bool {
        !matches!(self, Self::Standalone)
    }

    pub fn has_collection_resources(self) -> bool {
        matches!(self, Self::Collection)
    }
}

/// Group/version/kind of a generated API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadApi {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub cluster_scoped: bool,
}

impl WorkloadApi {
    /// Fully qualified group, e.g. `apps.example.io`
    pub fn full_group(&self) -> String {
        format!("{}.{}", self.group, self.domain)
    }

    pub fn api_version(&self) -> String {
        format!("{}/{}", self.full_group(), self.version)
    }

    /// Check required naming fields are present
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let missing: Vec<String> = [
            ("spec.api.domain", &self.domain),
            ("spec.api.group", &self.group),
            ("spec.api.version", &self.version),
            ("spec.api.kind", &self.kind),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}
