//! Compiled child resources and their grouping into source files

use serde::{Deserialize, Serialize};

use crate::rbac::ResourceAccess;

/// Split an `apiVersion` into `(group, version)`
///
/// Core resources have no group: `v1` yields `("", "v1")`.
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    match api_version.rsplit_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    }
}

/// One object decoded from a manifest document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildResource {
    /// `metadata.name` as written (may hold placeholders)
    pub name: String,
    /// Identifier derived from kind, namespace and name
    pub unique_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub group: String,
    pub version: String,
    pub kind: String,
    #[serde(default)]
    pub access: ResourceAccess,
    /// Construction fragment for the generated controller
    pub source_code: String,
    /// Cleaned document, re-serialized
    pub static_content: String,
}

impl ChildResource {
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

/// A generated file and the resources it constructs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub filename: String,
    /// Manifest the file was generated from
    pub manifest: String,
    pub children: Vec<ChildResource>,
}
