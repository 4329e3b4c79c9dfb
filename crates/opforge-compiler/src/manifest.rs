//! Manifest inputs and document decoding

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use opforge_core::options::CompilerOptions;
use opforge_core::rbac::{ACCESS_ANNOTATION, ResourceAccess};
use opforge_core::resource::split_api_version;
use opforge_core::workload::WorkloadApi;

use crate::error::{CompileError, Result};

/// `---` on its own line, optionally followed by a comment
static DOCUMENT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^---[ \t]*(?:#.*)?\r?$").expect("valid regex"));

/// Raw text of one manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSource {
    /// Identifier used in errors and for the generated file name
    pub name: String,
    pub content: String,
}

impl ManifestSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A logical unit compiled as a whole: a workload, a collection or a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadUnit {
    pub name: String,
    pub api: WorkloadApi,
    #[serde(default)]
    pub manifests: Vec<ManifestSource>,
}

impl WorkloadUnit {
    pub fn new(name: impl Into<String>, api: WorkloadApi) -> Self {
        Self {
            name: name.into(),
            api,
            manifests: Vec::new(),
        }
    }

    pub fn with_manifest(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.manifests.push(ManifestSource::new(name, content));
        self
    }
}

/// Split a multi-document stream, dropping documents with no content
pub fn split_documents(text: &str) -> Vec<&str> {
    DOCUMENT_SEPARATOR
        .split(text)
        .filter(|document| {
            document.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#')
            })
        })
        .collect()
}

/// A decoded object and the identity fields the compiler needs
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedResource {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub namespace: Option<String>,
    pub object: Value,
}

impl DecodedResource {
    pub fn group(&self) -> &str {
        split_api_version(&self.api_version).0
    }

    pub fn version(&self) -> &str {
        split_api_version(&self.api_version).1
    }

    /// Role the controller takes for this object
    ///
    /// The access annotation wins over the configured read-only kinds.
    pub fn access(&self, options: &CompilerOptions) -> ResourceAccess {
        let annotated = self
            .object
            .get("metadata")
            .and_then(|m| m.get("annotations"))
            .and_then(|a| a.get(ACCESS_ANNOTATION))
            .and_then(Value::as_str)
            .and_then(ResourceAccess::from_annotation);

        match annotated {
            Some(access) => access,
            None if options.is_read_only_kind(&self.kind) => ResourceAccess::ReadOnly,
            None => ResourceAccess::Owned,
        }
    }
}

/// Decode one document of a cleaned manifest
///
/// `document` is the 1-based index used in error messages. Documents that
/// decode to nothing yield `Ok(None)`.
pub fn decode_resource(manifest: &str, document: usize, text: &str) -> Result<Option<DecodedResource>> {
    let object: Value = serde_yaml::from_str(text).map_err(|source| CompileError::Decode {
        manifest: manifest.to_string(),
        document,
        source,
    })?;

    let invalid = |message: &str| CompileError::InvalidResource {
        manifest: manifest.to_string(),
        document,
        message: message.to_string(),
    };

    if object.is_null() {
        return Ok(None);
    }
    if !object.is_mapping() {
        return Err(invalid("document is not a mapping"));
    }

    let field = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
    let metadata = |key: &str| {
        object
            .get("metadata")
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let api_version = field("apiVersion").ok_or_else(|| invalid("missing apiVersion"))?;
    let kind = field("kind").ok_or_else(|| invalid("missing kind"))?;
    let name = metadata("name").ok_or_else(|| invalid("missing metadata.name"))?;
    let namespace = metadata("namespace");

    Ok(Some(DecodedResource {
        api_version,
        kind,
        name,
        namespace,
        object,
    }))
}
