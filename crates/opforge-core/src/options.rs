//! Compiler configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options controlling naming and role inference
///
/// ```yaml
/// reservedFileNames: [resources.go]
/// readOnlyKinds: [Secret]
/// objectVarName: resourceObj
/// sourceExtension: go
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// File names the generator always produces itself
    #[serde(default = "default_reserved_file_names")]
    pub reserved_file_names: Vec<String>,

    /// Kinds the controller only reads (default: none)
    #[serde(default)]
    pub read_only_kinds: Vec<String>,

    /// Variable holding the object in generated construction code
    #[serde(default = "default_object_var_name")]
    pub object_var_name: String,

    /// Extension of generated source files (default: go)
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            reserved_file_names: default_reserved_file_names(),
            read_only_kinds: Vec::new(),
            object_var_name: default_object_var_name(),
            source_extension: default_source_extension(),
        }
    }
}

impl CompilerOptions {
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn is_read_only_kind(&self, kind: &str) -> bool {
        self.read_only_kinds.iter().any(|k| k == kind)
    }
}

fn default_reserved_file_names() -> Vec<String> {
    vec!["resources.go".to_string()]
}

fn default_object_var_name() -> String {
    "resourceObj".to_string()
}

fn default_source_extension() -> String {
    "go".to_string()
}
