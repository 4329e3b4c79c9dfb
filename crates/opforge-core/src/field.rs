//! API field schema tree
//!
//! Markers found in manifests are folded into a tree of [`ApiField`] nodes
//! rooted at a synthetic `Spec` composite. The tree is what the generator
//! renders into API types and sample manifests.
//!
//! ```text
//! spec:                       ApiField { Spec, Composite }
//!   webStore:                   ApiField { WebStore, Composite }
//!     replicas: 3                 ApiField { Replicas, Integer }
//!     image: "nginx:1.25"         ApiField { Image, String }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::SchemaError;
use crate::naming::to_pascal_case;

// =============================================================================
// FIELD TYPES
// =============================================================================

/// Scalar element type of a list field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    String,
    Integer,
    Boolean,
    Float,
}

impl ScalarType {
    fn as_field_type(self) -> FieldType {
        match self {
            Self::String => FieldType::String,
            Self::Integer => FieldType::Integer,
            Self::Boolean => FieldType::Boolean,
            Self::Float => FieldType::Float,
        }
    }
}

/// Declared type of an API field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Boolean,
    Float,
    /// Nested object owning child fields
    Composite,
    /// List of scalars
    List(ScalarType),
}

impl FieldType {
    /// Parse a marker `type=` keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let field_type = match keyword {
            "string" => Self::String,
            "int" | "integer" => Self::Integer,
            "bool" | "boolean" => Self::Boolean,
            "float" | "number" => Self::Float,
            "[]string" => Self::List(ScalarType::String),
            "[]int" | "[]integer" => Self::List(ScalarType::Integer),
            "[]bool" | "[]boolean" => Self::List(ScalarType::Boolean),
            "[]float" | "[]number" => Self::List(ScalarType::Float),
            _ => return None,
        };
        Some(field_type)
    }

    #[inline]
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite)
    }

    /// Coerce a decoded literal into this type
    ///
    /// Returns `None` when the literal cannot represent a value of this type.
    /// Numbers and booleans are accepted for string fields and rendered as text.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (Self::String, Value::String(_)) => Some(value.clone()),
            (Self::String, Value::Number(n)) => Some(Value::String(n.to_string())),
            (Self::String, Value::Bool(b)) => Some(Value::String(b.to_string())),

            (Self::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => Some(value.clone()),
            (Self::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),

            (Self::Boolean, Value::Bool(_)) => Some(value.clone()),
            (Self::Boolean, Value::String(s)) => match s.trim() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },

            (Self::Float, Value::Number(_)) => Some(value.clone()),
            (Self::Float, Value::String(s)) => s.trim().parse::<f64>().ok().map(Value::from),

            (Self::List(element), Value::Sequence(items)) => items
                .iter()
                .map(|item| element.as_field_type().coerce(item))
                .collect::<Option<Vec<_>>>()
                .map(Value::Sequence),

            _ => None,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "int"),
            Self::Boolean => write!(f, "bool"),
            Self::Float => write!(f, "float64"),
            Self::Composite => write!(f, "struct"),
            Self::List(element) => write!(f, "[]{}", element.as_field_type()),
        }
    }
}

/// Quote a string as a double-quoted literal
pub fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value))
}

/// Render a literal in its natural source form
///
/// Strings are quoted, scalars keep their plain form and lists become flow
/// lists: `["a", "b"]`.
pub fn render_literal(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        Value::Sequence(items) => format!(
            "[{}]",
            items.iter().map(render_literal).collect::<Vec<_>>().join(", ")
        ),
        Value::Tagged(tagged) => render_literal(&tagged.value),
        Value::Mapping(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Literal form used in `+kubebuilder:default=` annotations
fn render_default_marker(value: &Value) -> String {
    match value {
        Value::Sequence(items) => format!(
            "{{{}}}",
            items.iter().map(render_literal).collect::<Vec<_>>().join(",")
        ),
        other => render_literal(other),
    }
}

// =============================================================================
// SCHEMA TREE
// =============================================================================

/// One field to insert into the schema tree
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Dotted path below `spec`, e.g. `webStore.replicas`
    pub path: String,
    pub field_type: FieldType,
    pub documentation: Vec<String>,
    /// Already coerced to `field_type`
    pub value: Value,
    /// Whether `value` came from an explicit default
    pub has_default: bool,
}

/// A node of the API schema tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiField {
    /// Identifier used in generated types (PascalCase)
    pub name: String,
    /// Key used in manifests (as written in the marker path)
    pub manifest_name: String,
    pub field_type: FieldType,
    /// Struct type name, composites only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_name: Option<String>,
    pub tags: String,
    /// Default literal (`DefaultVal`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub has_default: bool,
    /// Sample manifest line (`SampleField`)
    pub sample: String,
    pub documentation: Vec<String>,
    /// Generator annotations emitted above the field
    pub markers: Vec<String>,
    pub children: Vec<ApiField>,
}

fn json_tag(key: &str) -> String {
    format!("`json:\"{},omitempty\"`", key)
}

impl ApiField {
    /// The synthetic root node every schema starts from
    pub fn spec_root() -> Self {
        Self {
            name: "Spec".to_string(),
            manifest_name: "spec".to_string(),
            field_type: FieldType::Composite,
            struct_name: Some("Spec".to_string()),
            tags: "`json:\"spec\"`".to_string(),
            default: None,
            has_default: false,
            sample: "spec:".to_string(),
            documentation: Vec::new(),
            markers: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Optional selector a component uses to find its collection at runtime
    pub fn collection_reference(collection_kind: &str, cluster_scoped: bool) -> Self {
        let sample_namespace = if cluster_scoped { "" } else { "default" };
        let sample_name = format!("{}-sample", collection_kind.to_lowercase());

        let name = Self {
            name: "Name".to_string(),
            manifest_name: "name".to_string(),
            field_type: FieldType::String,
            struct_name: None,
            tags: "`json:\"name\"`".to_string(),
            default: None,
            has_default: false,
            sample: format!("#name: {}", quote(&sample_name)),
            documentation: vec![
                "Required if specifying collection.  The name of the collection".to_string(),
                "within a specific collection.namespace to reference.".to_string(),
            ],
            markers: vec!["+kubebuilder:validation:Required".to_string()],
            children: Vec::new(),
        };

        let namespace = Self {
            name: "Namespace".to_string(),
            manifest_name: "namespace".to_string(),
            field_type: FieldType::String,
            struct_name: None,
            tags: "`json:\"namespace\"`".to_string(),
            default: None,
            has_default: false,
            sample: format!("#namespace: {}", quote(sample_namespace)),
            documentation: vec![
                "(Default: \"\") The namespace where the collection exists.  Required only if"
                    .to_string(),
                "the collection is namespace scoped and not cluster scoped.".to_string(),
            ],
            markers: vec!["+kubebuilder:validation:Optional".to_string()],
            children: Vec::new(),
        };

        Self {
            name: "Collection".to_string(),
            manifest_name: "collection".to_string(),
            field_type: FieldType::Composite,
            struct_name: Some("CollectionSpec".to_string()),
            tags: "`json:\"collection\"`".to_string(),
            default: None,
            has_default: false,
            sample: "#collection:".to_string(),
            documentation: vec![
                "Specifies a reference to the collection to use for this workload.".to_string(),
                "Requires the name and namespace input to find the collection.".to_string(),
                "If no collection field is set, default to selecting the only".to_string(),
                "workload collection in the cluster, which will result in an error".to_string(),
                "if not exactly one collection is found.".to_string(),
            ],
            markers: vec!["+kubebuilder:validation:Optional".to_string()],
            children: vec![name, namespace],
        }
    }

    fn composite(key: &str, parent_struct: &str) -> Self {
        let name = to_pascal_case(key);
        Self {
            struct_name: Some(format!("{}{}", parent_struct, name)),
            name,
            manifest_name: key.to_string(),
            field_type: FieldType::Composite,
            tags: json_tag(key),
            default: None,
            has_default: false,
            sample: format!("{}:", key),
            documentation: Vec::new(),
            markers: vec!["+kubebuilder:validation:Optional".to_string()],
            children: Vec::new(),
        }
    }

    fn leaf(key: &str, definition: &FieldDefinition) -> Self {
        let literal = render_literal(&definition.value);
        let markers = if definition.has_default {
            vec![
                format!(
                    "+kubebuilder:default={}",
                    render_default_marker(&definition.value)
                ),
                "+kubebuilder:validation:Optional".to_string(),
            ]
        } else {
            vec!["+kubebuilder:validation:Required".to_string()]
        };

        Self {
            name: to_pascal_case(key),
            manifest_name: key.to_string(),
            field_type: definition.field_type,
            struct_name: None,
            tags: json_tag(key),
            sample: format!("{}: {}", key, literal),
            default: Some(literal),
            has_default: definition.has_default,
            documentation: definition.documentation.clone(),
            markers,
            children: Vec::new(),
        }
    }

    /// Insert a field at the dotted path of `definition`
    ///
    /// Intermediate composites are created on the way down. Inserting onto an
    /// existing field of the same type is a no-op, except that documentation
    /// is back-filled when the existing field has none. Keys whose generated
    /// field or struct names clash with existing ones are rejected.
    pub fn add_field(&mut self, definition: &FieldDefinition) -> Result<(), SchemaError> {
        let segments: Vec<&str> = definition.path.split('.').collect();

        if let Some(segment) = segments.iter().find(|s| !is_valid_segment(s)) {
            return Err(SchemaError::InvalidPath {
                path: definition.path.clone(),
                reason: format!("invalid segment '{}'", segment),
            });
        }

        self.check_struct_names(&segments, &definition.path)?;
        self.insert(&segments, 0, definition)
    }

    /// Index of the child stored under the manifest key `key`
    ///
    /// Siblings must generate distinct names. A child with the same generated
    /// name under a different key (`max-surge` next to `maxSurge`) is an error.
    pub fn child_index(&self, key: &str, path: &str) -> Result<Option<usize>, SchemaError> {
        let name = to_pascal_case(key);
        match self.children.iter().position(|c| c.name == name) {
            Some(index) if self.children[index].manifest_name != key => {
                Err(SchemaError::DuplicateName {
                    path: path.to_string(),
                    name,
                    existing: self.children[index].manifest_name.clone(),
                })
            }
            found => Ok(found),
        }
    }

    /// Composites created along `segments` must not reuse a struct name
    fn check_struct_names(&self, segments: &[&str], path: &str) -> Result<(), SchemaError> {
        let mut node = Some(self);
        let mut parent_struct = self.struct_name.clone().unwrap_or_else(|| self.name.clone());

        for segment in &segments[..segments.len() - 1] {
            let struct_name = format!("{}{}", parent_struct, to_pascal_case(segment));
            node = node.and_then(|n| n.children.iter().find(|c| c.manifest_name == *segment));

            match node {
                Some(existing) if !existing.field_type.is_composite() => break,
                Some(_) => {}
                None => {
                    if let Some(existing) = self.struct_path(&struct_name, "") {
                        return Err(SchemaError::DuplicateName {
                            path: path.to_string(),
                            name: struct_name,
                            existing,
                        });
                    }
                }
            }
            parent_struct = struct_name;
        }

        Ok(())
    }

    fn struct_path(&self, struct_name: &str, prefix: &str) -> Option<String> {
        self.children
            .iter()
            .filter(|child| child.field_type.is_composite())
            .find_map(|child| {
                let path = if prefix.is_empty() {
                    child.manifest_name.clone()
                } else {
                    format!("{}.{}", prefix, child.manifest_name)
                };
                if child.struct_name.as_deref() == Some(struct_name) {
                    Some(path)
                } else {
                    child.struct_path(struct_name, &path)
                }
            })
    }

    fn insert(
        &mut self,
        segments: &[&str],
        depth: usize,
        definition: &FieldDefinition,
    ) -> Result<(), SchemaError> {
        let key = segments[depth];
        let position = self.child_index(key, &segments[..=depth].join("."))?;

        if depth + 1 == segments.len() {
            match position {
                Some(index) => {
                    let existing = &mut self.children[index];
                    if existing.field_type != definition.field_type {
                        return Err(SchemaError::ConflictingType {
                            path: definition.path.clone(),
                            existing: existing.field_type,
                            new: definition.field_type,
                        });
                    }
                    if existing.documentation.is_empty() && !definition.documentation.is_empty() {
                        existing.documentation = definition.documentation.clone();
                    }
                }
                None => self.children.push(Self::leaf(key, definition)),
            }
            return Ok(());
        }

        let index = match position {
            Some(index) => {
                let existing = &self.children[index];
                if !existing.field_type.is_composite() {
                    return Err(SchemaError::ConflictingType {
                        path: segments[..=depth].join("."),
                        existing: existing.field_type,
                        new: FieldType::Composite,
                    });
                }
                index
            }
            None => {
                let parent_struct = self.struct_name.clone().unwrap_or_else(|| self.name.clone());
                self.children.push(Self::composite(key, &parent_struct));
                self.children.len() - 1
            }
        };

        self.children[index].insert(segments, depth + 1, definition)
    }

    /// Look up a descendant by dotted manifest path
    pub fn find(&self, path: &str) -> Option<&ApiField> {
        path.split('.').try_fold(self, |node, key| {
            node.children.iter().find(|c| c.manifest_name == key)
        })
    }

    /// Type name used when rendering generated API types
    pub fn type_name(&self) -> String {
        match self.field_type {
            FieldType::Composite => self.struct_name.clone().unwrap_or_else(|| self.name.clone()),
            other => other.to_string(),
        }
    }

    /// Check that no composite holds two children with the same generated name
    pub fn has_unique_siblings(&self) -> bool {
        let mut seen = HashSet::new();
        self.children
            .iter()
            .all(|child| seen.insert(child.name.as_str()))
            && self.children.iter().all(ApiField::has_unique_siblings)
    }

    /// Render the tree as an indented sample manifest block
    pub fn sample_yaml(&self) -> String {
        let mut out = String::new();
        self.write_sample(&mut out, 0);
        out
    }

    fn write_sample(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.sample);
        out.push('\n');
        for child in &self.children {
            child.write_sample(out, depth + 1);
        }
    }
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(path: &str, field_type: FieldType, value: Value) -> FieldDefinition {
        FieldDefinition {
            path: path.to_string(),
            field_type,
            documentation: Vec::new(),
            value,
            has_default: false,
        }
    }

    #[test]
    fn test_field_type_keywords() {
        assert_eq!(FieldType::from_keyword("int"), Some(FieldType::Integer));
        assert_eq!(FieldType::from_keyword("boolean"), Some(FieldType::Boolean));
        assert_eq!(
            FieldType::from_keyword("[]string"),
            Some(FieldType::List(ScalarType::String))
        );
        assert_eq!(FieldType::from_keyword("struct"), None);
        assert_eq!(FieldType::from_keyword("strin"), None);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(
            FieldType::Integer.coerce(&Value::from("3")),
            Some(Value::from(3))
        );
        assert_eq!(FieldType::Integer.coerce(&Value::from("three")), None);
        assert_eq!(
            FieldType::String.coerce(&Value::from(8080)),
            Some(Value::from("8080"))
        );
        assert_eq!(
            FieldType::Boolean.coerce(&Value::from("true")),
            Some(Value::Bool(true))
        );
        assert_eq!(FieldType::Boolean.coerce(&Value::from(1)), None);

        let list: Value = serde_yaml::from_str("[1, 2]").unwrap();
        assert_eq!(
            FieldType::List(ScalarType::String).coerce(&list),
            Some(serde_yaml::from_str::<Value>("['1', '2']").unwrap())
        );
        assert_eq!(FieldType::List(ScalarType::Integer).coerce(&Value::from(1)), None);
    }

    #[test]
    fn test_integer_leaf_sample_and_default() {
        let mut root = ApiField::spec_root();
        root.add_field(&definition("replicas", FieldType::Integer, Value::from(3)))
            .unwrap();

        let field = root.find("replicas").unwrap();
        assert_eq!(field.name, "Replicas");
        assert_eq!(field.default.as_deref(), Some("3"));
        assert_eq!(field.sample, "replicas: 3");
        assert_eq!(field.tags, "`json:\"replicas,omitempty\"`");
        assert_eq!(field.markers, vec!["+kubebuilder:validation:Required"]);
    }

    #[test]
    fn test_string_leaf_is_quoted() {
        let mut root = ApiField::spec_root();
        root.add_field(&definition("name", FieldType::String, Value::from("widget")))
            .unwrap();

        let field = root.find("name").unwrap();
        assert_eq!(field.default.as_deref(), Some("\"widget\""));
        assert_eq!(field.sample, "name: \"widget\"");
    }

    #[test]
    fn test_explicit_default_markers() {
        let mut root = ApiField::spec_root();
        let mut def = definition("tls.enabled", FieldType::Boolean, Value::Bool(false));
        def.has_default = true;
        root.add_field(&def).unwrap();

        let field = root.find("tls.enabled").unwrap();
        assert_eq!(
            field.markers,
            vec![
                "+kubebuilder:default=false",
                "+kubebuilder:validation:Optional"
            ]
        );
    }

    #[test]
    fn test_nested_paths_create_composites() {
        let mut root = ApiField::spec_root();
        root.add_field(&definition(
            "webStore.replicas",
            FieldType::Integer,
            Value::from(2),
        ))
        .unwrap();
        root.add_field(&definition(
            "webStore.image",
            FieldType::String,
            Value::from("nginx"),
        ))
        .unwrap();

        assert_eq!(root.children.len(), 1);
        let store = root.find("webStore").unwrap();
        assert_eq!(store.field_type, FieldType::Composite);
        assert_eq!(store.struct_name.as_deref(), Some("SpecWebStore"));
        assert_eq!(store.type_name(), "SpecWebStore");
        assert_eq!(store.sample, "webStore:");
        assert_eq!(store.children.len(), 2);
        assert!(root.has_unique_siblings());
    }

    #[test]
    fn test_conflicting_type_is_an_error() {
        let mut root = ApiField::spec_root();
        root.add_field(&definition("port", FieldType::Integer, Value::from(80)))
            .unwrap();

        let err = root
            .add_field(&definition("port", FieldType::String, Value::from("80")))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::ConflictingType {
                path: "port".to_string(),
                existing: FieldType::Integer,
                new: FieldType::String,
            }
        );
    }

    #[test]
    fn test_scalar_cannot_become_parent() {
        let mut root = ApiField::spec_root();
        root.add_field(&definition("image", FieldType::String, Value::from("nginx")))
            .unwrap();

        let err = root
            .add_field(&definition("image.tag", FieldType::String, Value::from("1.25")))
            .unwrap_err();
        assert!(matches!(err, SchemaError::ConflictingType { ref path, .. } if path == "image"));
    }

    #[test]
    fn test_keys_generating_the_same_name() {
        let mut root = ApiField::spec_root();
        root.add_field(&definition("max-surge", FieldType::String, Value::from("1")))
            .unwrap();

        let err = root
            .add_field(&definition("maxSurge", FieldType::String, Value::from("2")))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateName {
                path: "maxSurge".to_string(),
                name: "MaxSurge".to_string(),
                existing: "max-surge".to_string(),
            }
        );
        assert_eq!(root.children.len(), 1);
        assert!(root.has_unique_siblings());

        root.add_field(&definition("web-store.x", FieldType::String, Value::from("a")))
            .unwrap();
        let err = root
            .add_field(&definition("webStore.y", FieldType::String, Value::from("b")))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateName { ref existing, .. } if existing == "web-store"));
    }

    #[test]
    fn test_struct_names_are_unique_across_levels() {
        let mut root = ApiField::spec_root();
        root.add_field(&definition("webStore.port", FieldType::Integer, Value::from(80)))
            .unwrap();

        // web.store would also generate SpecWebStore
        let err = root
            .add_field(&definition("web.store.port", FieldType::Integer, Value::from(81)))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateName {
                path: "web.store.port".to_string(),
                name: "SpecWebStore".to_string(),
                existing: "webStore".to_string(),
            }
        );
        assert!(root.find("web").is_none());
    }

    #[test]
    fn test_unique_siblings_compares_generated_names() {
        let mut root = ApiField::spec_root();
        root.add_field(&definition("max-surge", FieldType::String, Value::from("1")))
            .unwrap();
        let mut twin = root.children[0].clone();
        twin.manifest_name = "maxSurge".to_string();
        root.children.push(twin);

        assert!(!root.has_unique_siblings());
    }

    #[test]
    fn test_same_type_merge_backfills_documentation() {
        let mut root = ApiField::spec_root();
        root.add_field(&definition("timeout", FieldType::Integer, Value::from(30)))
            .unwrap();

        let mut documented = definition("timeout", FieldType::Integer, Value::from(60));
        documented.documentation = vec!["Request timeout".to_string()];
        root.add_field(&documented).unwrap();

        let field = root.find("timeout").unwrap();
        assert_eq!(field.documentation, vec!["Request timeout"]);
        // first value wins
        assert_eq!(field.default.as_deref(), Some("30"));
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_invalid_path() {
        let mut root = ApiField::spec_root();
        let err = root
            .add_field(&definition("a..b", FieldType::String, Value::from("x")))
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPath { .. }));
    }

    #[test]
    fn test_list_literal() {
        let mut root = ApiField::spec_root();
        let mut def = definition(
            "args",
            FieldType::List(ScalarType::String),
            serde_yaml::from_str("[a, b]").unwrap(),
        );
        def.has_default = true;
        root.add_field(&def).unwrap();

        let field = root.find("args").unwrap();
        assert_eq!(field.sample, "args: [\"a\", \"b\"]");
        assert_eq!(field.markers[0], "+kubebuilder:default={\"a\",\"b\"}");
        assert_eq!(field.type_name(), "[]string");
    }

    #[test]
    fn test_sample_yaml() {
        let mut root = ApiField::spec_root();
        root.add_field(&definition("webStore.replicas", FieldType::Integer, Value::from(2)))
            .unwrap();
        root.add_field(&definition("name", FieldType::String, Value::from("shop")))
            .unwrap();
        root.children.push(ApiField::collection_reference("Platform", false));

        insta::assert_snapshot!(root.sample_yaml(), @r###"
        spec:
          webStore:
            replicas: 2
          name: "shop"
          #collection:
            #name: "platform-sample"
            #namespace: "default"
        "###);
    }

    #[test]
    fn test_collection_reference_cluster_scoped() {
        let field = ApiField::collection_reference("Platform", true);
        assert_eq!(field.children[1].sample, "#namespace: \"\"");
        assert_eq!(field.type_name(), "CollectionSpec");
    }
}
