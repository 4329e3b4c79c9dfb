//! Schema merging across a collection and its components

use opforge_core::error::SchemaError;
use opforge_core::field::ApiField;

/// Union of a collection schema and the schemas contributed by components
///
/// Fields keep the order in which they were first seen, collection first.
/// A field present in several schemas is kept once; its documentation comes
/// from the first schema that documents it. The inputs are left untouched.
pub fn merge_schemas(collection: &ApiField, components: &[&ApiField]) -> Result<ApiField, SchemaError> {
    let mut merged = collection.clone();
    for component in components {
        merge_into(&mut merged, component, "")?;
    }
    Ok(merged)
}

fn merge_into(target: &mut ApiField, source: &ApiField, prefix: &str) -> Result<(), SchemaError> {
    for child in &source.children {
        let path = if prefix.is_empty() {
            child.manifest_name.clone()
        } else {
            format!("{}.{}", prefix, child.manifest_name)
        };

        match target.child_index(&child.manifest_name, &path)? {
            Some(index) => {
                let existing = &mut target.children[index];
                if existing.field_type != child.field_type {
                    return Err(SchemaError::ConflictingType {
                        path,
                        existing: existing.field_type,
                        new: child.field_type,
                    });
                }
                if existing.documentation.is_empty() && !child.documentation.is_empty() {
                    existing.documentation = child.documentation.clone();
                }
                if existing.field_type.is_composite() {
                    merge_into(existing, child, &path)?;
                }
            }
            None => target.children.push(child.clone()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opforge_core::field::{FieldDefinition, FieldType};
    use serde_yaml::Value;

    fn schema(fields: &[(&str, FieldType, Value, &str)]) -> ApiField {
        let mut root = ApiField::spec_root();
        for (path, field_type, value, doc) in fields {
            let documentation = if doc.is_empty() {
                Vec::new()
            } else {
                vec![doc.to_string()]
            };
            root.add_field(&FieldDefinition {
                path: path.to_string(),
                field_type: *field_type,
                documentation,
                value: value.clone(),
                has_default: false,
            })
            .unwrap();
        }
        root
    }

    #[test]
    fn test_documentation_is_backfilled() {
        let collection = ApiField::spec_root();
        let a = schema(&[("timeout", FieldType::Integer, Value::from(30), "Request timeout")]);
        let b = schema(&[("timeout", FieldType::Integer, Value::from(30), "")]);

        let merged = merge_schemas(&collection, &[&a, &b]).unwrap();
        assert_eq!(merged.children.len(), 1);
        assert_eq!(
            merged.find("timeout").unwrap().documentation,
            vec!["Request timeout"]
        );

        // undocumented first, documented later
        let merged = merge_schemas(&collection, &[&b, &a]).unwrap();
        assert_eq!(
            merged.find("timeout").unwrap().documentation,
            vec!["Request timeout"]
        );
    }

    #[test]
    fn test_first_documentation_wins() {
        let collection = ApiField::spec_root();
        let a = schema(&[("timeout", FieldType::Integer, Value::from(30), "First")]);
        let b = schema(&[("timeout", FieldType::Integer, Value::from(30), "Second")]);

        let merged = merge_schemas(&collection, &[&a, &b]).unwrap();
        assert_eq!(merged.find("timeout").unwrap().documentation, vec!["First"]);
    }

    #[test]
    fn test_insertion_order_and_nesting() {
        let collection = schema(&[("domain", FieldType::String, Value::from("x.io"), "")]);
        let a = schema(&[
            ("tls.enabled", FieldType::Boolean, Value::Bool(true), ""),
            ("zone", FieldType::String, Value::from("eu"), ""),
        ]);
        let b = schema(&[
            ("tls.secret", FieldType::String, Value::from("cert"), ""),
            ("domain", FieldType::String, Value::from("y.io"), ""),
        ]);

        let merged = merge_schemas(&collection, &[&a, &b]).unwrap();
        let names: Vec<_> = merged.children.iter().map(|c| c.manifest_name.as_str()).collect();
        assert_eq!(names, vec!["domain", "tls", "zone"]);
        assert_eq!(merged.find("tls").unwrap().children.len(), 2);
        assert!(merged.has_unique_siblings());
        // first value wins
        assert_eq!(merged.find("domain").unwrap().default.as_deref(), Some("\"x.io\""));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let collection = ApiField::spec_root();
        let a = schema(&[("timeout", FieldType::Integer, Value::from(30), "")]);
        let b = schema(&[("timeout", FieldType::Integer, Value::from(30), "Documented")]);

        merge_schemas(&collection, &[&a, &b]).unwrap();
        assert!(collection.children.is_empty());
        assert!(a.find("timeout").unwrap().documentation.is_empty());
    }

    #[test]
    fn test_keys_generating_the_same_name() {
        let collection = schema(&[("max-surge", FieldType::String, Value::from("1"), "")]);
        let component = schema(&[("maxSurge", FieldType::String, Value::from("2"), "")]);

        let err = merge_schemas(&collection, &[&component]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateName {
                path: "maxSurge".to_string(),
                name: "MaxSurge".to_string(),
                existing: "max-surge".to_string(),
            }
        );
    }

    #[test]
    fn test_conflicting_types() {
        let collection = ApiField::spec_root();
        let a = schema(&[("port", FieldType::Integer, Value::from(80), "")]);
        let b = schema(&[("port", FieldType::String, Value::from("80"), "")]);

        let err = merge_schemas(&collection, &[&a, &b]).unwrap_err();
        assert!(matches!(err, SchemaError::ConflictingType { ref path, .. } if path == "port"));
    }
}
