//! Typed marker records
//!
//! The classifier turns a [`ScannedMarker`] into a [`Marker`]: it validates
//! the argument set, resolves the declared type, coerces the default and the
//! annotated value, and computes the placeholder that replaces the value in
//! the cleaned document.

use std::collections::HashSet;

use serde_yaml::Value;

use opforge_core::field::{FieldDefinition, FieldType, quote, render_literal};
use opforge_core::naming::to_pascal_case;

use crate::error::{MarkerError, MarkerErrorKind, Result};
use crate::parser::{Argument, ArgumentValue, MarkerKind};
use crate::scanner::{MarkerSite, Position, ScannedMarker};

const KNOWN_ARGUMENTS: &[&str] = &["name", "type", "default", "description", "replace"];

const TYPE_HELP: &str =
    "valid types: string, int, bool, float, []string, []int, []bool, []float";

/// A marker that turns a manifest value into an API field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMarker {
    /// Dotted path below `spec`
    pub name: String,
    pub field_type: FieldType,
    pub default: Option<Value>,
    pub description: Option<String>,
    /// Substring of a string value standing for the field
    pub replace: Option<String>,
    /// Value found at the marker position, coerced to `field_type`
    pub original_value: Value,
    pub position: Position,
    /// Text substituted for the annotated value
    pub placeholder: String,
    pub site: MarkerSite,
}

impl FieldMarker {
    pub fn documentation(&self) -> Vec<String> {
        self.description
            .as_deref()
            .map(|d| d.lines().map(|l| l.trim().to_string()).collect())
            .unwrap_or_default()
    }

    /// Schema insertion for this marker; the default wins over the sample
    pub fn to_definition(&self) -> FieldDefinition {
        FieldDefinition {
            path: self.name.clone(),
            field_type: self.field_type,
            documentation: self.documentation(),
            value: self
                .default
                .clone()
                .unwrap_or_else(|| self.original_value.clone()),
            has_default: self.default.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    /// Local to the schema of the unit being compiled
    Field(FieldMarker),
    /// Shared by a collection and all of its components
    CollectionField(FieldMarker),
}

impl Marker {
    pub fn field(&self) -> &FieldMarker {
        match self {
            Self::Field(marker) | Self::CollectionField(marker) => marker,
        }
    }

    pub fn kind(&self) -> MarkerKind {
        match self {
            Self::Field(_) => MarkerKind::Field,
            Self::CollectionField(_) => MarkerKind::CollectionField,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::CollectionField(_))
    }
}

/// Reference path a placeholder resolves to, e.g. `parent.Spec.WebStore.Replicas`
pub fn reference_path(kind: MarkerKind, name: &str) -> String {
    let scope = match kind {
        MarkerKind::Field => "parent",
        MarkerKind::CollectionField => "collection",
    };
    let path: Vec<String> = name.split('.').map(to_pascal_case).collect();
    format!("{}.Spec.{}", scope, path.join("."))
}

fn is_valid_path(name: &str) -> bool {
    name.split('.').all(|segment| {
        let mut chars = segment.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    })
}

fn decode_literal(value: &ArgumentValue) -> Option<Value> {
    match value {
        ArgumentValue::Quoted(s) => Some(Value::String(s.clone())),
        ArgumentValue::List(raw) | ArgumentValue::Bare(raw) => serde_yaml::from_str(raw).ok(),
    }
}

/// Interpret a scanned marker
pub fn classify(manifest: &str, source: &str, scanned: &ScannedMarker) -> Result<Marker> {
    let position = scanned.position;
    let parsed = &scanned.parsed;

    let marker_error = |kind: MarkerErrorKind, message: String| {
        MarkerError::new(kind, message, manifest, source, position.offset, position.len)
    };
    let argument_error = |argument: &Argument, kind: MarkerErrorKind, message: String| {
        MarkerError::new(
            kind,
            message,
            manifest,
            source,
            position.offset + argument.offset,
            argument.key.len(),
        )
    };

    let mut seen = HashSet::new();
    for argument in &parsed.arguments {
        if !KNOWN_ARGUMENTS.contains(&argument.key.as_str()) {
            return Err(argument_error(
                argument,
                MarkerErrorKind::InvalidArgument,
                format!("unknown argument '{}'", argument.key),
            )
            .with_suggestion(format!("valid arguments: {}", KNOWN_ARGUMENTS.join(", "))));
        }
        if !seen.insert(argument.key.as_str()) {
            return Err(argument_error(
                argument,
                MarkerErrorKind::InvalidArgument,
                format!("argument '{}' given more than once", argument.key),
            ));
        }
    }

    let name_argument = parsed.argument("name").ok_or_else(|| {
        marker_error(
            MarkerErrorKind::InvalidArgument,
            "missing required argument 'name'".to_string(),
        )
    })?;
    let name = name_argument.value.as_text().to_string();
    if !is_valid_path(&name) {
        return Err(argument_error(
            name_argument,
            MarkerErrorKind::InvalidArgument,
            format!("invalid field name '{}'", name),
        )
        .with_suggestion("use dotted identifiers, e.g. name=webStore.replicas"));
    }

    let type_argument = parsed.argument("type").ok_or_else(|| {
        marker_error(
            MarkerErrorKind::InvalidArgument,
            "missing required argument 'type'".to_string(),
        )
    })?;
    let field_type = FieldType::from_keyword(type_argument.value.as_text()).ok_or_else(|| {
        argument_error(
            type_argument,
            MarkerErrorKind::UnknownType,
            format!("unknown type '{}'", type_argument.value.as_text()),
        )
        .with_suggestion(TYPE_HELP)
    })?;

    let default = match parsed.argument("default") {
        Some(argument) => Some(
            decode_literal(&argument.value)
                .and_then(|value| field_type.coerce(&value))
                .ok_or_else(|| {
                    argument_error(
                        argument,
                        MarkerErrorKind::InvalidValue,
                        format!(
                            "default '{}' is not a valid {}",
                            argument.value.as_text(),
                            field_type
                        ),
                    )
                })?,
        ),
        None => None,
    };

    let description = parsed
        .argument("description")
        .map(|argument| argument.value.as_text().to_string());

    let decoded = scanned.site.target.decode().map_err(|e| {
        marker_error(
            MarkerErrorKind::InvalidValue,
            format!("annotated value is not valid YAML: {}", e),
        )
    })?;

    let reference = reference_path(parsed.kind, &name);

    let (replace, original_value, placeholder) = match parsed.argument("replace") {
        Some(argument) => {
            let text = argument.value.as_text().to_string();
            if field_type != FieldType::String || text.is_empty() {
                return Err(argument_error(
                    argument,
                    MarkerErrorKind::InvalidArgument,
                    "'replace' needs a non-empty text and type=string".to_string(),
                ));
            }

            let Some(full) = decoded.as_str().filter(|value| value.contains(text.as_str())) else {
                return Err(argument_error(
                    argument,
                    MarkerErrorKind::ReplaceNotFound,
                    format!("'{}' does not occur in the annotated value", text),
                ));
            };

            let placeholder = quote(&full.replace(&text, &format!("!!start {} !!end", reference)));
            (Some(text.clone()), Value::String(text), placeholder)
        }
        None => {
            let original = match field_type.coerce(&decoded) {
                Some(value) => value,
                None if default.is_some() => decoded,
                None => {
                    return Err(marker_error(
                        MarkerErrorKind::InvalidValue,
                        format!(
                            "annotated value {} is not a valid {}",
                            render_literal(&decoded),
                            field_type
                        ),
                    )
                    .with_suggestion("fix the value or give the marker a default"));
                }
            };
            (None, original, quote(&format!("!!var {}", reference)))
        }
    };

    tracing::trace!(manifest, field = %name, kind = ?parsed.kind, "classified marker");

    let marker = FieldMarker {
        name,
        field_type,
        default,
        description,
        replace,
        original_value,
        position,
        placeholder,
        site: scanned.site.clone(),
    };

    Ok(match parsed.kind {
        MarkerKind::Field => Marker::Field(marker),
        MarkerKind::CollectionField => Marker::CollectionField(marker),
    })
}
