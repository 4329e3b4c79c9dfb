//! Object construction source generation
//!
//! Renders a cleaned manifest object as a Go `unstructured.Unstructured`
//! literal. Placeholder strings become expressions:
//!
//! | Value                                   | Rendered as                       |
//! |-----------------------------------------|-----------------------------------|
//! | `"!!var parent.Spec.Replicas"`          | `parent.Spec.Replicas`            |
//! | `"nginx:!!start parent.Spec.Tag !!end"` | `"nginx:" + parent.Spec.Tag`      |
//! | `"plain"`                               | `"plain"`                         |

use serde_yaml::Value;

use opforge_core::field::quote;

const VAR_PREFIX: &str = "!!var ";
const START: &str = "!!start ";
const END: &str = " !!end";

/// Construction fragment assigning `object` to `var_name`
pub fn generate_source(object: &Value, var_name: &str) -> String {
    let mut out = format!("var {} = &unstructured.Unstructured{{\n\tObject: ", var_name);
    render(&mut out, object, 1);
    out.push_str(",\n}\n");
    out
}

fn render(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Mapping(mapping) => {
            out.push_str("map[string]interface{}{\n");
            for (key, item) in mapping {
                push_indent(out, depth + 1);
                out.push_str(&render_key(key));
                out.push_str(": ");
                render(out, item, depth + 1);
                out.push_str(",\n");
            }
            push_indent(out, depth);
            out.push('}');
        }
        Value::Sequence(items) => {
            out.push_str("[]interface{}{\n");
            for item in items {
                push_indent(out, depth + 1);
                render(out, item, depth + 1);
                out.push_str(",\n");
            }
            push_indent(out, depth);
            out.push('}');
        }
        Value::String(s) => out.push_str(&render_string(s)),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(b) => out.push_str(&b.to_string()),
        Value::Null => out.push_str("nil"),
        Value::Tagged(tagged) => render(out, &tagged.value, depth),
    }
}

fn push_indent(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat_n('\t', depth));
}

fn render_key(key: &Value) -> String {
    match key {
        Value::String(s) => quote(s),
        Value::Number(n) => quote(&n.to_string()),
        Value::Bool(b) => quote(&b.to_string()),
        other => quote(&serde_yaml::to_string(other).unwrap_or_default().trim_end().to_string()),
    }
}

/// Expression for a string value, resolving placeholders
pub fn render_string(value: &str) -> String {
    if let Some(reference) = value.strip_prefix(VAR_PREFIX) {
        return reference.trim().to_string();
    }
    if !value.contains(START) {
        return quote(value);
    }

    let mut parts = Vec::new();
    let mut rest = value;

    while let Some(start) = rest.find(START) {
        let after = &rest[start + START.len()..];
        let Some(end) = after.find(END) else {
            break;
        };

        if start > 0 {
            parts.push(quote(&rest[..start]));
        }
        parts.push(after[..end].trim().to_string());
        rest = &after[end + END.len()..];
    }

    if !rest.is_empty() {
        parts.push(quote(rest));
    }

    parts.join(" + ")
}
