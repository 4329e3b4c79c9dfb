//! Manifest rewriter
//!
//! Produces the cleaned document: marker comments are removed and every
//! annotated value is replaced by its placeholder, so a generic YAML decoder
//! reads the result without knowing about markers. All other bytes, document
//! separators included, are kept as written.

use std::collections::{HashMap, HashSet};

use crate::marker::Marker;
use crate::scanner::{Placement, split_lines};

/// Rewrite `text`, substituting placeholders for the values of `markers`
///
/// `markers` must come from scanning this exact `text`.
pub fn rewrite(text: &str, markers: &[Marker]) -> String {
    let lines = split_lines(text);

    let mut dropped = HashSet::new();
    let mut comment_cuts = HashMap::new();
    let mut replacements = HashMap::new();

    for marker in markers {
        let field = marker.field();
        let site = &field.site;

        match site.placement {
            Placement::Head => {
                dropped.insert(site.comment_line);
            }
            Placement::Trailing => {
                comment_cuts.insert(site.comment_line, site.comment_start);
            }
        }

        let target = &site.target;
        replacements.insert(target.line, (target.start, target.end, &field.placeholder));
        if let Some((first, last)) = target.block {
            dropped.extend(first..=last);
        }
    }

    let mut output = String::with_capacity(text.len());
    let last_index = lines.len().saturating_sub(1);

    for (index, line) in lines.iter().enumerate() {
        if dropped.contains(&index) {
            continue;
        }

        let mut content = line.content.to_string();

        if let Some(&cut) = comment_cuts.get(&index) {
            content.truncate(cut);
            content.truncate(content.trim_end().len());
        }

        if let Some(&(start, end, placeholder)) = replacements.get(&index) {
            if start == end {
                content.replace_range(start..end, &format!(" {}", placeholder));
            } else {
                content.replace_range(start..end, placeholder);
            }
        }

        output.push_str(&content);
        if line.carriage_return {
            output.push('\r');
        }
        if index < last_index {
            output.push('\n');
        }
    }

    output
}

/// Point collection placeholders at the parent resource
///
/// Used when the unit being compiled is the collection itself.
pub fn downgrade_collection_references(text: &str) -> String {
    text.replace("!!var collection", "!!var parent")
        .replace("!!start collection", "!!start parent")
}
