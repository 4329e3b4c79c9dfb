//! Marker scanner
//!
//! A line-oriented pre-pass over manifest text. It finds marker comments
//! without decoding the YAML, so markers survive in positions a YAML parser
//! would discard, and resolves the value each marker annotates:
//!
//! ```yaml
//! replicas: 3  # +opforge:field:name=replicas,type=int
//! # +opforge:field:name=image,type=string
//! image: nginx:1.25
//! # +opforge:field:name=args,type=[]string
//! args:
//!   - --verbose
//! ```

use std::collections::HashMap;

use serde_yaml::Value;

use crate::error::{MarkerError, MarkerErrorKind, Result, line_column};
use crate::parser::{ParsedMarker, is_marker, parse_marker};

/// Location of a marker annotation in its manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
    /// Byte offset of the marker text
    pub offset: usize,
    /// Byte length of the marker text
    pub len: usize,
}

/// Where a marker comment sits relative to its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Same line as the value
    Trailing,
    /// Own line, above the value
    Head,
}

/// The value a marker annotates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// 0-based line holding the value or its block indicator
    pub line: usize,
    /// Byte range of the inline value within the line
    pub start: usize,
    pub end: usize,
    /// Inclusive 0-based line range of a block value
    pub block: Option<(usize, usize)>,
    pub inline: String,
    pub block_text: String,
}

impl Target {
    /// Decode the annotated value
    pub fn decode(&self) -> std::result::Result<Value, serde_yaml::Error> {
        let mut document = format!("v: {}\n", self.inline);
        document.push_str(&self.block_text);

        let decoded: Value = serde_yaml::from_str(&document)?;
        Ok(decoded.get("v").cloned().unwrap_or(Value::Null))
    }

    pub fn is_block(&self) -> bool {
        self.block.is_some()
    }
}

/// Everything the rewriter needs to strip a marker and substitute its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSite {
    pub placement: Placement,
    /// 0-based line of the marker comment
    pub comment_line: usize,
    /// Byte column of the `#` opening the comment
    pub comment_start: usize,
    pub target: Target,
}

/// A parsed marker and the value it annotates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedMarker {
    pub parsed: ParsedMarker,
    pub position: Position,
    pub site: MarkerSite,
}

pub(crate) struct Line<'a> {
    pub offset: usize,
    pub content: &'a str,
    pub carriage_return: bool,
}

pub(crate) fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut offset = 0;
    text.split('\n')
        .map(|raw| {
            let (content, carriage_return) = match raw.strip_suffix('\r') {
                Some(content) => (content, true),
                None => (raw, false),
            };
            let line = Line {
                offset,
                content,
                carriage_return,
            };
            offset += raw.len() + 1;
            line
        })
        .collect()
}

/// Head marker waiting for the line it annotates
struct PendingMarker {
    parsed: ParsedMarker,
    position: Position,
    comment_line: usize,
    comment_start: usize,
}

/// Find every marker in `text` along with the value it annotates
pub fn scan(manifest: &str, text: &str) -> Result<Vec<ScannedMarker>> {
    let lines = split_lines(text);
    let mut scanned = Vec::new();
    let mut pending: Option<PendingMarker> = None;
    // lines consumed by a block value, mapped to the line owning the block
    let mut block_owner: HashMap<usize, usize> = HashMap::new();

    for (index, line) in lines.iter().enumerate() {
        let comment = find_comment(line.content);
        let body = comment.map_or(line.content, |c| &line.content[..c]);

        let annotation = match comment {
            Some(c) if is_marker(&line.content[c + 1..]) => {
                Some(parse_at(manifest, text, line, index, c)?)
            }
            _ => None,
        };

        if let (Some(marker), Some(owner)) = (&annotation, block_owner.get(&index)) {
            return Err(duplicate_target(manifest, text, marker.position, *owner));
        }

        if body.trim().is_empty() {
            if let Some(marker) = annotation {
                let current = marker.position;
                if let Some(previous) = pending.replace(marker) {
                    return Err(MarkerError::new(
                        MarkerErrorKind::DuplicateTarget,
                        format!(
                            "marker annotates the same value as the marker on line {}",
                            previous.position.line
                        ),
                        manifest,
                        text,
                        current.offset,
                        current.len,
                    ));
                }
            }
            continue;
        }

        if is_document_boundary(body) {
            if let Some(marker) = pending.take() {
                return Err(no_target(manifest, text, marker.position));
            }
            continue;
        }

        let (marker, placement) = match (pending.take(), annotation) {
            (Some(head), Some(trailing)) => {
                return Err(duplicate_target(manifest, text, trailing.position, head.comment_line));
            }
            (Some(head), None) => (head, Placement::Head),
            (None, Some(trailing)) => (trailing, Placement::Trailing),
            (None, None) => continue,
        };

        let target = locate_target(&lines, index, body)
            .ok_or_else(|| no_target(manifest, text, marker.position))?;

        if let Some((first, last)) = target.block {
            block_owner.extend((first..=last).map(|l| (l, index)));
        }

        tracing::trace!(
            manifest,
            line = marker.position.line,
            target = index + 1,
            "found marker"
        );

        scanned.push(ScannedMarker {
            parsed: marker.parsed,
            position: marker.position,
            site: MarkerSite {
                placement,
                comment_line: marker.comment_line,
                comment_start: marker.comment_start,
                target,
            },
        });
    }

    if let Some(marker) = pending {
        return Err(no_target(manifest, text, marker.position));
    }

    Ok(scanned)
}

fn parse_at(
    manifest: &str,
    text: &str,
    line: &Line<'_>,
    index: usize,
    comment_start: usize,
) -> Result<PendingMarker> {
    let raw = &line.content[comment_start + 1..];
    let body = raw.trim();
    let leading = raw.len() - raw.trim_start().len();
    let offset = line.offset + comment_start + 1 + leading;

    let parsed = parse_marker(body).map_err(|e| {
        MarkerError::new(
            MarkerErrorKind::Syntax,
            format!("malformed marker: {}", e.summary()),
            manifest,
            text,
            offset + e.offset(),
            1,
        )
    })?;

    let (line_number, column) = line_column(text, offset);
    debug_assert_eq!(line_number, index + 1);

    Ok(PendingMarker {
        parsed,
        position: Position {
            line: line_number,
            column,
            offset,
            len: body.len(),
        },
        comment_line: index,
        comment_start,
    })
}

fn no_target(manifest: &str, text: &str, position: Position) -> MarkerError {
    MarkerError::new(
        MarkerErrorKind::NoTarget,
        "marker does not annotate any value",
        manifest,
        text,
        position.offset,
        position.len,
    )
    .with_suggestion("place the marker after `key: value` or on the line above it")
}

fn duplicate_target(manifest: &str, text: &str, position: Position, line: usize) -> MarkerError {
    MarkerError::new(
        MarkerErrorKind::DuplicateTarget,
        format!(
            "value is already annotated by the marker for line {}",
            line + 1
        ),
        manifest,
        text,
        position.offset,
        position.len,
    )
}

fn is_document_boundary(body: &str) -> bool {
    ["---", "..."].iter().any(|marker| {
        body.strip_prefix(marker)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
    })
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_block_indicator(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some('|' | '>'))
        && chars.all(|c| c == '-' || c == '+' || c.is_ascii_digit())
}

/// Start of a YAML comment, ignoring `#` inside quoted scalars
pub(crate) fn find_comment(line: &str) -> Option<usize> {
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;
    let mut previous: Option<char> = None;
    let mut last_significant: Option<char> = None;

    for (i, c) in line.char_indices() {
        if in_double {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_double = false;
            }
        } else if in_single {
            if c == '\'' {
                in_single = false;
            }
        } else {
            let at_token_start = previous.is_none_or(|p| p.is_whitespace() || "[{,".contains(p));
            let after_indicator = last_significant.is_none_or(|s| ":-[{,?".contains(s));

            match c {
                '#' if previous.is_none_or(char::is_whitespace) => return Some(i),
                '"' if at_token_start && after_indicator => in_double = true,
                '\'' if at_token_start && after_indicator => in_single = true,
                _ => {}
            }
        }

        previous = Some(c);
        if !c.is_whitespace() {
            last_significant = Some(c);
        }
    }

    None
}

/// Byte index of the `:` separating a mapping key from its value
fn find_mapping_colon(text: &str) -> Option<usize> {
    if text.starts_with(['[', '{']) {
        return None;
    }

    let mut quote: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if i == 0 => quote = Some(c),
            (None, ':') => match chars.peek() {
                None => return Some(i),
                Some((_, next)) if next.is_whitespace() => return Some(i),
                _ => {}
            },
            _ => {}
        }
    }

    None
}

fn locate_target(lines: &[Line<'_>], index: usize, body: &str) -> Option<Target> {
    let mut column = indentation(body);
    let mut rest = &body[column..];
    let mut sequence_item = false;

    // step over sequence indicators: `- key: value`, `- - value`
    while let Some(after) = rest.strip_prefix('-') {
        if !after.starts_with([' ', '\t']) {
            break;
        }
        let skip = 1 + after.len() - after.trim_start().len();
        column += skip;
        rest = &rest[skip..];
        sequence_item = true;
    }

    let key_column = column;
    let (start, value) = match find_mapping_colon(rest) {
        Some(colon) => {
            let after = &rest[colon + 1..];
            let value = after.trim();
            if value.is_empty() {
                (column + colon + 1, "")
            } else {
                let leading = after.len() - after.trim_start().len();
                (column + colon + 1 + leading, value)
            }
        }
        None if sequence_item => (column, rest.trim_end()),
        None => return None,
    };
    let end = start + value.len();

    if !value.is_empty() && !is_block_indicator(value) {
        return Some(Target {
            line: index,
            start,
            end,
            block: None,
            inline: value.to_string(),
            block_text: String::new(),
        });
    }

    let compact_sequence = value.is_empty();
    // inside `|` and `>` blocks a leading `#` is content, not a comment
    let block_scalar = !compact_sequence;
    let mut last = None;

    for (offset, line) in lines.iter().enumerate().skip(index + 1) {
        let content = line.content;
        let trimmed = content.trim_start();

        if trimmed.is_empty() || (!block_scalar && trimmed.starts_with('#')) {
            continue;
        }
        if is_document_boundary(content) {
            break;
        }

        let indent = indentation(content);
        let nested = indent > key_column
            || (compact_sequence
                && indent == key_column
                && (trimmed == "-" || trimmed.starts_with("- ")));
        if !nested {
            break;
        }
        last = Some(offset);
    }

    let last = last?;
    let block_text = lines[index + 1..=last]
        .iter()
        .map(|line| format!("{}\n", line.content))
        .collect();

    Some(Target {
        line: index,
        start,
        end,
        block: Some((index + 1, last)),
        inline: value.to_string(),
        block_text,
    })
}
