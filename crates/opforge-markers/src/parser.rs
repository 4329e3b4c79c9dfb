//! Marker annotation parser
//!
//! Parses the body of a marker comment into its kind and raw arguments using
//! pest. Argument values are kept undecoded: their meaning depends on the key
//! and is resolved by the classifier.

use pest::Parser;
use pest::error::InputLocation;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "marker.pest"]
struct MarkerParser;

/// Prefix every marker comment starts with
pub const MARKER_PREFIX: &str = "+opforge:";

/// Parser error
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Pest(Box<pest::error::Error<Rule>>),

    #[error("Unexpected rule: {0:?}")]
    UnexpectedRule(Rule),
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        ParseError::Pest(Box::new(e))
    }
}

impl ParseError {
    /// Byte offset of the failure within the parsed text
    pub fn offset(&self) -> usize {
        match self {
            Self::Pest(e) => match e.location {
                InputLocation::Pos(pos) => pos,
                InputLocation::Span((start, _)) => start,
            },
            Self::UnexpectedRule(_) => 0,
        }
    }

    /// Short description without pest's source excerpt
    pub fn summary(&self) -> String {
        match self {
            Self::Pest(e) => e.variant.message().into_owned(),
            Self::UnexpectedRule(rule) => format!("unexpected {:?}", rule),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Which schema a marker contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Field,
    CollectionField,
}

/// Undecoded argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    /// `"..."` with escapes already processed
    Quoted(String),
    /// `[...]` flow list, verbatim
    List(String),
    /// Bare token, trimmed
    Bare(String),
}

impl ArgumentValue {
    /// Text of the value, for arguments that only accept strings
    pub fn as_text(&self) -> &str {
        match self {
            Self::Quoted(s) | Self::List(s) | Self::Bare(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub key: String,
    pub value: ArgumentValue,
    /// Byte offset of the key within the marker text
    pub offset: usize,
}

/// A syntactically valid marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMarker {
    pub kind: MarkerKind,
    pub arguments: Vec<Argument>,
}

impl ParsedMarker {
    pub fn argument(&self, key: &str) -> Option<&Argument> {
        self.arguments.iter().find(|arg| arg.key == key)
    }
}

/// Whether a comment body is meant to be a marker
pub fn is_marker(comment: &str) -> bool {
    comment.trim_start().starts_with(MARKER_PREFIX)
}

/// Parse a marker comment body such as `+opforge:field:name=a,type=int`
pub fn parse_marker(input: &str) -> Result<ParsedMarker> {
    let pairs = MarkerParser::parse(Rule::marker, input)?;

    let mut kind = MarkerKind::Field;
    let mut arguments = Vec::new();

    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::collection_field => kind = MarkerKind::CollectionField,
            Rule::field => kind = MarkerKind::Field,
            Rule::argument => arguments.push(parse_argument(pair)?),
            _ => {}
        }
    }

    Ok(ParsedMarker { kind, arguments })
}

fn parse_argument(pair: pest::iterators::Pair<Rule>) -> Result<Argument> {
    let offset = pair.as_span().start();
    let mut inner = pair.into_inner();

    let key = match inner.next() {
        Some(p) if p.as_rule() == Rule::key => p.as_str().to_string(),
        Some(p) => return Err(ParseError::UnexpectedRule(p.as_rule())),
        None => return Err(ParseError::UnexpectedRule(Rule::argument)),
    };

    let value = match inner.next().and_then(|p| p.into_inner().next()) {
        Some(p) => match p.as_rule() {
            Rule::quoted => ArgumentValue::Quoted(parse_string_literal(p.as_str())),
            Rule::list => ArgumentValue::List(p.as_str().to_string()),
            Rule::bare | Rule::list_type => ArgumentValue::Bare(p.as_str().trim().to_string()),
            other => return Err(ParseError::UnexpectedRule(other)),
        },
        None => return Err(ParseError::UnexpectedRule(Rule::value)),
    };

    Ok(Argument { key, value, offset })
}

fn parse_string_literal(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_marker() {
        let marker = parse_marker("+opforge:field:name=replicas,type=int").unwrap();
        assert_eq!(marker.kind, MarkerKind::Field);
        assert_eq!(marker.arguments.len(), 2);
        assert_eq!(marker.arguments[0].key, "name");
        assert_eq!(
            marker.arguments[0].value,
            ArgumentValue::Bare("replicas".to_string())
        );
        assert_eq!(marker.argument("type").unwrap().offset, 29);
    }

    #[test]
    fn test_parse_collection_marker() {
        let marker = parse_marker("+opforge:collection:field:name=domain,type=string").unwrap();
        assert_eq!(marker.kind, MarkerKind::CollectionField);
    }

    #[test]
    fn test_parse_whitespace_and_quotes() {
        let marker = parse_marker(
            r#"+opforge:field:name = image , type=string, description="The \"main\" image\nused by pods""#,
        )
        .unwrap();

        assert_eq!(
            marker.argument("name").unwrap().value,
            ArgumentValue::Bare("image".to_string())
        );
        assert_eq!(
            marker.argument("description").unwrap().value,
            ArgumentValue::Quoted("The \"main\" image\nused by pods".to_string())
        );
    }

    #[test]
    fn test_parse_list_value() {
        let marker =
            parse_marker(r#"+opforge:field:name=args,type=[]string,default=["a,b", c]"#).unwrap();
        assert_eq!(
            marker.argument("type").unwrap().value,
            ArgumentValue::Bare("[]string".to_string())
        );
        assert_eq!(
            marker.argument("default").unwrap().value,
            ArgumentValue::List(r#"["a,b", c]"#.to_string())
        );
    }

    #[test]
    fn test_parse_without_arguments() {
        let marker = parse_marker("+opforge:field:").unwrap();
        assert!(marker.arguments.is_empty());
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse_marker(r#"+opforge:field:name=a,description="oops"#).unwrap_err();
        assert!(matches!(err, ParseError::Pest(_)));
        assert!(err.offset() > 0);
    }

    #[test]
    fn test_unknown_kind() {
        assert!(parse_marker("+opforge:resource:name=a").is_err());
    }

    #[test]
    fn test_is_marker() {
        assert!(is_marker(" +opforge:field:name=a"));
        assert!(!is_marker(" plain comment"));
    }
}
