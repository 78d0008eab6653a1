//! Description templates with keyword substitution.
//!
//! Item descriptions (and any other player-facing string) may reference
//! named values that change at runtime, e.g. `"A {color} key, {uses} uses left"`.
//! A [`Template`] is parsed once and rendered against a [`Substitutions`] map
//! every time the text is needed.
//!
//! # Grammar
//!
//! - literal text is copied verbatim
//! - `\{` and `\}` produce a literal brace
//! - `\` followed by any other character is kept as-is (`\n` stays `\n`),
//!   and a trailing `\` is kept
//! - `{key}` is replaced by the value stored under `key`
//!
//! Parsing fails on an unclosed `{`, a stray `}`, a `{` inside a placeholder
//! and an empty `{}`. Rendering fails when a key has no value; there is no
//! fallback text.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value that can be substituted into a template.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SubstitutionValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

impl fmt::Display for SubstitutionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstitutionValue::Int(v) => write!(f, "{v}"),
            SubstitutionValue::Float(v) => write!(f, "{v}"),
            SubstitutionValue::String(v) => f.write_str(v),
            SubstitutionValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for SubstitutionValue {
    fn from(v: i64) -> Self {
        SubstitutionValue::Int(v)
    }
}

impl From<i32> for SubstitutionValue {
    fn from(v: i32) -> Self {
        SubstitutionValue::Int(v as i64)
    }
}

impl From<f64> for SubstitutionValue {
    fn from(v: f64) -> Self {
        SubstitutionValue::Float(v)
    }
}

impl From<bool> for SubstitutionValue {
    fn from(v: bool) -> Self {
        SubstitutionValue::Bool(v)
    }
}

impl From<&str> for SubstitutionValue {
    fn from(v: &str) -> Self {
        SubstitutionValue::String(v.to_string())
    }
}

impl From<String> for SubstitutionValue {
    fn from(v: String) -> Self {
        SubstitutionValue::String(v)
    }
}

/// Named values available to a template.
pub type Substitutions = FxHashMap<String, SubstitutionValue>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown substitution key `{key}`")]
    UnknownKey { key: String },
    #[error("placeholder opened at byte {position} is never closed")]
    Unclosed { position: usize },
    #[error("unmatched `}}` at byte {position}")]
    UnmatchedClose { position: usize },
    #[error("nested `{{` at byte {position}")]
    Nested { position: usize },
    #[error("empty placeholder at byte {position}")]
    EmptyPlaceholder { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Key(String),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '\\' => match chars.peek() {
                    Some(&(_, next @ ('{' | '}'))) => {
                        literal.push(next);
                        chars.next();
                    }
                    _ => literal.push('\\'),
                },
                '{' => {
                    let mut key = String::new();
                    let mut closed = false;
                    for (inner_pos, inner) in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(TemplateError::Nested { position: inner_pos }),
                            other => key.push(other),
                        }
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed { position: pos });
                    }
                    if key.is_empty() {
                        return Err(TemplateError::EmptyPlaceholder { position: pos });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Key(key));
                }
                '}' => return Err(TemplateError::UnmatchedClose { position: pos }),
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The unparsed template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder keys in order of appearance.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Key(k) => Some(k.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, values: &Substitutions) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Key(key) => {
                    let value = values
                        .get(key)
                        .ok_or_else(|| TemplateError::UnknownKey { key: key.clone() })?;
                    out.push_str(&value.to_string());
                }
            }
        }
        Ok(out)
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs(pairs: &[(&str, SubstitutionValue)]) -> Substitutions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_plain_text_renders_verbatim() {
        let t = Template::parse("An old lantern.").unwrap();
        assert_eq!(t.render(&Substitutions::default()).unwrap(), "An old lantern.");
        assert_eq!(t.keys().count(), 0);
    }

    #[test]
    fn test_placeholders_are_substituted() {
        let t = Template::parse("A {color} key with {uses} uses").unwrap();
        let values = subs(&[("color", "brass".into()), ("uses", 3i64.into())]);
        assert_eq!(t.render(&values).unwrap(), "A brass key with 3 uses");
        assert_eq!(t.keys().collect::<Vec<_>>(), vec!["color", "uses"]);
    }

    #[test]
    fn test_values_are_read_at_render_time() {
        let t = Template::parse("{n} left").unwrap();
        let mut values = subs(&[("n", 2i64.into())]);
        assert_eq!(t.render(&values).unwrap(), "2 left");
        values.insert("n".to_string(), 1i64.into());
        assert_eq!(t.render(&values).unwrap(), "1 left");
    }

    #[test]
    fn test_escaped_braces() {
        let t = Template::parse(r"set \{ and \} literally").unwrap();
        assert_eq!(t.render(&Substitutions::default()).unwrap(), "set { and } literally");
    }

    #[test]
    fn test_other_escapes_are_kept() {
        let t = Template::parse(r"path C:\games\").unwrap();
        assert_eq!(t.render(&Substitutions::default()).unwrap(), r"path C:\games\");
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let t = Template::parse("Hello {name}").unwrap();
        let err = t.render(&Substitutions::default()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownKey {
                key: "name".to_string()
            }
        );
    }

    #[test]
    fn test_unclosed_placeholder() {
        assert_eq!(
            Template::parse("oops {name").unwrap_err(),
            TemplateError::Unclosed { position: 5 }
        );
    }

    #[test]
    fn test_stray_close() {
        assert_eq!(
            Template::parse("oops }").unwrap_err(),
            TemplateError::UnmatchedClose { position: 5 }
        );
    }

    #[test]
    fn test_nested_open() {
        assert_eq!(
            Template::parse("{a{b}}").unwrap_err(),
            TemplateError::Nested { position: 2 }
        );
    }

    #[test]
    fn test_empty_placeholder() {
        assert_eq!(
            Template::parse("x {}").unwrap_err(),
            TemplateError::EmptyPlaceholder { position: 2 }
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(SubstitutionValue::from(1.5).to_string(), "1.5");
        assert_eq!(SubstitutionValue::from(true).to_string(), "true");
        assert_eq!(SubstitutionValue::from("x").to_string(), "x");
    }

    #[test]
    fn test_values_deserialize_untagged() {
        let v: SubstitutionValue = serde_json::from_str("4").unwrap();
        assert_eq!(v, SubstitutionValue::Int(4));
        let v: SubstitutionValue = serde_json::from_str("\"rusty\"").unwrap();
        assert_eq!(v, SubstitutionValue::String("rusty".to_string()));
    }
}
