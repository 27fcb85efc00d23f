//! Href templates with `{dotted.path}` placeholders
//!
//! A template is compiled once into literal text and placeholder references.
//! Resolution looks every placeholder up inside a single JSON node and either
//! produces the full href or nothing at all; partial hrefs are never built.

use crate::core::codec::JsonCodec;
use crate::core::error::SpecError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;

fn brace_regex() -> &'static Regex {
    static BRACE_REGEX: OnceLock<Regex> = OnceLock::new();
    BRACE_REGEX.get_or_init(|| Regex::new(r"\{[^{}]*\}").unwrap())
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"^\{([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)\}$").unwrap())
}

/// Brace tokens that were meant as a lookup but cannot be one: ancestor
/// escapes (`{../id}`) and dotted paths with an empty step (`{a..b}`, `{.a}`)
fn broken_path_regex() -> &'static Regex {
    static BROKEN_PATH_REGEX: OnceLock<Regex> = OnceLock::new();
    BROKEN_PATH_REGEX.get_or_init(|| {
        Regex::new(r"^\{(?:\.\..*|[A-Za-z0-9_.]*\.[A-Za-z0-9_.]*)\}$").unwrap()
    })
}

/// A `{a.b.c}` token and the property names it descends through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    token: String,
    path: Vec<String>,
}

impl Placeholder {
    /// The placeholder exactly as written, braces included
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Property names, outermost first
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Find the value this placeholder designates inside `node`
    ///
    /// Every step must land on an object that has the property.
    pub fn lookup<'a>(&self, node: &'a Value) -> Option<&'a Value> {
        self.path.iter().try_fold(node, |current, name| match current {
            Value::Object(map) => map.get(name),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Placeholder(usize),
}

/// A compiled href template
///
/// # Examples
///
/// ```
/// use hypermedia::core::codec::SerdeJsonCodec;
/// use hypermedia::core::template::HrefTemplate;
/// use serde_json::json;
///
/// let template = HrefTemplate::parse("/orders/{order.id}").unwrap();
/// let codec = SerdeJsonCodec::new();
///
/// assert_eq!(
///     template.resolve(&json!({"order": {"id": 7}}), &codec),
///     Some("/orders/7".to_string())
/// );
/// assert_eq!(template.resolve(&json!({"order": {}}), &codec), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrefTemplate {
    raw: String,
    pieces: Vec<Piece>,
    /// Distinct placeholders in order of first appearance
    placeholders: Vec<Placeholder>,
}

impl HrefTemplate {
    /// Compile a template
    ///
    /// Brace text that is not a placeholder (`{}`, `{not a token}`, a stray
    /// `{`) stays literal. Ancestor escapes and dotted paths with an empty
    /// step are rejected.
    pub fn parse(raw: impl Into<String>) -> Result<Self, SpecError> {
        let raw = raw.into();
        let mut pieces = Vec::new();
        let mut placeholders: Vec<Placeholder> = Vec::new();
        let mut last = 0;

        for m in brace_regex().find_iter(&raw) {
            let token = m.as_str();
            let Some(caps) = placeholder_regex().captures(token) else {
                if broken_path_regex().is_match(token) {
                    return Err(SpecError::MalformedPlaceholder {
                        template: raw.clone(),
                        token: token.to_string(),
                    });
                }
                continue;
            };

            if m.start() > last {
                pieces.push(Piece::Literal(raw[last..m.start()].to_string()));
            }

            let index = match placeholders.iter().position(|p| p.token == token) {
                Some(index) => index,
                None => {
                    placeholders.push(Placeholder {
                        token: token.to_string(),
                        path: caps[1].split('.').map(str::to_string).collect(),
                    });
                    placeholders.len() - 1
                }
            };
            pieces.push(Piece::Placeholder(index));
            last = m.end();
        }

        if last < raw.len() {
            pieces.push(Piece::Literal(raw[last..].to_string()));
        }

        Ok(Self {
            raw,
            pieces,
            placeholders,
        })
    }

    /// The template source text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Distinct placeholders, in order of first appearance
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Resolve every placeholder against `node`
    ///
    /// Returns `None` as soon as one placeholder is missing, `null`, or not a
    /// scalar. Repeated placeholders receive the same value everywhere.
    ///
    /// The href is assembled in one pass over the compiled template, so a
    /// resolved value that itself contains a token such as `{b}` is copied
    /// verbatim and never substituted again.
    pub fn resolve(&self, node: &Value, codec: &dyn JsonCodec) -> Option<String> {
        if self.placeholders.is_empty() {
            return Some(self.raw.clone());
        }

        let values = self
            .placeholders
            .iter()
            .map(|placeholder| {
                placeholder
                    .lookup(node)
                    .and_then(|value| codec.scalar_to_string(value))
            })
            .collect::<Option<Vec<String>>>()?;

        let mut href = String::with_capacity(self.raw.len());
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => href.push_str(text),
                Piece::Placeholder(index) => href.push_str(&values[*index]),
            }
        }
        Some(href)
    }
}

impl fmt::Display for HrefTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for HrefTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for HrefTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        HrefTemplate::parse(raw).map_err(serde::de::Error::custom)
    }
}
