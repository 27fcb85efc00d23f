//! Link specifications and the link objects they produce

use crate::core::error::{Result, SpecError};
use crate::core::path::{LinkPath, PathSegment};
use crate::core::template::HrefTemplate;
use serde::{Deserialize, Serialize};

/// Which response statuses a link applies to
///
/// Evaluated by [`LinkInjector`](crate::links::LinkInjector), never by the
/// walker itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Option<u16>", into = "Option<u16>")]
pub enum StatusGate {
    /// Any 2xx status
    #[default]
    Success,

    /// Exactly this status code
    Exact(u16),
}

impl StatusGate {
    pub fn admits(&self, status: u16) -> bool {
        match self {
            StatusGate::Success => (200..300).contains(&status),
            StatusGate::Exact(code) => *code == status,
        }
    }
}

impl TryFrom<Option<u16>> for StatusGate {
    type Error = SpecError;

    fn try_from(value: Option<u16>) -> Result<Self, Self::Error> {
        match value {
            None => Ok(StatusGate::Success),
            Some(code) if (100..=599).contains(&code) => Ok(StatusGate::Exact(code)),
            Some(code) => Err(SpecError::InvalidStatus(code)),
        }
    }
}

impl From<StatusGate> for Option<u16> {
    fn from(gate: StatusGate) -> Self {
        match gate {
            StatusGate::Success => None,
            StatusGate::Exact(code) => Some(code),
        }
    }
}

/// Declares one link to inject: what to call it, how to build its href, and
/// where in the document it goes
///
/// # Example
///
/// ```yaml
/// rel: detail
/// href: /orders/{OrderNo}
/// path: [Results, "[]"]
/// status: 200
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLinkSpec")]
pub struct LinkSpec {
    /// Relation name written into each produced link
    pub rel: String,

    /// Template resolved against each landing node
    pub href: HrefTemplate,

    /// Segments leading from the document root to the landing nodes
    pub path: LinkPath,

    /// Response statuses this link applies to
    pub status: StatusGate,
}

#[derive(Deserialize)]
struct RawLinkSpec {
    rel: String,
    href: HrefTemplate,
    #[serde(default)]
    path: LinkPath,
    #[serde(default)]
    status: StatusGate,
}

impl TryFrom<RawLinkSpec> for LinkSpec {
    type Error = SpecError;

    fn try_from(raw: RawLinkSpec) -> Result<Self, Self::Error> {
        if raw.rel.is_empty() {
            return Err(SpecError::EmptyRel);
        }
        Ok(Self {
            rel: raw.rel,
            href: raw.href,
            path: raw.path,
            status: raw.status,
        })
    }
}

impl LinkSpec {
    /// Build and validate a specification
    pub fn new<I, S>(
        rel: impl Into<String>,
        href: impl Into<String>,
        path: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let raw = RawLinkSpec {
            rel: rel.into(),
            href: HrefTemplate::parse(href)?,
            path: LinkPath::parse(path)?,
            status: StatusGate::Success,
        };
        Ok(Self::try_from(raw)?)
    }

    /// Restrict this link to a single status code
    pub fn with_status(mut self, status: u16) -> Result<Self> {
        self.status = StatusGate::try_from(Some(status))?;
        Ok(self)
    }

    /// View of this specification with no segments consumed yet
    pub fn cursor(&self) -> LinkCursor<'_> {
        LinkCursor {
            rel: &self.rel,
            href: &self.href,
            remaining: self.path.segments(),
        }
    }
}

/// The part of a [`LinkSpec`] still to be applied at one recursion level
///
/// Borrowed from the specification; each level derives its own cursor for
/// the tail and drops it on return.
#[derive(Debug, Clone, Copy)]
pub struct LinkCursor<'a> {
    pub rel: &'a str,
    pub href: &'a HrefTemplate,
    pub remaining: &'a [PathSegment],
}

impl<'a> LinkCursor<'a> {
    /// Split off the next segment, or `None` at a landing node
    pub fn advance(&self) -> Option<(&'a PathSegment, LinkCursor<'a>)> {
        let (head, rest) = self.remaining.split_first()?;
        Some((
            head,
            LinkCursor {
                rel: self.rel,
                href: self.href,
                remaining: rest,
            },
        ))
    }
}

/// A link object as it appears in the output document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub rel: String,
    pub href: String,
}

impl ResolvedLink {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }

    /// The `{ "rel": ..., "href": ... }` object
    pub fn into_value(self) -> serde_json::Value {
        serde_json::json!({
            "rel": self.rel,
            "href": self.href,
        })
    }
}
