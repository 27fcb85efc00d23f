//! Path-driven traversal that attaches links to landing nodes
//!
//! The walk is best effort: a branch whose shape does not match the path, or
//! whose href cannot be fully resolved, is skipped without disturbing its
//! siblings. Recursion depth is bounded by the number of path segments.

use crate::core::codec::{JsonCodec, SerdeJsonCodec};
use crate::core::link::{LinkCursor, LinkSpec, ResolvedLink};
use crate::core::path::PathSegment;
use serde_json::Value;
use std::sync::Arc;

/// Property holding the injected link objects
pub const LINKS_PROPERTY: &str = "links";

/// Walks documents and appends resolved links where a [`LinkSpec`] lands
///
/// Walking the same document twice with the same spec appends two links;
/// callers run each spec once per document.
#[derive(Clone)]
pub struct PathWalker {
    codec: Arc<dyn JsonCodec>,
}

impl Default for PathWalker {
    fn default() -> Self {
        Self::new(Arc::new(SerdeJsonCodec::new()))
    }
}

impl std::fmt::Debug for PathWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathWalker").finish_non_exhaustive()
    }
}

impl PathWalker {
    pub fn new(codec: Arc<dyn JsonCodec>) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &Arc<dyn JsonCodec> {
        &self.codec
    }

    /// Apply `spec` to `node`, returning how many links were appended
    pub fn walk(&self, node: &mut Value, spec: &LinkSpec) -> usize {
        self.walk_cursor(node, spec.cursor())
    }

    fn walk_cursor(&self, node: &mut Value, cursor: LinkCursor<'_>) -> usize {
        let Some((segment, rest)) = cursor.advance() else {
            return usize::from(self.attach(node, cursor));
        };

        match (segment, node) {
            (PathSegment::Wildcard, Value::Array(elements)) => elements
                .iter_mut()
                .map(|element| self.walk_cursor(element, rest))
                .sum(),
            (PathSegment::Property(name), Value::Object(map)) => match map.get_mut(name) {
                Some(Value::Null) | None => {
                    tracing::trace!(segment = %name, "property absent, skipping branch");
                    0
                }
                Some(child) => self.walk_cursor(child, rest),
            },
            (segment, _) => {
                tracing::trace!(segment = %segment, "shape mismatch, skipping branch");
                0
            }
        }
    }

    /// Append the resolved link to a landing node
    fn attach(&self, node: &mut Value, cursor: LinkCursor<'_>) -> bool {
        if !node.is_object() {
            tracing::trace!(rel = cursor.rel, "landing node is not an object");
            return false;
        }

        let Some(href) = cursor.href.resolve(node, self.codec.as_ref()) else {
            tracing::trace!(template = %cursor.href, "href unresolved, no link");
            return false;
        };

        let Value::Object(map) = node else {
            return false;
        };

        let links = map
            .entry(LINKS_PROPERTY)
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(links) = links else {
            tracing::trace!(rel = cursor.rel, "existing links property is not an array");
            return false;
        };

        tracing::debug!(rel = cursor.rel, href = %href, "link injected");
        links.push(ResolvedLink::new(cursor.rel, href).into_value());
        true
    }
}
