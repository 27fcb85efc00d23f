//! Applies a set of link specifications to one document

use crate::core::codec::JsonCodec;
use crate::core::link::LinkSpec;
use crate::links::walker::PathWalker;
use serde_json::Value;
use std::sync::Arc;

/// Ordered link specifications sharing one [`PathWalker`]
///
/// Specifications run in declaration order, so links on a node appear in
/// the order their specs were declared.
#[derive(Debug, Clone, Default)]
pub struct LinkInjector {
    walker: PathWalker,
    specs: Vec<LinkSpec>,
}

/// Outcome of one [`LinkInjector::inject`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectionReport {
    /// Specs whose status gate admitted the response
    pub specs_applied: usize,
    /// Link objects appended across the document
    pub links_added: usize,
}

impl LinkInjector {
    pub fn new(walker: PathWalker) -> Self {
        Self {
            walker,
            specs: Vec::new(),
        }
    }

    pub fn with_codec(codec: Arc<dyn JsonCodec>) -> Self {
        Self::new(PathWalker::new(codec))
    }

    /// Add a specification
    pub fn with_link(mut self, spec: LinkSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn with_links(mut self, specs: impl IntoIterator<Item = LinkSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    pub fn specs(&self) -> &[LinkSpec] {
        &self.specs
    }

    pub fn walker(&self) -> &PathWalker {
        &self.walker
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Whether any specification applies to a response with this status
    pub fn admits(&self, status: u16) -> bool {
        self.specs.iter().any(|spec| spec.status.admits(status))
    }

    /// Apply every specification whose status gate admits `status`
    pub fn inject(&self, document: &mut Value, status: u16) -> InjectionReport {
        let mut report = InjectionReport::default();
        for spec in self.specs.iter().filter(|spec| spec.status.admits(status)) {
            report.specs_applied += 1;
            report.links_added += self.walker.walk(document, spec);
        }
        report
    }

    /// Apply every specification, ignoring status gates
    pub fn inject_all(&self, document: &mut Value) -> InjectionReport {
        let mut report = InjectionReport::default();
        for spec in &self.specs {
            report.specs_applied += 1;
            report.links_added += self.walker.walk(document, spec);
        }
        report
    }
}
