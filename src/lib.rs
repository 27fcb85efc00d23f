//! # This-Hypermedia
//!
//! Path-driven hypermedia link injection for JSON API responses.
//!
//! ## Features
//!
//! - **Path Walking**: Thread property names and `"[]"` wildcards through nested JSON
//! - **Href Templates**: Fill `{dotted.path}` placeholders from the node a link lands on
//! - **Best Effort**: Shape mismatches and unresolved placeholders skip a node, never fail
//! - **Configuration-Based**: Declare links per endpoint via YAML configuration
//! - **Pluggable Codec**: JSON conversion rules are injected, not read from global settings
//! - **axum Middleware**: Status-gated, JSON-only response rewriting
//!
//! ## Quick Start
//!
//! ```rust
//! use hypermedia::prelude::*;
//! use serde_json::json;
//!
//! let spec = LinkSpec::new("detail", "/orders/{OrderNo}", ["Results", "[]"]).unwrap();
//! let mut document = json!({"Results": [{"OrderNo": 1}, {"OrderNo": 2}]});
//!
//! PathWalker::default().walk(&mut document, &spec);
//!
//! assert_eq!(
//!     document["Results"][1]["links"],
//!     json!([{"rel": "detail", "href": "/orders/2"}])
//! );
//! ```

pub mod config;
pub mod core;
pub mod links;
pub mod server;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        codec::{JsonCodec, SerdeJsonCodec},
        error::{CodecError, ConfigError, HypermediaError, SpecError},
        link::{LinkSpec, ResolvedLink, StatusGate},
        path::{LinkPath, PathSegment},
        template::HrefTemplate,
    };

    // === Links ===
    pub use crate::links::{InjectionReport, LinkInjector, PathWalker};

    // === Config ===
    pub use crate::config::{EndpointLinks, HypermediaConfig};

    // === Server ===
    pub use crate::server::{HypermediaRouterExt, HypermediaState, inject_links};
}
