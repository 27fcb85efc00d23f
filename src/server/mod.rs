//! HTTP integration: deciding when link injection runs on a response

pub mod middleware;

pub use middleware::{HypermediaRouterExt, HypermediaState, inject_links};
