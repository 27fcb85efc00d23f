//! Link injection module
//!
//! This module walks JSON documents and attaches resolved links. It knows
//! nothing about HTTP; see [`crate::server`] for the response middleware.

pub mod injector;
pub mod walker;

pub use injector::{InjectionReport, LinkInjector};
pub use walker::{LINKS_PROPERTY, PathWalker};
