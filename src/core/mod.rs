//! Core module containing the link specification model and href templates

pub mod codec;
pub mod error;
pub mod link;
pub mod path;
pub mod template;

pub use codec::{JsonCodec, SerdeJsonCodec};
pub use error::{CodecError, ConfigError, HypermediaError, SpecError};
pub use link::{LinkCursor, LinkSpec, ResolvedLink, StatusGate};
pub use path::{LinkPath, PathSegment, WILDCARD};
pub use template::{HrefTemplate, Placeholder};
