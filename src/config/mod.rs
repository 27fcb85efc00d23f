//! Configuration loading and management
//!
//! Link specifications are declared per endpoint in YAML and looked up by
//! endpoint name when a router is assembled:
//!
//! ```yaml
//! max_body_size: 1048576
//! endpoints:
//!   - name: list_orders
//!     links:
//!       - rel: self
//!         href: /orders
//!       - rel: detail
//!         href: /orders/{OrderNo}
//!         path: [Results, "[]"]
//!         status: 200
//! ```

use crate::core::codec::{JsonCodec, SerdeJsonCodec};
use crate::core::error::ConfigError;
use crate::core::link::LinkSpec;
use crate::links::LinkInjector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Default cap on response bodies the middleware will buffer (2 MiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

/// Link specifications attached to one endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointLinks {
    /// Endpoint identifier (e.g., "list_orders", "get_customer")
    pub name: String,

    /// Links injected into this endpoint's responses, in order
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

/// Complete configuration for hypermedia injection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypermediaConfig {
    /// Per-endpoint link declarations
    #[serde(default)]
    pub endpoints: Vec<EndpointLinks>,

    /// Responses larger than this are passed through untouched
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Re-encode rewritten responses with indentation
    #[serde(default)]
    pub pretty: bool,
}

impl Default for HypermediaConfig {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            pretty: false,
        }
    }
}

impl HypermediaConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        tracing::debug!(
            endpoints = config.endpoints.len(),
            "hypermedia configuration loaded"
        );
        Ok(config)
    }

    /// Merge several configurations into one
    ///
    /// Endpoints keep the order in which they are first seen. Links declared
    /// for an endpoint in a later config are appended after the earlier
    /// ones. The largest `max_body_size` wins; `pretty` is set if any config
    /// sets it.
    pub fn merge(configs: Vec<HypermediaConfig>) -> Self {
        let mut merged = HypermediaConfig {
            max_body_size: 0,
            ..Default::default()
        };

        for config in configs {
            merged.max_body_size = merged.max_body_size.max(config.max_body_size);
            merged.pretty |= config.pretty;

            for endpoint in config.endpoints {
                match merged.endpoints.iter_mut().find(|e| e.name == endpoint.name) {
                    Some(existing) => existing.links.extend(endpoint.links),
                    None => merged.endpoints.push(endpoint),
                }
            }
        }

        if merged.max_body_size == 0 {
            merged.max_body_size = DEFAULT_MAX_BODY_SIZE;
        }
        merged
    }

    /// Find an endpoint declaration by name
    pub fn endpoint(&self, name: &str) -> Option<&EndpointLinks> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// The codec matching this configuration's output settings
    pub fn codec(&self) -> Arc<dyn JsonCodec> {
        Arc::new(SerdeJsonCodec::new().pretty(self.pretty))
    }

    /// Build an injector for the named endpoint
    pub fn injector_for(&self, name: &str) -> Result<LinkInjector, ConfigError> {
        self.injector_with_codec(name, self.codec())
    }

    /// Build an injector for the named endpoint using a caller-supplied codec
    pub fn injector_with_codec(
        &self,
        name: &str,
        codec: Arc<dyn JsonCodec>,
    ) -> Result<LinkInjector, ConfigError> {
        let endpoint = self
            .endpoint(name)
            .ok_or_else(|| ConfigError::UnknownEndpoint {
                name: name.to_string(),
            })?;
        Ok(LinkInjector::with_codec(codec).with_links(endpoint.links.iter().cloned()))
    }
}
