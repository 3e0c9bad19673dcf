//! Stack description model
//!
//! The stack is the compiler's sole input. It is produced by an external loader
//! (already validated) and is never mutated by the compiler.

mod endpoint;
mod healthcheck;
mod service;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use endpoint::{Endpoint, EndpointRule};
pub use healthcheck::{HealthCheck, HttpHealthCheck};
pub use service::{
    EnvVar, Port, Protocol, RestartPolicy, Service, ServiceResources, StackResources,
    StackVolume, StorageResource,
};

/// A declarative multi-service application description
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    /// Stack identity, used as a label value on every emitted object
    #[serde(default)]
    pub name: String,

    /// Raw source manifest, preserved verbatim for the metadata snapshot
    #[serde(skip)]
    pub manifest: Vec<u8>,

    /// Services keyed by name
    #[serde(default)]
    pub services: BTreeMap<String, Service>,

    /// Routing groups keyed by name
    #[serde(default)]
    pub endpoints: BTreeMap<String, Endpoint>,
}

impl Stack {
    /// Create an empty stack with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attach the raw manifest bytes
    pub fn with_manifest(mut self, manifest: impl Into<Vec<u8>>) -> Self {
        self.manifest = manifest.into();
        self
    }

    /// Add a service
    pub fn with_service(mut self, name: impl Into<String>, service: Service) -> Self {
        self.services.insert(name.into(), service);
        self
    }

    /// Add an endpoint
    pub fn with_endpoint(mut self, name: impl Into<String>, endpoint: Endpoint) -> Self {
        self.endpoints.insert(name.into(), endpoint);
        self
    }

    /// Look up a service by name
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.get(name)
    }
}
