//! Endpoint (routing group) model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named routing group mapping URL paths to service ports
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Ordered routing rules
    #[serde(default)]
    pub rules: Vec<EndpointRule>,

    /// Declared labels
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Declared annotations
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// A single path -> (service, port) rule
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRule {
    /// URL path
    pub path: String,
    /// Target service name
    pub service: String,
    /// Target service port
    pub port: u16,
}

impl EndpointRule {
    /// Create a rule
    pub fn new(path: impl Into<String>, service: impl Into<String>, port: u16) -> Self {
        Self {
            path: path.into(),
            service: service.into(),
            port,
        }
    }
}
