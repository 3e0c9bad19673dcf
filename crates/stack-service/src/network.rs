//! Cluster-internal network exposure
//!
//! Every stack service gets a ClusterIP Service, whatever its public marker says;
//! public reachability belongs to [`crate::ingress`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stack_common::naming::{service_labels, service_port_name, service_selector, workload_name};
use stack_common::{Port, Service as StackService};
use stack_workload::k8s::ObjectMeta;

// =============================================================================
// Service
// =============================================================================

/// Kubernetes Service
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: ServiceSpec,
}

/// Service spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// Service type
    #[serde(rename = "type")]
    pub type_: String,
    /// Selector
    pub selector: BTreeMap<String, String>,
    /// Ports
    pub ports: Vec<ServicePort>,
}

/// Service port
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    /// Port name
    pub name: String,
    /// Port number
    pub port: u16,
    /// Target port
    pub target_port: u16,
    /// Protocol
    pub protocol: String,
}

impl ServicePort {
    fn new(port: u16, target_port: u16, protocol: &str) -> Self {
        Self {
            name: service_port_name(port, target_port, protocol),
            port,
            target_port,
            protocol: protocol.to_string(),
        }
    }
}

// =============================================================================
// Compilation
// =============================================================================

/// Compile the ClusterIP Service of a stack service
pub fn compile_service(stack_name: &str, service_name: &str, service: &StackService) -> Service {
    Service {
        api_version: "v1".to_string(),
        kind: "Service".to_string(),
        metadata: ObjectMeta::new(workload_name(service_name))
            .with_labels(service_labels(stack_name, service_name, &service.labels))
            .with_annotations(service.annotations.clone()),
        spec: ServiceSpec {
            type_: "ClusterIP".to_string(),
            selector: service_selector(stack_name, service_name),
            ports: compile_ports(&service.ports),
        },
    }
}

/// De-duplicate declared ports into service ports
///
/// Each declared port yields its canonical `container -> container` entry, followed by
/// a `host -> container` entry when a different host port is mapped. Declaration order
/// is kept.
pub fn compile_ports(ports: &[Port]) -> Vec<ServicePort> {
    let mut out = Vec::with_capacity(ports.len());
    for p in ports {
        let protocol = p.protocol.as_str();
        out.push(ServicePort::new(p.container_port, p.container_port, protocol));
        if let Some(host) = p.host_port.filter(|h| *h != p.container_port) {
            out.push(ServicePort::new(host, p.container_port, protocol));
        }
    }
    out
}
