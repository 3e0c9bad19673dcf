//! Service model

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::HealthCheck;

/// One deployable unit of a stack
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    /// Container image reference
    pub image: String,

    /// Overrides the image entrypoint
    pub entrypoint: Vec<String>,

    /// Arguments passed to the entrypoint
    pub command: Vec<String>,

    /// Replica count (completions for batch services)
    pub replicas: u32,

    /// Termination grace period in seconds
    pub stop_grace_period: i64,

    /// Environment variables in declaration order
    pub environment: Vec<EnvVar>,

    /// Declared ports in declaration order
    pub ports: Vec<Port>,

    /// Publish every port through an ingress
    pub public: bool,

    /// Linux capabilities to add
    pub cap_add: Vec<String>,

    /// Linux capabilities to drop
    pub cap_drop: Vec<String>,

    /// CPU/memory/storage limits and requests
    pub resources: StackResources,

    /// Volumes multiplexed onto one claim; entries with a `local_path` are named
    pub volumes: Vec<StackVolume>,

    /// Plain bind mounts used by development sessions
    pub volume_mounts: Vec<StackVolume>,

    /// Health check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<HealthCheck>,

    /// Restart policy; anything but `Always` selects batch semantics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<RestartPolicy>,

    /// Retry limit for batch services
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_limit: Option<i32>,

    /// Declared labels
    pub labels: BTreeMap<String, String>,

    /// Declared annotations
    pub annotations: BTreeMap<String, String>,
}

impl Default for Service {
    fn default() -> Self {
        Self {
            image: String::new(),
            entrypoint: Vec::new(),
            command: Vec::new(),
            replicas: 1,
            stop_grace_period: 0,
            environment: Vec::new(),
            ports: Vec::new(),
            public: false,
            cap_add: Vec::new(),
            cap_drop: Vec::new(),
            resources: StackResources::default(),
            volumes: Vec::new(),
            volume_mounts: Vec::new(),
            healthcheck: None,
            restart_policy: None,
            backoff_limit: None,
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
        }
    }
}

impl Service {
    /// Create a service running `image`
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }

    /// True when the service runs to completion instead of forever
    pub fn is_batch(&self) -> bool {
        matches!(
            self.restart_policy,
            Some(RestartPolicy::OnFailure | RestartPolicy::Never)
        )
    }

    /// Volumes with a local identity, in declaration order
    pub fn named_volumes(&self) -> impl Iterator<Item = &StackVolume> {
        self.volumes.iter().filter(|v| v.is_named())
    }

    /// True when at least one volume is declared
    pub fn has_volumes(&self) -> bool {
        !self.volumes.is_empty()
    }

    /// Ports that get a per-port ingress
    pub fn published_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports
            .iter()
            .filter(move |p| self.public || p.host_port.is_some())
    }
}

/// Environment variable; names may repeat
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct EnvVar {
    /// Variable name
    pub name: String,
    /// Variable value
    #[serde(default)]
    pub value: String,
}

impl EnvVar {
    /// Create an env var
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Declared port
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    /// Port the container listens on
    pub container_port: u16,
    /// Externally mapped port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port: Option<u16>,
    /// Transport protocol
    #[serde(default)]
    pub protocol: Protocol,
}

impl Port {
    /// TCP port without a host mapping
    pub fn container(container_port: u16) -> Self {
        Self {
            container_port,
            ..Default::default()
        }
    }

    /// TCP port mapped from `host_port`
    pub fn mapped(host_port: u16, container_port: u16) -> Self {
        Self {
            container_port,
            host_port: Some(host_port),
            ..Default::default()
        }
    }

    /// Replace the protocol
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }
}

/// Transport protocol
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// TCP
    #[default]
    Tcp,
    /// UDP
    Udp,
    /// SCTP
    Sctp,
}

impl Protocol {
    /// Kubernetes spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
            Self::Sctp => "SCTP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pod restart policy
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Long-running service
    Always,
    /// Retry failed pods
    OnFailure,
    /// Run once
    Never,
}

impl RestartPolicy {
    /// Kubernetes spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "Always",
            Self::OnFailure => "OnFailure",
            Self::Never => "Never",
        }
    }
}

/// Volume declaration; `local_path` is the volume identity for named volumes
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StackVolume {
    /// Local identity (named volume) or host path (bind mount)
    #[serde(default)]
    pub local_path: String,
    /// Mount path inside the container
    pub remote_path: String,
}

impl StackVolume {
    /// Named volume `local` mounted at `remote`
    pub fn named(local: impl Into<String>, remote: impl Into<String>) -> Self {
        Self {
            local_path: local.into(),
            remote_path: remote.into(),
        }
    }

    /// True when the volume has a local identity
    pub fn is_named(&self) -> bool {
        !self.local_path.is_empty()
    }
}

/// Limits and requests
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StackResources {
    /// Ceilings
    pub limits: ServiceResources,
    /// Reservations (only storage is honoured)
    pub requests: ServiceResources,
}

/// CPU, memory and storage quantities
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServiceResources {
    /// CPU quantity, e.g. "500m"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    /// Memory quantity, e.g. "512Mi"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    /// Storage for the shared volume claim
    pub storage: StorageResource,
}

/// Storage size and class
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageResource {
    /// Claim size, e.g. "10Gi"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Storage class name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}
