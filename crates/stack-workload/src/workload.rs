//! Workload resource types
//!
//! A stack service becomes exactly one of:
//! - Deployment: long-running service without volumes
//! - StatefulSet: long-running service owning a volume claim
//! - Job: batch service (restart policy other than `Always`)

use std::fmt;

use serde::{Deserialize, Serialize};
use stack_common::Service;

use crate::k8s::{LabelSelector, ObjectMeta, PersistentVolumeClaim, PodTemplateSpec};

// =============================================================================
// Kind decision
// =============================================================================

/// Which workload object a service compiles to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
    /// apps/v1 Deployment
    Deployment,
    /// apps/v1 StatefulSet
    StatefulSet,
    /// batch/v1 Job
    Job,
}

impl WorkloadKind {
    /// Batch policy wins over volumes; volumes win over the default
    pub fn for_service(service: &Service) -> Self {
        if service.is_batch() {
            Self::Job
        } else if service.has_volumes() {
            Self::StatefulSet
        } else {
            Self::Deployment
        }
    }

    /// Kubernetes kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
            Self::Job => "Job",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Deployment
// =============================================================================

/// Kubernetes Deployment
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: DeploymentSpec,
}

/// Deployment spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// Number of replicas
    pub replicas: u32,
    /// Label selector
    pub selector: LabelSelector,
    /// Pod template
    pub template: PodTemplateSpec,
}

// =============================================================================
// StatefulSet
// =============================================================================

/// Kubernetes StatefulSet
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatefulSet {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: StatefulSetSpec,
}

/// StatefulSet spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatefulSetSpec {
    /// Number of replicas
    pub replicas: u32,
    /// Governing service name
    pub service_name: String,
    /// Label selector
    pub selector: LabelSelector,
    /// Pod template
    pub template: PodTemplateSpec,
    /// Per-pod claim templates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_claim_templates: Vec<PersistentVolumeClaim>,
}

// =============================================================================
// Job
// =============================================================================

/// Kubernetes Job
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: JobSpec,
}

/// Job spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    /// Successful pods required
    pub completions: u32,
    /// Pods running at once
    pub parallelism: u32,
    /// Retries before the job is marked failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_limit: Option<i32>,
    /// Use `selector` instead of a generated one
    pub manual_selector: bool,
    /// Label selector
    pub selector: LabelSelector,
    /// Pod template
    pub template: PodTemplateSpec,
}

// =============================================================================
// Workload
// =============================================================================

/// The workload compiled for one service
///
/// Serializes as the wrapped object.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Workload {
    /// Long-running, stateless
    Deployment(Deployment),
    /// Long-running, owns the shared claim
    StatefulSet(StatefulSet),
    /// Runs to completion
    Job(Job),
}

impl Workload {
    /// Kind of the wrapped object
    pub fn kind(&self) -> WorkloadKind {
        match self {
            Self::Deployment(_) => WorkloadKind::Deployment,
            Self::StatefulSet(_) => WorkloadKind::StatefulSet,
            Self::Job(_) => WorkloadKind::Job,
        }
    }

    /// Object name
    pub fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Object metadata
    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::Deployment(d) => &d.metadata,
            Self::StatefulSet(s) => &s.metadata,
            Self::Job(j) => &j.metadata,
        }
    }

    /// Label selector binding the workload to its pods
    pub fn selector(&self) -> &LabelSelector {
        match self {
            Self::Deployment(d) => &d.spec.selector,
            Self::StatefulSet(s) => &s.spec.selector,
            Self::Job(j) => &j.spec.selector,
        }
    }

    /// Pod template
    pub fn pod_template(&self) -> &PodTemplateSpec {
        match self {
            Self::Deployment(d) => &d.spec.template,
            Self::StatefulSet(s) => &s.spec.template,
            Self::Job(j) => &j.spec.template,
        }
    }

    /// The Deployment, if this is one
    pub fn as_deployment(&self) -> Option<&Deployment> {
        match self {
            Self::Deployment(d) => Some(d),
            _ => None,
        }
    }

    /// The StatefulSet, if this is one
    pub fn as_stateful_set(&self) -> Option<&StatefulSet> {
        match self {
            Self::StatefulSet(s) => Some(s),
            _ => None,
        }
    }

    /// The Job, if this is one
    pub fn as_job(&self) -> Option<&Job> {
        match self {
            Self::Job(j) => Some(j),
            _ => None,
        }
    }
}
