//! Workload compiler: builds the workload object of one service
//!
//! Chooses the workload kind, assembles the pod template from the probe, affinity,
//! volume and container compilers, and wraps it in a Deployment, StatefulSet or Job.

use std::collections::BTreeMap;

use stack_common::naming::{self, DEFAULT_INIT_IMAGE, PVC_NAME};
use stack_common::quantity::validate_memory_quantity;
use stack_common::Service;
use tracing::debug;

use crate::affinity::compile_affinity;
use crate::container::{compile_env, compile_ports, compile_resources, compile_security_context};
use crate::error::CompilationError;
use crate::k8s::{
    Container, LabelSelector, ObjectMeta, PersistentVolumeClaim, PodMeta, PodSpec,
    PodTemplateSpec, Volume,
};
use crate::probe::compile_probe;
use crate::volumes::{VolumeCompiler, VolumePlan};
use crate::workload::{
    Deployment, DeploymentSpec, Job, JobSpec, StatefulSet, StatefulSetSpec, Workload,
    WorkloadKind,
};

/// Compiles a stack service into its workload object.
///
/// ```rust,ignore
/// let workload = WorkloadCompiler::new("shop", "api", &service)
///     .with_init_image("busybox:1.36")
///     .compile()?;
/// ```
pub struct WorkloadCompiler<'a> {
    stack_name: &'a str,
    service_name: &'a str,
    service: &'a Service,
    init_image: &'a str,
}

impl<'a> WorkloadCompiler<'a> {
    /// Create a new WorkloadCompiler with required parameters.
    pub fn new(stack_name: &'a str, service_name: &'a str, service: &'a Service) -> Self {
        Self {
            stack_name,
            service_name,
            service,
            init_image: DEFAULT_INIT_IMAGE,
        }
    }

    /// Set the image of the permission-fixing init container.
    pub fn with_init_image(mut self, init_image: &'a str) -> Self {
        self.init_image = init_image;
        self
    }

    /// Compile the workload.
    pub fn compile(&self) -> Result<Workload, CompilationError> {
        let kind = WorkloadKind::for_service(self.service);
        debug!(service = %self.service_name, kind = %kind, "compiling workload");

        let labels =
            naming::service_labels(self.stack_name, self.service_name, &self.service.labels);
        let selector = LabelSelector::from_labels(naming::service_selector(
            self.stack_name,
            self.service_name,
        ));
        let metadata = ObjectMeta::new(naming::workload_name(self.service_name))
            .with_labels(labels.clone())
            .with_annotations(self.service.annotations.clone());

        let plan = VolumeCompiler::plan(self.service_name, self.service, self.init_image);
        let template = self.compile_pod_template(kind, &labels, plan)?;

        let workload = match kind {
            WorkloadKind::Deployment => Workload::Deployment(Deployment {
                api_version: "apps/v1".to_string(),
                kind: kind.as_str().to_string(),
                metadata,
                spec: DeploymentSpec {
                    replicas: self.service.replicas,
                    selector,
                    template,
                },
            }),
            WorkloadKind::StatefulSet => Workload::StatefulSet(StatefulSet {
                api_version: "apps/v1".to_string(),
                kind: kind.as_str().to_string(),
                metadata,
                spec: StatefulSetSpec {
                    replicas: self.service.replicas,
                    service_name: naming::workload_name(self.service_name),
                    selector,
                    template,
                    volume_claim_templates: vec![self.compile_claim_template(labels)?],
                },
            }),
            WorkloadKind::Job => Workload::Job(Job {
                api_version: "batch/v1".to_string(),
                kind: kind.as_str().to_string(),
                metadata,
                spec: JobSpec {
                    completions: self.service.replicas,
                    parallelism: 1,
                    backoff_limit: self.service.backoff_limit,
                    manual_selector: true,
                    selector,
                    template,
                },
            }),
        };

        Ok(workload)
    }

    fn compile_pod_template(
        &self,
        kind: WorkloadKind,
        labels: &BTreeMap<String, String>,
        plan: VolumePlan,
    ) -> Result<PodTemplateSpec, CompilationError> {
        let service = self.service;

        // Batch pods are not service endpoints; no liveness/readiness
        let probe = match kind {
            WorkloadKind::Job => None,
            _ => compile_probe(self.service_name, service.healthcheck.as_ref())?,
        };

        let container = Container {
            name: self.service_name.to_string(),
            image: service.image.clone(),
            command: service.entrypoint.clone(),
            args: service.command.clone(),
            env: compile_env(self.service_name, &service.environment),
            ports: compile_ports(&service.ports),
            resources: compile_resources(self.service_name, &service.resources)?,
            liveness_probe: probe.clone(),
            readiness_probe: probe,
            volume_mounts: plan.mounts,
            security_context: compile_security_context(&service.cap_add, &service.cap_drop),
            ..Default::default()
        };

        // Jobs carry no claim template; their volumes live in an emptyDir
        let volumes = if kind == WorkloadKind::Job && service.has_volumes() {
            vec![Volume::from_empty_dir(PVC_NAME)]
        } else {
            Vec::new()
        };

        let mut pod_labels = labels.clone();
        pod_labels.extend(plan.pod_labels);

        Ok(PodTemplateSpec {
            metadata: PodMeta {
                labels: pod_labels,
                annotations: service.annotations.clone(),
            },
            spec: PodSpec {
                containers: vec![container],
                init_containers: plan.init_containers,
                volumes,
                affinity: compile_affinity(&service.volumes),
                termination_grace_period_seconds: service.stop_grace_period,
                restart_policy: match kind {
                    WorkloadKind::Job => service.restart_policy.map(|p| p.as_str().to_string()),
                    _ => None,
                },
            },
        })
    }

    fn compile_claim_template(
        &self,
        labels: BTreeMap<String, String>,
    ) -> Result<PersistentVolumeClaim, CompilationError> {
        let storage = &self.service.resources.requests.storage;
        if let Some(size) = &storage.size {
            validate_memory_quantity(size, "requests.storage.size")
                .map_err(|e| CompilationError::quantity(self.service_name, e))?;
        }

        Ok(VolumeCompiler::claim_template(
            labels,
            self.service.annotations.clone(),
            storage,
        ))
    }
}
