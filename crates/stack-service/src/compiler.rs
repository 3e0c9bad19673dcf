//! Stack compiler
//!
//! Runs every per-service and per-endpoint synthesis independently. A failing service
//! or endpoint is recorded and never prevents the others from compiling.

use std::collections::BTreeMap;

use serde::Serialize;
use stack_common::{Service, Stack};
use stack_workload::k8s::ConfigMap;
use stack_workload::{Workload, WorkloadCompiler};
use tracing::{debug, debug_span, warn};

use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::ingress::{IngressPlan, RoutingObject};
use crate::metadata::compile_snapshot;
use crate::network::{compile_service, Service as NetworkService};

/// Objects compiled for one stack service
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledService {
    /// Deployment, StatefulSet or Job
    pub workload: Workload,
    /// ClusterIP Service
    pub service: NetworkService,
    /// One routing object per published port
    pub ingresses: Vec<RoutingObject>,
}

/// Result of compiling a whole stack
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledStack {
    /// Metadata snapshot
    pub snapshot: Result<ConfigMap, CompileError>,
    /// Per-service results, by service name
    pub services: BTreeMap<String, Result<CompiledService, CompileError>>,
    /// Per-endpoint results, by endpoint name
    pub endpoints: BTreeMap<String, Result<RoutingObject, CompileError>>,
}

impl CompiledStack {
    /// Every failure, labeled with the name it was raised for
    pub fn errors(&self) -> Vec<(&str, &CompileError)> {
        let snapshot = self.snapshot.as_ref().err().map(|e| ("snapshot", e));
        let services = self
            .services
            .iter()
            .filter_map(|(name, r)| r.as_ref().err().map(|e| (name.as_str(), e)));
        let endpoints = self
            .endpoints
            .iter()
            .filter_map(|(name, r)| r.as_ref().err().map(|e| (name.as_str(), e)));

        snapshot.into_iter().chain(services).chain(endpoints).collect()
    }

    /// True when every synthesis succeeded
    pub fn is_ok(&self) -> bool {
        self.errors().is_empty()
    }

    /// Every successfully built object as JSON
    ///
    /// Order: snapshot, then per service (by name) workload, network service and
    /// ingresses, then endpoint ingresses (by name).
    pub fn resources(&self) -> Result<Vec<serde_json::Value>, serde_json::Error> {
        let mut out = Vec::new();

        if let Ok(snapshot) = &self.snapshot {
            out.push(to_value(snapshot)?);
        }
        for compiled in self.services.values().flatten() {
            out.push(to_value(&compiled.workload)?);
            out.push(to_value(&compiled.service)?);
            for ingress in &compiled.ingresses {
                out.push(to_value(ingress)?);
            }
        }
        for ingress in self.endpoints.values().flatten() {
            out.push(to_value(ingress)?);
        }

        Ok(out)
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(value)
}

/// Compiles stacks into Kubernetes objects.
///
/// ```rust,ignore
/// let compiled = StackCompiler::new(CompilerConfig::from_env(&OsEnv)?).compile(&stack);
/// for (name, err) in compiled.errors() {
///     eprintln!("{name}: {err}");
/// }
/// ```
#[derive(Clone, Debug, Default)]
pub struct StackCompiler {
    config: CompilerConfig,
}

impl StackCompiler {
    /// Create a compiler with the given configuration
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile every service and endpoint of a stack
    pub fn compile(&self, stack: &Stack) -> CompiledStack {
        let snapshot = compile_snapshot(stack);
        if let Err(e) = &snapshot {
            warn!(stack = %stack.name, error = %e, "metadata snapshot failed");
        }

        let services = stack
            .services
            .iter()
            .map(|(name, service)| {
                let result = self.compile_service(&stack.name, name, service);
                if let Err(e) = &result {
                    warn!(
                        stack = %stack.name,
                        service = %name,
                        error = %e,
                        "service failed to compile"
                    );
                }
                (name.clone(), result)
            })
            .collect();

        let endpoints = stack
            .endpoints
            .iter()
            .map(|(name, endpoint)| {
                let _span = debug_span!("endpoint", name = %name).entered();
                let result = IngressPlan::for_endpoint(stack, name, endpoint)
                    .map(|plan| plan.emit(self.config.ingress_flavor));
                if let Err(e) = &result {
                    warn!(
                        stack = %stack.name,
                        endpoint = %name,
                        error = %e,
                        "endpoint failed to compile"
                    );
                }
                (name.clone(), result)
            })
            .collect();

        CompiledStack {
            snapshot,
            services,
            endpoints,
        }
    }

    /// Compile the objects of one service
    pub fn compile_service(
        &self,
        stack_name: &str,
        service_name: &str,
        service: &Service,
    ) -> Result<CompiledService, CompileError> {
        let _span = debug_span!("service", name = %service_name).entered();

        let workload = WorkloadCompiler::new(stack_name, service_name, service)
            .with_init_image(&self.config.init_image)
            .compile()?;

        let ingresses: Vec<_> = IngressPlan::for_service(stack_name, service_name, service)
            .iter()
            .map(|plan| plan.emit(self.config.ingress_flavor))
            .collect();
        debug!(
            kind = %workload.kind(),
            published_ports = ingresses.len(),
            "service compiled"
        );

        Ok(CompiledService {
            workload,
            service: compile_service(stack_name, service_name, service),
            ingresses,
        })
    }
}
