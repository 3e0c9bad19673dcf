//! Workload synthesis for stack services
//!
//! Compiles one [`stack_common::Service`] into exactly one workload object:
//! a Deployment, a StatefulSet (services with named volumes) or a Job (services with a
//! batch restart policy). The pod template is assembled from smaller compilers:
//!
//! - **probe**: health check to liveness/readiness probe
//! - **affinity**: named volumes to same-host pod affinity terms
//! - **volumes**: the shared claim layout and the init containers that prepare it
//! - **container**: environment, ports, resources and security context
//!
//! # Usage
//!
//! ```rust,ignore
//! let workload = WorkloadCompiler::new(&stack.name, "api", &service)
//!     .with_init_image("busybox:1.36")
//!     .compile()?;
//! ```

pub mod affinity;
mod compiler;
pub mod container;
mod error;
pub mod k8s;
pub mod probe;
pub mod volumes;
mod workload;

pub use compiler::WorkloadCompiler;
pub use error::CompilationError;
pub use workload::{
    Deployment, DeploymentSpec, Job, JobSpec, StatefulSet, StatefulSetSpec, Workload,
    WorkloadKind,
};
