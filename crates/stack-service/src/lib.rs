//! Stack-level compilation for stack services
//!
//! This crate compiles a whole [`stack_common::Stack`] into Kubernetes objects:
//!
//! - **Network**: one ClusterIP Service per stack service, with de-duplicated ports
//! - **Ingress**: per-port and per-endpoint routing objects in two API flavors
//! - **Metadata**: a ConfigMap snapshot of the source manifest
//! - **Compiler**: [`StackCompiler`] runs every synthesis independently per service
//!   and endpoint, reusing `stack_workload` for the workload objects

pub mod compiler;
pub mod config;
mod error;
pub mod ingress;
pub mod metadata;
pub mod network;

pub use compiler::{CompiledService, CompiledStack, StackCompiler};
pub use config::{CompilerConfig, CompilerEnv, OsEnv};
pub use error::CompileError;
pub use ingress::{IngressFlavor, IngressPlan, RoutingObject, Visibility};
