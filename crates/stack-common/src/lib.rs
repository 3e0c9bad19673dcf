//! Common types for the stack compiler
//!
//! This crate holds everything the synthesizer crates agree on:
//!
//! - **Model**: the read-only `Stack` description (services, endpoints, health checks)
//! - **Naming**: canonical names, label keys and label sets shared by every emitted object
//! - **Quantity**: validation of CPU/memory/storage quantity strings
//! - **Error**: the shared error type

#![deny(missing_docs)]

pub mod error;
pub mod model;
pub mod naming;
pub mod quantity;

pub use error::{Error, Result};
pub use model::{
    Endpoint, EndpointRule, EnvVar, HealthCheck, HttpHealthCheck, Port, Protocol, RestartPolicy,
    Service, ServiceResources, Stack, StackResources, StackVolume, StorageResource,
};
