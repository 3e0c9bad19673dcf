//! Canonical names and label sets
//!
//! Every emitted object is found again by a later reconciler through these labels, so
//! the values produced here must stay identical across every object kind.

use std::collections::BTreeMap;

/// Label marking an object as owned by the stack tooling (snapshot only)
pub const STACK_LABEL: &str = "stack";
/// Label carrying the stack name
pub const STACK_NAME_LABEL: &str = "stack-name";
/// Label carrying the service name
pub const STACK_SERVICE_NAME_LABEL: &str = "stack-service-name";
/// Label carrying the endpoint name
pub const STACK_ENDPOINT_NAME_LABEL: &str = "stack-endpoint-name";
/// Prefix of the per-volume pod label used by affinity terms
pub const STACK_VOLUME_LABEL_PREFIX: &str = "stack-volume-name-";

/// Annotation requesting an automatic ingress
pub const AUTO_INGRESS_ANNOTATION: &str = "dev.okteto.com/auto-ingress";
/// Annotation forcing an object private
pub const PRIVATE_ANNOTATION: &str = "dev.okteto.com/private";
/// Annotation asking the platform to generate a host
pub const GENERATE_HOST_ANNOTATION: &str = "dev.okteto.com/generate-host";

/// Name of the shared volume claim
pub const PVC_NAME: &str = "pvc";
/// Where the first init container mounts the claim root
pub const DATA_STAGING_PATH: &str = "/data";
/// Image of the permission-fixing init container
pub const DEFAULT_INIT_IMAGE: &str = "busybox";
/// Snapshot data key holding the stack name
pub const SNAPSHOT_NAME_KEY: &str = "name";
/// Snapshot data key holding the base64 manifest
pub const SNAPSHOT_YAML_KEY: &str = "yaml";

const CONFIG_PREFIX: &str = "okteto-";
const TRUE: &str = "true";

/// Workload, network and StatefulSet service name
pub fn workload_name(service: &str) -> String {
    service.to_string()
}

/// Metadata snapshot name
pub fn config_name(stack: &str) -> String {
    format!("{CONFIG_PREFIX}{stack}")
}

/// Permission-fixing init container name
pub fn init_container_name(service: &str) -> String {
    format!("init-{service}")
}

/// Volume-seeding init container name
pub fn volume_init_container_name(service: &str) -> String {
    format!("init-volume-{service}")
}

/// Name of a network port: `p-<servicePort>-<targetPort>-<protocol>`
pub fn service_port_name(service_port: u16, target_port: u16, protocol: &str) -> String {
    format!(
        "p-{service_port}-{target_port}-{}",
        protocol.to_ascii_lowercase()
    )
}

/// Pod label key anchoring affinity for a named volume
pub fn affinity_label_key(volume: &str) -> String {
    format!("{STACK_VOLUME_LABEL_PREFIX}{volume}")
}

/// Sub-path of the i-th volume inside the shared claim
pub fn volume_sub_path(index: usize) -> String {
    format!("data-{index}")
}

/// Mount path of the i-th volume inside the seed container
pub fn seed_mount_path(index: usize) -> String {
    format!("/init-volume-{index}")
}

/// Per-port routing object name
pub fn ingress_name(service: &str, port: u16) -> String {
    format!("{service}-{port}")
}

/// Labels of the metadata snapshot
pub fn snapshot_labels(stack: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (STACK_LABEL.to_string(), TRUE.to_string()),
        (STACK_NAME_LABEL.to_string(), stack.to_string()),
    ])
}

/// Labels of a service-scoped object: declared labels overlaid by the derived pair
pub fn service_labels(
    stack: &str,
    service: &str,
    declared: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut labels = declared.clone();
    labels.extend(service_selector(stack, service));
    labels
}

/// Labels of an endpoint-scoped object: declared labels overlaid by the derived pair
pub fn endpoint_labels(
    stack: &str,
    endpoint: &str,
    declared: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut labels = declared.clone();
    labels.insert(STACK_NAME_LABEL.to_string(), stack.to_string());
    labels.insert(STACK_ENDPOINT_NAME_LABEL.to_string(), endpoint.to_string());
    labels
}

/// Selector binding workloads to networks; never includes declared labels
pub fn service_selector(stack: &str, service: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (STACK_NAME_LABEL.to_string(), stack.to_string()),
        (STACK_SERVICE_NAME_LABEL.to_string(), service.to_string()),
    ])
}

/// Pod template label announcing that a pod owns a named volume
pub fn volume_owner_label(volume: &str) -> (String, String) {
    (affinity_label_key(volume), TRUE.to_string())
}
