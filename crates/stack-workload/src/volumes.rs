//! Volume multiplexer for stack services
//!
//! Covers:
//! - One shared claim per workload, partitioned into `data-<i>` sub-paths
//! - The init container that makes the claim root world-writable
//! - The init container that seeds each sub-path from the service image
//! - Volume mounts in the main container
//! - Pod labels announcing named-volume ownership (anchors for affinity terms)

use std::collections::BTreeMap;

use stack_common::naming::{
    init_container_name, seed_mount_path, volume_init_container_name, volume_owner_label,
    volume_sub_path, DATA_STAGING_PATH, PVC_NAME,
};
use stack_common::{Service, StackVolume, StorageResource};

use crate::k8s::{
    Container, ObjectMeta, PersistentVolumeClaim, PvcResources, PvcSpec, PvcStorage, VolumeMount,
};

/// Claim size when the service requests no storage
pub const DEFAULT_STORAGE_SIZE: &str = "1Gi";

// =============================================================================
// Volume Plan
// =============================================================================

/// Volume-related pieces of a pod template
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VolumePlan {
    /// Mounts for the main container, one per declared volume
    pub mounts: Vec<VolumeMount>,
    /// Init containers, in execution order
    pub init_containers: Vec<Container>,
    /// Pod labels (for volume ownership)
    pub pod_labels: BTreeMap<String, String>,
}

impl VolumePlan {
    /// True when the service declares no volumes
    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty() && self.init_containers.is_empty() && self.pod_labels.is_empty()
    }
}

// =============================================================================
// Volume Compiler
// =============================================================================

/// Compiler for the shared-claim volume layout
pub struct VolumeCompiler;

impl VolumeCompiler {
    /// Plan the claim layout of a service
    ///
    /// The i-th declared volume is stored under sub-path `data-<i>` of the shared claim,
    /// both in the seed container and in the main container. No volumes, empty plan.
    pub fn plan(service_name: &str, service: &Service, init_image: &str) -> VolumePlan {
        if service.volumes.is_empty() {
            return VolumePlan::default();
        }

        let mounts = service
            .volumes
            .iter()
            .enumerate()
            .map(|(i, v)| VolumeMount::sub_path(PVC_NAME, &v.remote_path, volume_sub_path(i)))
            .collect();

        let pod_labels = service
            .named_volumes()
            .map(|v| volume_owner_label(&v.local_path))
            .collect();

        VolumePlan {
            mounts,
            init_containers: vec![
                Self::permissions_container(service_name, init_image),
                Self::seed_container(service_name, &service.image, &service.volumes),
            ],
            pod_labels,
        }
    }

    /// Compile the claim template of a StatefulSet
    pub fn claim_template(
        labels: BTreeMap<String, String>,
        annotations: BTreeMap<String, String>,
        storage: &StorageResource,
    ) -> PersistentVolumeClaim {
        PersistentVolumeClaim {
            metadata: ObjectMeta::new(PVC_NAME)
                .with_labels(labels)
                .with_annotations(annotations),
            spec: PvcSpec {
                access_modes: vec!["ReadWriteOnce".to_string()],
                resources: PvcResources {
                    requests: PvcStorage {
                        storage: storage
                            .size
                            .clone()
                            .unwrap_or_else(|| DEFAULT_STORAGE_SIZE.to_string()),
                    },
                },
                storage_class_name: storage.class.clone(),
            },
        }
    }

    /// Make the claim root writable for whatever UID the service runs as
    fn permissions_container(service_name: &str, init_image: &str) -> Container {
        Container {
            name: init_container_name(service_name),
            image: init_image.to_string(),
            command: shell(format!("chmod 777 {DATA_STAGING_PATH}")),
            volume_mounts: vec![VolumeMount::root(PVC_NAME, DATA_STAGING_PATH)],
            ..Default::default()
        }
    }

    /// Copy each volume's content from the service image into its sub-path
    ///
    /// A failing copy does not fail the container.
    fn seed_container(service_name: &str, image: &str, volumes: &[StackVolume]) -> Container {
        let mut script = "echo initializing volume...".to_string();
        let mut mounts = Vec::with_capacity(volumes.len());

        for (i, volume) in volumes.iter().enumerate() {
            let target = seed_mount_path(i);
            script.push_str(&format!(
                " && (cp -Rv {}/. {} || true)",
                volume.remote_path, target
            ));
            mounts.push(VolumeMount::sub_path(PVC_NAME, target, volume_sub_path(i)));
        }

        Container {
            name: volume_init_container_name(service_name),
            image: image.to_string(),
            image_pull_policy: Some("IfNotPresent".to_string()),
            command: shell(script),
            volume_mounts: mounts,
            ..Default::default()
        }
    }
}

fn shell(script: String) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script]
}
