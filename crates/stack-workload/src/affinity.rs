//! Pod affinity for named volumes
//!
//! A named volume lives on node-local storage owned by whichever pod claimed it first,
//! so every pod mounting it is required onto the same host. Pods mounting a named
//! volume also carry the matching `stack-volume-name-<id>` label (see
//! [`crate::volumes`]), which anchors the first pod to its own term.

use stack_common::naming::affinity_label_key;
use stack_common::StackVolume;

use crate::k8s::{Affinity, LabelSelector, LabelSelectorRequirement, PodAffinity, PodAffinityTerm};

/// Topology key for same-node scheduling
pub const HOSTNAME_TOPOLOGY_KEY: &str = "kubernetes.io/hostname";

/// Build required pod affinity terms, one per named volume in declaration order
///
/// Anonymous volumes are skipped. Returns `None` when no named volume remains.
pub fn compile_affinity<'a>(
    volumes: impl IntoIterator<Item = &'a StackVolume>,
) -> Option<Affinity> {
    let mut affinity: Option<Affinity> = None;

    for volume in volumes.into_iter().filter(|v| v.is_named()) {
        let term = PodAffinityTerm {
            label_selector: LabelSelector {
                match_expressions: vec![LabelSelectorRequirement {
                    key: affinity_label_key(&volume.local_path),
                    operator: "Exists".to_string(),
                    values: Vec::new(),
                }],
                ..Default::default()
            },
            topology_key: HOSTNAME_TOPOLOGY_KEY.to_string(),
        };

        affinity
            .get_or_insert_with(Affinity::default)
            .pod_affinity
            .get_or_insert_with(PodAffinity::default)
            .required_during_scheduling_ignored_during_execution
            .push(term);
    }

    affinity
}
