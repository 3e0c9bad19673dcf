//! Metadata snapshot of a stack
//!
//! A ConfigMap named `okteto-<stack>` keeps the stack name and the base64 of the raw
//! source manifest, so a later process can recover both without re-parsing.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use stack_common::naming::{config_name, snapshot_labels, SNAPSHOT_NAME_KEY, SNAPSHOT_YAML_KEY};
use stack_common::Stack;
use stack_workload::k8s::ConfigMap;

use crate::error::CompileError;

/// Build the snapshot ConfigMap of a stack
pub fn compile_snapshot(stack: &Stack) -> Result<ConfigMap, CompileError> {
    if stack.name.is_empty() {
        return Err(CompileError::snapshot("stack name is empty"));
    }

    let mut cm = ConfigMap::new(config_name(&stack.name))
        .with_data(SNAPSHOT_NAME_KEY, &stack.name)
        .with_data(SNAPSHOT_YAML_KEY, STANDARD.encode(&stack.manifest));
    cm.metadata.labels = snapshot_labels(&stack.name);
    Ok(cm)
}

/// Recover the raw manifest bytes from a snapshot
pub fn decode_manifest(snapshot: &ConfigMap) -> Result<Vec<u8>, CompileError> {
    let encoded = snapshot
        .data
        .get(SNAPSHOT_YAML_KEY)
        .ok_or_else(|| CompileError::snapshot(format!("missing '{SNAPSHOT_YAML_KEY}' key")))?;

    STANDARD
        .decode(encoded)
        .map_err(|e| CompileError::snapshot(format!("invalid manifest encoding: {e}")))
}
