//! Main container translation
//!
//! Environment, ports, resource limits and security context of the service container.
//! Probes come from [`crate::probe`] and volume mounts from [`crate::volumes`].

use stack_common::quantity::{validate_cpu_quantity, validate_memory_quantity};
use stack_common::{EnvVar as StackEnvVar, Port, StackResources};
use tracing::debug;

use crate::error::CompilationError;
use crate::k8s::{
    Capabilities, ContainerPort, EnvVar, ResourceQuantity, ResourceRequirements, SecurityContext,
};

/// Translate environment variables, preserving order and duplicates
///
/// Variables without a name cannot be represented in a container spec and are dropped.
pub fn compile_env(service_name: &str, environment: &[StackEnvVar]) -> Vec<EnvVar> {
    environment
        .iter()
        .filter(|var| {
            if var.name.is_empty() {
                debug!(service = %service_name, "dropping environment variable without a name");
                return false;
            }
            true
        })
        .map(|var| EnvVar::literal(&var.name, &var.value))
        .collect()
}

/// Copy declared ports; host ports never reach the container
pub fn compile_ports(ports: &[Port]) -> Vec<ContainerPort> {
    ports
        .iter()
        .map(|p| ContainerPort {
            container_port: p.container_port,
            protocol: Some(p.protocol.as_str().to_string()),
        })
        .collect()
}

/// Translate resource limits
///
/// Only ceilings are enforced: cpu and memory requests are never set. Returns `None`
/// when no limit is declared.
pub fn compile_resources(
    service_name: &str,
    resources: &StackResources,
) -> Result<Option<ResourceRequirements>, CompilationError> {
    let limits = &resources.limits;
    if let Some(cpu) = &limits.cpu {
        validate_cpu_quantity(cpu, "limits.cpu")
            .map_err(|e| CompilationError::quantity(service_name, e))?;
    }
    if let Some(memory) = &limits.memory {
        validate_memory_quantity(memory, "limits.memory")
            .map_err(|e| CompilationError::quantity(service_name, e))?;
    }

    let quantity = ResourceQuantity {
        cpu: limits.cpu.clone(),
        memory: limits.memory.clone(),
    };
    if quantity.is_empty() {
        return Ok(None);
    }

    Ok(Some(ResourceRequirements {
        requests: None,
        limits: Some(quantity),
    }))
}

/// Build the security context, or `None` when no capability is added or dropped
pub fn compile_security_context(
    cap_add: &[String],
    cap_drop: &[String],
) -> Option<SecurityContext> {
    if cap_add.is_empty() && cap_drop.is_empty() {
        return None;
    }

    Some(SecurityContext {
        capabilities: Some(Capabilities {
            add: cap_add.to_vec(),
            drop: cap_drop.to_vec(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use stack_common::{Protocol, ServiceResources};

    // =========================================================================
    // Story: Environment
    // =========================================================================

    #[test]
    fn env_keeps_order_and_duplicates() {
        let env = compile_env(
            "api",
            &[
                StackEnvVar::new("A", "1"),
                StackEnvVar::new("B", ""),
                StackEnvVar::new("A", "2"),
            ],
        );

        assert_eq!(
            env,
            vec![
                EnvVar::literal("A", "1"),
                EnvVar::literal("B", ""),
                EnvVar::literal("A", "2"),
            ]
        );
    }

    #[test]
    fn env_drops_unnamed_variables() {
        let env = compile_env("api", &[StackEnvVar::new("", "orphan"), StackEnvVar::new("X", "y")]);
        assert_eq!(env, vec![EnvVar::literal("X", "y")]);
    }

    // =========================================================================
    // Story: Ports
    // =========================================================================

    #[test]
    fn host_ports_are_not_copied() {
        let ports = compile_ports(&[
            Port::mapped(82, 80),
            Port::container(53).with_protocol(Protocol::Udp),
        ]);

        assert_eq!(
            ports,
            vec![
                ContainerPort {
                    container_port: 80,
                    protocol: Some("TCP".to_string()),
                },
                ContainerPort {
                    container_port: 53,
                    protocol: Some("UDP".to_string()),
                },
            ]
        );
    }

    // =========================================================================
    // Story: Resources are ceilings only
    // =========================================================================

    #[test]
    fn no_limits_no_requirements() {
        assert_eq!(compile_resources("api", &StackResources::default()).unwrap(), None);
    }

    #[test]
    fn limits_are_copied_and_requests_ignored() {
        let resources = StackResources {
            limits: ServiceResources {
                cpu: Some("500m".to_string()),
                memory: Some("1Gi".to_string()),
                ..Default::default()
            },
            requests: ServiceResources {
                cpu: Some("100m".to_string()),
                memory: Some("128Mi".to_string()),
                ..Default::default()
            },
        };

        let req = compile_resources("api", &resources)
            .unwrap()
            .expect("should have requirements");
        assert!(req.requests.is_none());
        let limits = req.limits.expect("should have limits");
        assert_eq!(limits.cpu.as_deref(), Some("500m"));
        assert_eq!(limits.memory.as_deref(), Some("1Gi"));
    }

    #[rstest]
    #[case(Some("lots"), None)]
    #[case(None, Some("a-gig"))]
    fn malformed_limits_are_rejected(#[case] cpu: Option<&str>, #[case] memory: Option<&str>) {
        let resources = StackResources {
            limits: ServiceResources {
                cpu: cpu.map(str::to_string),
                memory: memory.map(str::to_string),
                ..Default::default()
            },
            ..Default::default()
        };

        let err = compile_resources("api", &resources).unwrap_err();
        assert!(matches!(err, CompilationError::Quantity { ref service, .. } if service == "api"));
    }

    // =========================================================================
    // Story: Security context only when capabilities change
    // =========================================================================

    #[test]
    fn no_capabilities_no_security_context() {
        assert!(compile_security_context(&[], &[]).is_none());
    }

    #[rstest]
    #[case(vec!["NET_ADMIN"], vec![])]
    #[case(vec![], vec!["ALL"])]
    #[case(vec!["SYS_ADMIN"], vec!["SYS_NICE"])]
    fn capabilities_are_copied_exactly(#[case] add: Vec<&str>, #[case] drop: Vec<&str>) {
        let add: Vec<String> = add.into_iter().map(String::from).collect();
        let drop: Vec<String> = drop.into_iter().map(String::from).collect();

        let ctx = compile_security_context(&add, &drop).expect("should have security context");
        let caps = ctx.capabilities.expect("should have capabilities");
        assert_eq!(caps.add, add);
        assert_eq!(caps.drop, drop);
    }
}
