//! networking.k8s.io/v1 Ingress

use serde::{Deserialize, Serialize};
use stack_workload::k8s::ObjectMeta;

use super::{IngressPlan, RoutingSchema};

/// Path type used for every rule; matching is left to the ingress controller
pub const PATH_TYPE: &str = "ImplementationSpecific";

/// Kubernetes Ingress (networking.k8s.io/v1)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingress {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: IngressSpec,
}

/// Ingress spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpec {
    /// Host-less rules
    pub rules: Vec<IngressRule>,
}

/// Ingress rule
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressRule {
    /// HTTP paths
    pub http: HttpIngressRuleValue,
}

/// HTTP rule value
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpIngressRuleValue {
    /// Paths in match order
    pub paths: Vec<HttpIngressPath>,
}

/// Path to backend mapping
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpIngressPath {
    /// URL path
    pub path: String,
    /// Exact, Prefix or ImplementationSpecific
    pub path_type: String,
    /// Backend
    pub backend: IngressBackend,
}

/// Ingress backend
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressBackend {
    /// Service backend
    pub service: IngressServiceBackend,
}

/// Service backend
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressServiceBackend {
    /// Service name
    pub name: String,
    /// Service port
    pub port: ServiceBackendPort,
}

/// Service port by number
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBackendPort {
    /// Port number
    pub number: u16,
}

impl RoutingSchema for Ingress {
    const API_VERSION: &'static str = "networking.k8s.io/v1";

    fn from_plan(plan: &IngressPlan) -> Self {
        let paths = plan
            .paths
            .iter()
            .map(|p| HttpIngressPath {
                path: p.path.clone(),
                path_type: PATH_TYPE.to_string(),
                backend: IngressBackend {
                    service: IngressServiceBackend {
                        name: p.service.clone(),
                        port: ServiceBackendPort { number: p.port },
                    },
                },
            })
            .collect();

        Self {
            api_version: Self::API_VERSION.to_string(),
            kind: "Ingress".to_string(),
            metadata: plan.metadata.clone(),
            spec: IngressSpec {
                rules: vec![IngressRule {
                    http: HttpIngressRuleValue { paths },
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingress::{RoutePath, Visibility};

    #[test]
    fn renders_structured_backend_with_path_type() {
        let plan = IngressPlan {
            metadata: ObjectMeta::new("web"),
            visibility: Visibility::Public,
            paths: vec![
                RoutePath {
                    path: "/api".to_string(),
                    service: "api".to_string(),
                    port: 8080,
                },
                RoutePath {
                    path: "/".to_string(),
                    service: "frontend".to_string(),
                    port: 80,
                },
            ],
        };

        let json = serde_json::to_value(Ingress::from_plan(&plan)).unwrap();

        assert_eq!(json["apiVersion"], "networking.k8s.io/v1");
        assert_eq!(json["kind"], "Ingress");
        let paths = &json["spec"]["rules"][0]["http"]["paths"];
        assert_eq!(paths[0]["path"], "/api");
        assert_eq!(paths[0]["pathType"], "ImplementationSpecific");
        assert_eq!(paths[0]["backend"]["service"]["name"], "api");
        assert_eq!(paths[0]["backend"]["service"]["port"]["number"], 8080);
        assert_eq!(paths[1]["backend"]["service"]["name"], "frontend");
    }
}
