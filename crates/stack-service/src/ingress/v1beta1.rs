//! networking.k8s.io/v1beta1 Ingress, for clusters older than 1.19

use serde::{Deserialize, Serialize};
use stack_workload::k8s::ObjectMeta;

use super::{IngressPlan, RoutingSchema};

/// Kubernetes Ingress (networking.k8s.io/v1beta1)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressV1Beta1 {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: IngressSpecV1Beta1,
}

/// Ingress spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressSpecV1Beta1 {
    /// Host-less rules
    pub rules: Vec<IngressRuleV1Beta1>,
}

/// Ingress rule
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressRuleV1Beta1 {
    /// HTTP paths
    pub http: HttpIngressRuleValueV1Beta1,
}

/// HTTP rule value
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpIngressRuleValueV1Beta1 {
    /// Paths in match order
    pub paths: Vec<HttpIngressPathV1Beta1>,
}

/// Path to backend mapping, no path type
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpIngressPathV1Beta1 {
    /// URL path
    pub path: String,
    /// Backend
    pub backend: IngressBackendV1Beta1,
}

/// Legacy backend
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngressBackendV1Beta1 {
    /// Service name
    pub service_name: String,
    /// Service port
    pub service_port: u16,
}

impl RoutingSchema for IngressV1Beta1 {
    const API_VERSION: &'static str = "networking.k8s.io/v1beta1";

    fn from_plan(plan: &IngressPlan) -> Self {
        let paths = plan
            .paths
            .iter()
            .map(|p| HttpIngressPathV1Beta1 {
                path: p.path.clone(),
                backend: IngressBackendV1Beta1 {
                    service_name: p.service.clone(),
                    service_port: p.port,
                },
            })
            .collect();

        Self {
            api_version: Self::API_VERSION.to_string(),
            kind: "Ingress".to_string(),
            metadata: plan.metadata.clone(),
            spec: IngressSpecV1Beta1 {
                rules: vec![IngressRuleV1Beta1 {
                    http: HttpIngressRuleValueV1Beta1 { paths },
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
    fn renders_legacy_backend_without_path_type() {
        let plan = IngressPlan {
            metadata: ObjectMeta::new("api-8080"),
            visibility: Visibility::Private,
            paths: vec![RoutePath {
                path: "/".to_string(),
                service: "api".to_string(),
                port: 8080,
            }],
        };

        let json = serde_json::to_value(IngressV1Beta1::from_plan(&plan)).unwrap();

        assert_eq!(json["apiVersion"], "networking.k8s.io/v1beta1");
        assert_eq!(json["metadata"]["name"], "api-8080");
        let path = &json["spec"]["rules"][0]["http"]["paths"][0];
        assert_eq!(path["path"], "/");
        assert!(path.get("pathType").is_none());
        assert_eq!(path["backend"]["serviceName"], "api");
        assert_eq!(path["backend"]["servicePort"], 8080);
    }
}
