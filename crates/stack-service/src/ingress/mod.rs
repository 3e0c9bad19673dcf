//! Ingress module for stack routing objects
//!
//! Routing objects are built in two steps: a flavor-independent [`IngressPlan`]
//! (name, identity, ordered path rules) and a schema that renders it. Two schemas are
//! supported because clusters disagree on the Ingress API version:
//!
//! - **networking.k8s.io/v1**: paths carry `pathType` and a structured service backend
//! - **networking.k8s.io/v1beta1**: legacy `serviceName`/`servicePort` backend
//!
//! Plans come from two sources:
//! - every published port of a service (`<service>-<port>`, single `/` rule)
//! - every stack endpoint (`<endpoint>`, the endpoint's rules in order)

mod v1;
mod v1beta1;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use stack_common::naming::{
    endpoint_labels, ingress_name, service_labels, AUTO_INGRESS_ANNOTATION,
    GENERATE_HOST_ANNOTATION, PRIVATE_ANNOTATION,
};
use stack_common::{Endpoint, Port, Service, Stack};
use stack_workload::k8s::ObjectMeta;

use crate::error::CompileError;

pub use v1::{
    HttpIngressPath, HttpIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, ServiceBackendPort,
};
pub use v1beta1::{
    HttpIngressPathV1Beta1, HttpIngressRuleValueV1Beta1, IngressBackendV1Beta1, IngressRuleV1Beta1,
    IngressSpecV1Beta1, IngressV1Beta1,
};

// =============================================================================
// Flavor and visibility
// =============================================================================

/// Ingress API version to emit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IngressFlavor {
    /// networking.k8s.io/v1
    #[default]
    V1,
    /// networking.k8s.io/v1beta1
    V1Beta1,
}

impl IngressFlavor {
    /// Flavor name as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V1Beta1 => "v1beta1",
        }
    }
}

impl fmt::Display for IngressFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngressFlavor {
    type Err = stack_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" => Ok(Self::V1),
            "v1beta1" => Ok(Self::V1Beta1),
            other => Err(stack_common::Error::validation(format!(
                "unknown ingress flavor '{other}' (expected 'v1' or 'v1beta1')"
            ))),
        }
    }
}

/// Whether a routing object gets a public host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// A public host is generated
    Public,
    /// The object exists but stays private
    Private,
}

impl Visibility {
    /// Resolve visibility from declared annotations; any private marker wins
    pub fn resolve(annotations: &BTreeMap<String, String>) -> Self {
        let is = |key: &str, value: &str| annotations.get(key).is_some_and(|v| v == value);

        if is(PRIVATE_ANNOTATION, "true")
            || is(AUTO_INGRESS_ANNOTATION, "private")
            || is(GENERATE_HOST_ANNOTATION, "private")
        {
            Self::Private
        } else {
            Self::Public
        }
    }

    /// Value of the generate-host annotation
    pub fn generate_host(&self) -> &'static str {
        match self {
            Self::Public => "true",
            Self::Private => "private",
        }
    }
}

// =============================================================================
// Plan
// =============================================================================

/// One path rule: `path` routes to `service:port`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutePath {
    /// URL path
    pub path: String,
    /// Backend service
    pub service: String,
    /// Backend port
    pub port: u16,
}

/// Flavor-independent description of a routing object
#[derive(Clone, Debug, PartialEq)]
pub struct IngressPlan {
    /// Object metadata, annotations already resolved
    pub metadata: ObjectMeta,
    /// Resolved visibility
    pub visibility: Visibility,
    /// Ordered path rules
    pub paths: Vec<RoutePath>,
}

impl IngressPlan {
    fn new(
        name: String,
        labels: BTreeMap<String, String>,
        declared: &BTreeMap<String, String>,
        paths: Vec<RoutePath>,
    ) -> Self {
        let visibility = Visibility::resolve(declared);
        let metadata = ObjectMeta::new(name)
            .with_labels(labels)
            .with_annotations(declared.clone())
            .with_annotation(GENERATE_HOST_ANNOTATION, visibility.generate_host());

        Self {
            metadata,
            visibility,
            paths,
        }
    }

    /// Plan the routing object of one published port
    pub fn for_service_port(
        stack_name: &str,
        service_name: &str,
        service: &Service,
        port: &Port,
    ) -> Self {
        Self::new(
            ingress_name(service_name, port.container_port),
            service_labels(stack_name, service_name, &service.labels),
            &service.annotations,
            vec![RoutePath {
                path: "/".to_string(),
                service: service_name.to_string(),
                port: port.container_port,
            }],
        )
    }

    /// Plan the routing objects of every published port of a service
    pub fn for_service(stack_name: &str, service_name: &str, service: &Service) -> Vec<Self> {
        service
            .published_ports()
            .map(|port| Self::for_service_port(stack_name, service_name, service, port))
            .collect()
    }

    /// Plan the routing object of an endpoint
    ///
    /// Fails when a rule targets a service the stack does not define.
    pub fn for_endpoint(
        stack: &Stack,
        endpoint_name: &str,
        endpoint: &Endpoint,
    ) -> Result<Self, CompileError> {
        let paths = endpoint
            .rules
            .iter()
            .map(|rule| {
                if stack.service(&rule.service).is_none() {
                    return Err(CompileError::service_not_found(&rule.service, endpoint_name));
                }
                Ok(RoutePath {
                    path: rule.path.clone(),
                    service: rule.service.clone(),
                    port: rule.port,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(
            endpoint_name.to_string(),
            endpoint_labels(&stack.name, endpoint_name, &endpoint.labels),
            &endpoint.annotations,
            paths,
        ))
    }

    /// Object name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Render the plan in the requested schema
    pub fn emit(&self, flavor: IngressFlavor) -> RoutingObject {
        match flavor {
            IngressFlavor::V1 => RoutingObject::V1(Ingress::from_plan(self)),
            IngressFlavor::V1Beta1 => RoutingObject::V1Beta1(IngressV1Beta1::from_plan(self)),
        }
    }
}

// =============================================================================
// Schemas
// =============================================================================

/// A routing object schema that can be rendered from a plan
pub trait RoutingSchema: Sized {
    /// API version the schema serializes as
    const API_VERSION: &'static str;

    /// Render a plan
    fn from_plan(plan: &IngressPlan) -> Self;
}

/// A rendered routing object
///
/// Serializes as the wrapped object.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RoutingObject {
    /// networking.k8s.io/v1
    V1(Ingress),
    /// networking.k8s.io/v1beta1
    V1Beta1(IngressV1Beta1),
}

impl RoutingObject {
    /// Object metadata
    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::V1(i) => &i.metadata,
            Self::V1Beta1(i) => &i.metadata,
        }
    }

    /// Object name
    pub fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Flavor the object was rendered in
    pub fn flavor(&self) -> IngressFlavor {
        match self {
            Self::V1(_) => IngressFlavor::V1,
            Self::V1Beta1(_) => IngressFlavor::V1Beta1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use stack_common::naming::{
        STACK_ENDPOINT_NAME_LABEL, STACK_NAME_LABEL, STACK_SERVICE_NAME_LABEL,
    };
    use stack_common::EndpointRule;

    fn annotations(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn make_stack() -> Stack {
        let mut api = Service::new("api:1");
        api.ports = vec![Port::mapped(80, 8080), Port::container(9090)];
        api.labels = annotations(&[("tier", "back")]);
        api.annotations = annotations(&[("owner", "alice")]);

        Stack::new("shop")
            .with_service("api", api)
            .with_service("web", Service::new("web:1"))
    }

    // =========================================================================
    // Story: Visibility policy
    // =========================================================================

    #[rstest]
    #[case(&[], Visibility::Public)]
    #[case(&[("dev.okteto.com/private", "true")], Visibility::Private)]
    #[case(&[("dev.okteto.com/private", "false")], Visibility::Public)]
    #[case(&[("dev.okteto.com/auto-ingress", "private")], Visibility::Private)]
    #[case(&[("dev.okteto.com/auto-ingress", "true")], Visibility::Public)]
    #[case(&[("dev.okteto.com/generate-host", "private")], Visibility::Private)]
    #[case(&[("dev.okteto.com/generate-host", "true")], Visibility::Public)]
    #[case(
        &[("dev.okteto.com/generate-host", "true"), ("dev.okteto.com/private", "true")],
        Visibility::Private
    )]
    fn visibility_resolution(#[case] pairs: &[(&str, &str)], #[case] expected: Visibility) {
        assert_eq!(Visibility::resolve(&annotations(pairs)), expected);
    }

    #[test]
    fn public_marker_does_not_override_private_annotation() {
        let mut stack = make_stack();
        let api = stack.services.get_mut("api").unwrap();
        api.public = true;
        api.annotations
            .insert(PRIVATE_ANNOTATION.to_string(), "true".to_string());

        let plans = IngressPlan::for_service("shop", "api", &stack.services["api"]);
        assert_eq!(plans.len(), 2);
        for plan in plans {
            assert_eq!(plan.visibility, Visibility::Private);
            assert_eq!(plan.metadata.annotations[GENERATE_HOST_ANNOTATION], "private");
        }
    }

    // =========================================================================
    // Story: Per-port routing objects
    // =========================================================================

    #[test]
    fn only_published_ports_get_a_plan() {
        let stack = make_stack();
        let plans = IngressPlan::for_service("shop", "api", &stack.services["api"]);

        assert_eq!(plans.len(), 1);
        let plan = &plans[0];
        assert_eq!(plan.name(), "api-8080");
        assert_eq!(
            plan.paths,
            vec![RoutePath {
                path: "/".to_string(),
                service: "api".to_string(),
                port: 8080,
            }]
        );
    }

    #[test]
    fn public_services_publish_every_port() {
        let mut stack = make_stack();
        stack.services.get_mut("api").unwrap().public = true;

        let plans = IngressPlan::for_service("shop", "api", &stack.services["api"]);
        let names: Vec<_> = plans.iter().map(IngressPlan::name).collect();
        assert_eq!(names, vec!["api-8080", "api-9090"]);
    }

    #[test]
    fn port_plan_carries_service_identity_and_annotations() {
        let stack = make_stack();
        let plan = &IngressPlan::for_service("shop", "api", &stack.services["api"])[0];

        let labels = &plan.metadata.labels;
        assert_eq!(labels[STACK_NAME_LABEL], "shop");
        assert_eq!(labels[STACK_SERVICE_NAME_LABEL], "api");
        assert_eq!(labels["tier"], "back");

        let annotations = &plan.metadata.annotations;
        assert_eq!(annotations["owner"], "alice");
        assert_eq!(annotations[GENERATE_HOST_ANNOTATION], "true");
        assert_eq!(plan.visibility, Visibility::Public);
    }

    // =========================================================================
    // Story: Endpoint routing objects
    // =========================================================================

    #[test]
    fn endpoint_plan_keeps_rules_in_order() {
        let stack = make_stack();
        let endpoint = Endpoint {
            rules: vec![
                EndpointRule::new("/api", "api", 8080),
                EndpointRule::new("/", "web", 80),
            ],
            labels: annotations(&[("edge", "yes")]),
            annotations: annotations(&[("dev.okteto.com/auto-ingress", "private")]),
        };

        let plan = IngressPlan::for_endpoint(&stack, "gateway", &endpoint).unwrap();

        assert_eq!(plan.name(), "gateway");
        let routes: Vec<_> = plan
            .paths
            .iter()
            .map(|p| (p.path.as_str(), p.service.as_str(), p.port))
            .collect();
        assert_eq!(routes, vec![("/api", "api", 8080), ("/", "web", 80)]);

        let labels = &plan.metadata.labels;
        assert_eq!(labels[STACK_NAME_LABEL], "shop");
        assert_eq!(labels[STACK_ENDPOINT_NAME_LABEL], "gateway");
        assert_eq!(labels["edge"], "yes");
        assert!(!labels.contains_key(STACK_SERVICE_NAME_LABEL));

        assert_eq!(plan.visibility, Visibility::Private);
        assert_eq!(plan.metadata.annotations[GENERATE_HOST_ANNOTATION], "private");
        assert_eq!(plan.metadata.annotations[AUTO_INGRESS_ANNOTATION], "private");
    }

    #[test]
    fn endpoint_referencing_unknown_service_fails() {
        let stack = make_stack();
        let endpoint = Endpoint {
            rules: vec![EndpointRule::new("/", "ghost", 80)],
            ..Default::default()
        };

        let err = IngressPlan::for_endpoint(&stack, "gateway", &endpoint).unwrap_err();
        assert_eq!(err, CompileError::service_not_found("ghost", "gateway"));
    }

    // =========================================================================
    // Story: Both flavors render the same plan
    // =========================================================================

    #[test]
    fn emit_selects_schema_by_flavor() {
        let stack = make_stack();
        let plan = &IngressPlan::for_service("shop", "api", &stack.services["api"])[0];

        let v1 = plan.emit(IngressFlavor::V1);
        let legacy = plan.emit(IngressFlavor::V1Beta1);

        assert_eq!(v1.flavor(), IngressFlavor::V1);
        assert_eq!(legacy.flavor(), IngressFlavor::V1Beta1);
        assert_eq!(v1.metadata(), legacy.metadata());
        assert_eq!(v1.name(), "api-8080");
    }

    #[rstest]
    #[case("v1", IngressFlavor::V1)]
    #[case("V1", IngressFlavor::V1)]
    #[case("v1beta1", IngressFlavor::V1Beta1)]
    #[case(" v1beta1 ", IngressFlavor::V1Beta1)]
    fn flavor_parses(#[case] input: &str, #[case] expected: IngressFlavor) {
        assert_eq!(input.parse::<IngressFlavor>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<IngressFlavor>().unwrap(), expected);
    }

    #[test]
    fn unknown_flavor_is_rejected() {
        assert!("extensions/v1beta1".parse::<IngressFlavor>().is_err());
    }
}
