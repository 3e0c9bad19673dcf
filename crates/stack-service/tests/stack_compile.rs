//! End-to-end compilation of a stack document

use stack_common::Stack;
use stack_service::metadata::decode_manifest;
use stack_service::{CompilerConfig, IngressFlavor, StackCompiler};
use stack_workload::WorkloadKind;

const STACK: &str = r#"
name: voting
services:
  vote:
    image: okteto/vote:1
    replicas: 2
    ports:
      - containerPort: 80
        hostPort: 8080
    environment:
      - name: REDIS_HOST
        value: redis
    healthcheck:
      http:
        path: /health
        port: 80
      startPeriod: 30
      timeout: 300
    resources:
      limits:
        cpu: 500m
        memory: 256Mi
  redis:
    image: redis:7
    ports:
      - containerPort: 6379
    volumes:
      - localPath: redis-data
        remotePath: /data
    resources:
      requests:
        storage:
          size: 5Gi
  worker:
    image: okteto/worker:1
    public: true
    ports:
      - containerPort: 9000
    capAdd: [NET_ADMIN]
    annotations:
      dev.okteto.com/private: "true"
  seed:
    image: okteto/seed:1
    restartPolicy: OnFailure
    backoffLimit: 2
    volumes:
      - localPath: fixtures
        remotePath: /fixtures
endpoints:
  main:
    rules:
      - path: /
        service: vote
        port: 80
      - path: /worker
        service: worker
        port: 9000
"#;

fn load() -> Stack {
    let stack: Stack = serde_yaml::from_str(STACK).expect("stack should parse");
    stack.with_manifest(STACK)
}

#[test]
fn compiles_a_full_stack() {
    let stack = load();
    let compiled = StackCompiler::default().compile(&stack);
    assert!(compiled.is_ok(), "unexpected errors: {:?}", compiled.errors());

    let kind = |name: &str| {
        compiled.services[name]
            .as_ref()
            .expect("service should compile")
            .workload
            .kind()
    };
    assert_eq!(kind("vote"), WorkloadKind::Deployment);
    assert_eq!(kind("redis"), WorkloadKind::StatefulSet);
    assert_eq!(kind("worker"), WorkloadKind::Deployment);
    assert_eq!(kind("seed"), WorkloadKind::Job);

    let snapshot = compiled.snapshot.as_ref().expect("snapshot should compile");
    assert_eq!(decode_manifest(snapshot).unwrap(), STACK.as_bytes());
}

#[test]
fn rendered_objects_match_cluster_schemas() {
    let compiled = StackCompiler::default().compile(&load());
    let resources = compiled.resources().unwrap();

    let find = |kind: &str, name: &str| {
        resources
            .iter()
            .find(|r| r["kind"] == kind && r["metadata"]["name"] == name)
            .unwrap_or_else(|| panic!("{kind}/{name} should be rendered"))
    };

    let vote = find("Deployment", "vote");
    let container = &vote["spec"]["template"]["spec"]["containers"][0];
    assert_eq!(container["livenessProbe"]["httpGet"]["path"], "/health");
    assert_eq!(container["livenessProbe"]["initialDelaySeconds"], 30);
    assert_eq!(container["readinessProbe"]["timeoutSeconds"], 300);
    assert_eq!(container["resources"]["limits"]["cpu"], "500m");
    assert!(container["resources"].get("requests").is_none());
    assert_eq!(container["ports"][0]["containerPort"], 80);
    assert!(container["ports"][0].get("hostPort").is_none());

    let vote_svc = find("Service", "vote");
    let ports: Vec<_> = vote_svc["spec"]["ports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ports, vec!["p-80-80-tcp", "p-8080-80-tcp"]);

    let redis = find("StatefulSet", "redis");
    let vct = &redis["spec"]["volumeClaimTemplates"][0];
    assert_eq!(vct["spec"]["resources"]["requests"]["storage"], "5Gi");
    assert_eq!(vct["spec"]["accessModes"][0], "ReadWriteOnce");
    let affinity = &redis["spec"]["template"]["spec"]["affinity"]["podAffinity"]
        ["requiredDuringSchedulingIgnoredDuringExecution"][0];
    assert_eq!(
        affinity["labelSelector"]["matchExpressions"][0]["key"],
        "stack-volume-name-redis-data"
    );

    assert_eq!(vote["spec"]["replicas"], 2);
    // redis, worker and seed leave the replica count out
    assert_eq!(redis["spec"]["replicas"], 1);
    assert_eq!(find("Deployment", "worker")["spec"]["replicas"], 1);

    let seed = find("Job", "seed");
    assert_eq!(seed["spec"]["completions"], 1);
    assert_eq!(seed["spec"]["backoffLimit"], 2);
    assert_eq!(seed["spec"]["template"]["spec"]["restartPolicy"], "OnFailure");
    assert_eq!(
        seed["spec"]["template"]["spec"]["volumes"][0]["emptyDir"],
        serde_json::json!({})
    );

    let worker = find("Deployment", "worker");
    assert_eq!(
        worker["spec"]["template"]["spec"]["containers"][0]["securityContext"]["capabilities"]
            ["add"][0],
        "NET_ADMIN"
    );

    let worker_ingress = find("Ingress", "worker-9000");
    assert_eq!(
        worker_ingress["metadata"]["annotations"]["dev.okteto.com/generate-host"],
        "private"
    );
    assert_eq!(find("Ingress", "vote-80")["apiVersion"], "networking.k8s.io/v1");

    let main = find("Ingress", "main");
    let paths = &main["spec"]["rules"][0]["http"]["paths"];
    assert_eq!(paths[0]["backend"]["service"]["name"], "vote");
    assert_eq!(paths[1]["path"], "/worker");
    assert_eq!(main["metadata"]["labels"]["stack-endpoint-name"], "main");
}

#[test]
fn legacy_flavor_renders_v1beta1_everywhere() {
    let config = CompilerConfig::default().with_ingress_flavor(IngressFlavor::V1Beta1);
    let compiled = StackCompiler::new(config).compile(&load());

    let ingresses: Vec<_> = compiled
        .resources()
        .unwrap()
        .into_iter()
        .filter(|r| r["kind"] == "Ingress")
        .collect();

    assert_eq!(ingresses.len(), 3);
    for ingress in ingresses {
        assert_eq!(ingress["apiVersion"], "networking.k8s.io/v1beta1");
        let path = &ingress["spec"]["rules"][0]["http"]["paths"][0];
        assert!(path.get("pathType").is_none());
        assert!(path["backend"].get("serviceName").is_some());
    }
}
