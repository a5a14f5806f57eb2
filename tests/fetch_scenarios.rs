//! End-to-end fetches through the service registry against recorded provider responses.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

use awsgraph::app::cloud::properties::{GRANTS, INBOUND_RULES, KEY_PAIR, VPC};
use awsgraph::app::cloud::{
    Cidr, FirewallRule, Grant, Grantee, PortRange, PropertyValue, RelationKind, ResourceType,
};
use awsgraph::app::config::Config;
use awsgraph::app::error::{Error, FetchError};
use awsgraph::app::fetch::{FetchCache, FetchContext};
use awsgraph::app::graph::diff::{COMMON, EXTRA, META_DIFF, MISSING};
use awsgraph::app::graph::{diff, rdf, Graph, Matcher, ResourceKey};
use awsgraph::app::provider::{Clients, RecordedProvider};
use awsgraph::app::services::ServiceRegistry;

const REGION: &str = "eu-west-1";

fn registry_with(provider: Arc<RecordedProvider>, config: Config) -> ServiceRegistry {
    ServiceRegistry::new(Arc::new(config), Clients::from_provider(provider), REGION)
}

async fn fetch(provider: RecordedProvider, services: &[&str]) -> (Graph, Error) {
    let registry = registry_with(Arc::new(provider), Config::new());
    let names: Vec<String> = services.iter().map(|s| s.to_string()).collect();
    registry.fetch_all(&FetchContext::new(REGION), &names).await
}

fn edge_triples(graph: &Graph) -> String {
    let edges: Vec<_> = graph
        .triples()
        .into_iter()
        .filter(|t| t.predicate == RelationKind::ParentOf.predicate() || t.predicate == RelationKind::AppliesOn.predicate())
        .collect();
    rdf::to_ntriples(&edges)
}

fn parents_of(graph: &Graph, child: &ResourceKey) -> Vec<ResourceKey> {
    graph
        .edges()
        .into_iter()
        .filter(|(kind, _, to)| *kind == RelationKind::ParentOf && to == child)
        .map(|(_, from, _)| from)
        .collect()
}

fn network_fixture() -> RecordedProvider {
    RecordedProvider::new()
        .with_items(
            "ec2.DescribeInstances",
            vec![json!({"Instances": [{"InstanceId": "inst_1", "SubnetId": "sub_1", "VpcId": "vpc_1"}]})],
        )
        .with_items("ec2.DescribeSubnets", vec![json!({"SubnetId": "sub_1", "VpcId": "vpc_1"})])
        .with_items("ec2.DescribeVpcs", vec![json!({"VpcId": "vpc_1"})])
}

#[tokio::test]
async fn test_instance_subnet_vpc_parent_chain() {
    let (graph, errors) = fetch(network_fixture(), &["infra"]).await;
    assert!(!errors.any(), "{}", errors);

    assert!(graph.get_resource(ResourceType::Instance, "inst_1").is_ok());
    assert!(graph.get_resource(ResourceType::Subnet, "sub_1").is_ok());
    assert!(graph.get_resource(ResourceType::Vpc, "vpc_1").is_ok());
    assert!(graph.get_resource(ResourceType::Region, REGION).is_ok());

    insta::assert_snapshot!(edge_triples(&graph), @r"
    <eu-west-1> <parent-of> <vpc_1> .
    <sub_1> <parent-of> <inst_1> .
    <vpc_1> <parent-of> <sub_1> .
    ");
}

#[tokio::test]
async fn test_instance_without_subnet_keeps_key_pair_and_has_no_parent() {
    let provider = RecordedProvider::new().with_items(
        "ec2.DescribeInstances",
        vec![json!({"Instances": [{"InstanceId": "inst_5", "KeyName": "unexisting_key"}]})],
    );
    let (graph, errors) = fetch(provider, &["infra"]).await;
    assert!(!errors.any(), "{}", errors);

    let instance = graph.get_resource(ResourceType::Instance, "inst_5").unwrap();
    assert_eq!(instance.property_str(KEY_PAIR), Some("unexisting_key"));
    assert_eq!(parents_of(&graph, &instance.key()), Vec::<ResourceKey>::new());
}

#[tokio::test]
async fn test_firewall_rule_mixing_ipv4_and_ipv6() {
    let provider = RecordedProvider::new().with_items(
        "ec2.DescribeSecurityGroups",
        vec![json!({
            "GroupId": "sg_1",
            "VpcId": "vpc_1",
            "IpPermissions": [{
                "IpProtocol": "tcp",
                "FromPort": 22,
                "ToPort": 22,
                "IpRanges": [{"CidrIp": "1.2.3.4/32"}],
                "Ipv6Ranges": [{"CidrIpv6": "2001:db8::/110"}]
            }]
        })],
    );
    let (graph, errors) = fetch(provider, &["infra"]).await;
    assert!(!errors.any(), "{}", errors);

    let group = graph.get_resource(ResourceType::SecurityGroup, "sg_1").unwrap();
    let expected = vec![FirewallRule {
        protocol: "tcp".to_string(),
        port_range: PortRange {
            from_port: 22,
            to_port: 22,
            any: false,
        },
        ip_ranges: vec![
            "1.2.3.4/32".parse::<Cidr>().unwrap(),
            "2001:db8::/110".parse::<Cidr>().unwrap(),
        ],
        sources: vec![],
    }];
    assert_eq!(group.property(INBOUND_RULES), Some(&PropertyValue::from(expected)));
}

#[tokio::test]
async fn test_bucket_acl_grants() {
    let provider = RecordedProvider::new()
        .with_items("s3.ListBuckets", vec![json!({"Name": "bucket_1"})])
        .with_items("s3.GetBucketLocation:bucket_1", vec![json!(REGION)])
        .with_items(
            "s3.GetBucketAcl:bucket_1",
            vec![json!({
                "Permission": "Execute",
                "Grantee": {"ID": "usr_3", "DisplayName": "my_user_3", "EmailAddress": "user@domain", "Type": "my_type_3"}
            })],
        );
    let (graph, errors) = fetch(provider, &["storage"]).await;
    assert!(!errors.any(), "{}", errors);

    let bucket = graph.get_resource(ResourceType::Bucket, "bucket_1").unwrap();
    let expected = vec![Grant {
        permission: "Execute".to_string(),
        grantee: Grantee {
            grantee_id: "usr_3".to_string(),
            grantee_type: "my_type_3".to_string(),
            grantee_display_name: "my_user_3<user@domain>".to_string(),
        },
    }];
    assert_eq!(bucket.property(GRANTS), Some(&PropertyValue::from(expected)));
}

#[tokio::test]
async fn test_scaling_group_applies_on_each_subnet() {
    let provider = RecordedProvider::new()
        .with_items(
            "autoscaling.DescribeAutoScalingGroups",
            vec![json!({"AutoScalingGroupARN": "asg_1", "AutoScalingGroupName": "web", "VPCZoneIdentifier": "sub_1,sub_2"})],
        )
        .with_items(
            "ec2.DescribeSubnets",
            vec![json!({"SubnetId": "sub_1"}), json!({"SubnetId": "sub_2"})],
        );
    let (graph, errors) = fetch(provider, &["infra"]).await;
    assert!(!errors.any(), "{}", errors);

    let asg = graph.get_all_resources(&[ResourceType::ScalingGroup]);
    assert_eq!(asg.len(), 1);
    let applies: Vec<ResourceKey> = graph
        .edges()
        .into_iter()
        .filter(|(kind, from, _)| *kind == RelationKind::AppliesOn && *from == asg[0].key())
        .map(|(_, _, to)| to)
        .collect();
    assert_eq!(
        applies,
        vec![
            ResourceKey::new(ResourceType::Subnet, "sub_1"),
            ResourceKey::new(ResourceType::Subnet, "sub_2"),
        ]
    );
}

#[tokio::test]
async fn test_missing_managed_policy_adds_no_edge_and_no_error() {
    let provider = RecordedProvider::new().with_items(
        "iam.GetAccountAuthorizationDetails",
        vec![json!({
            "UserDetailList": [{
                "UserId": "usr_1",
                "UserName": "alice",
                "AttachedManagedPolicies": [{"PolicyName": "nmanaged_policy_X"}]
            }]
        })],
    );
    let (graph, errors) = fetch(provider, &["access"]).await;
    assert!(!errors.any(), "{}", errors);
    assert!(graph.get_resource(ResourceType::User, "usr_1").is_ok());
    assert!(graph
        .edges()
        .iter()
        .all(|(kind, _, _)| *kind != RelationKind::AppliesOn));
}

#[tokio::test]
async fn test_access_denied_still_returns_region() {
    let provider = RecordedProvider::new()
        .with_error("ec2.DescribeInstances", "AccessDenied: not authorized to perform ec2:DescribeInstances")
        .with_items("ec2.DescribeVpcs", vec![json!({"VpcId": "vpc_1"})]);
    let (graph, errors) = fetch(provider, &["infra"]).await;

    assert!(errors.contains(&FetchError::AccessDenied));
    assert!(errors.first_fatal().is_none());
    assert!(graph.get_resource(ResourceType::Region, REGION).is_ok());
    assert!(graph.get_resource(ResourceType::Vpc, "vpc_1").is_ok());
}

#[tokio::test]
async fn test_fetching_twice_gives_the_same_graph() {
    let provider = Arc::new(network_fixture());
    let registry = registry_with(provider.clone(), Config::new());
    let ctx = FetchContext::new(REGION);

    let (first, _) = registry.fetch_all(&ctx, &[]).await;
    let (second, _) = registry.fetch_all(&ctx, &[]).await;
    assert_eq!(rdf::to_ntriples(&first.triples()), rdf::to_ntriples(&second.triples()));
    assert_eq!(provider.calls("ec2.DescribeInstances"), 2);
}

#[tokio::test]
async fn test_filter_by_vpc_keeps_parents() {
    let provider = network_fixture()
        .with_items(
            "ec2.DescribeSubnets",
            vec![
                json!({"SubnetId": "sub_1", "VpcId": "vpc_1"}),
                json!({"SubnetId": "sub_2", "VpcId": "vpc_2"}),
            ],
        )
        .with_items("ec2.DescribeVpcs", vec![json!({"VpcId": "vpc_1"}), json!({"VpcId": "vpc_2"})]);
    let (graph, _) = fetch(provider, &["infra"]).await;

    let filtered = graph
        .filter(
            ResourceType::Subnet,
            &[Matcher::property(VPC, "vpc_1")],
        )
        .unwrap();
    let mut keys: Vec<ResourceKey> = filtered.resources().iter().map(|r| r.key()).collect();
    keys.sort();
    let mut expected = vec![
        ResourceKey::new(ResourceType::Region, REGION),
        ResourceKey::new(ResourceType::Vpc, "vpc_1"),
        ResourceKey::new(ResourceType::Subnet, "sub_1"),
    ];
    expected.sort();
    assert_eq!(keys, expected);
}

#[tokio::test]
async fn test_diff_between_two_fetches() {
    let before = RecordedProvider::new().with_items(
        "ec2.DescribeInstances",
        vec![json!({"Instances": [
            {"InstanceId": "X"},
            {"InstanceId": "Y", "InstanceType": "t2.micro"}
        ]})],
    );
    let after = RecordedProvider::new().with_items(
        "ec2.DescribeInstances",
        vec![json!({"Instances": [
            {"InstanceId": "Y", "InstanceType": "t2.large"},
            {"InstanceId": "Z"}
        ]})],
    );
    let (from, _) = fetch(before, &["infra"]).await;
    let (to, _) = fetch(after, &["infra"]).await;

    let delta = diff(&from, &to, (ResourceType::Region, REGION)).unwrap();
    assert!(delta.has_diff());

    let merged = delta.merged_graph();
    let marker = |id: &str| {
        merged
            .get_resource(ResourceType::Instance, id)
            .ok()
            .and_then(|r| r.meta_value(META_DIFF).map(|v| v.to_string()))
    };
    assert_eq!(marker("X").as_deref(), Some(MISSING));
    assert_eq!(marker("Z").as_deref(), Some(EXTRA));
    assert_eq!(marker("Y").as_deref(), Some(COMMON));
}

#[tokio::test]
async fn test_disabled_type_issues_no_call() {
    let provider = Arc::new(network_fixture());
    let mut config = Config::new();
    config.set("cloud.infra.instance.sync", "false").unwrap();
    let registry = registry_with(provider.clone(), config);

    let (graph, errors) = registry.fetch_all(&FetchContext::new(REGION), &["infra".to_string()]).await;
    assert!(!errors.any(), "{}", errors);
    assert_eq!(provider.calls("ec2.DescribeInstances"), 0);
    assert!(graph.get_all_resources(&[ResourceType::Instance]).is_empty());
    assert!(graph.get_resource(ResourceType::Subnet, "sub_1").is_ok());

    let forced = FetchContext::new(REGION).with_force(true);
    let (graph, _) = registry.fetch_all(&forced, &["infra".to_string()]).await;
    assert_eq!(provider.calls("ec2.DescribeInstances"), 1);
    assert!(graph.get_resource(ResourceType::Instance, "inst_1").is_ok());
}

#[tokio::test]
async fn test_single_type_fetch_honours_service_sync_and_adds_region() {
    let provider = Arc::new(network_fixture());
    let mut config = Config::new();
    config.set("cloud.infra.sync", "false").unwrap();
    let registry = registry_with(provider.clone(), config);

    let (graph, errors) = registry
        .fetch_by_type(&FetchContext::new(REGION), ResourceType::Instance)
        .await;
    assert!(!errors.any(), "{}", errors);
    assert!(graph.is_empty());
    assert_eq!(provider.calls("ec2.DescribeInstances"), 0);

    let registry = registry_with(provider.clone(), Config::new());
    let (graph, errors) = registry
        .fetch_by_type(&FetchContext::new(REGION), ResourceType::Instance)
        .await;
    assert!(!errors.any(), "{}", errors);
    assert_eq!(provider.calls("ec2.DescribeInstances"), 1);
    assert!(graph.get_resource(ResourceType::Instance, "inst_1").is_ok());
    assert!(graph.get_resource(ResourceType::Region, REGION).is_ok());
}

#[tokio::test]
async fn test_concurrent_cache_readers_share_one_producer() {
    let cache = FetchCache::new();
    let produced = AtomicUsize::new(0);
    let produced = &produced;
    let producer = move || async move {
        produced.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok::<_, FetchError>(vec!["sub_1".to_string()])
    };

    let (a, b) = tokio::join!(cache.get("subnets", producer), cache.get("subnets", producer));
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(produced.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_shared_container_lists_are_fetched_once() {
    let cluster = "arn:aws:ecs:eu-west-1:123:cluster/main";
    let provider = Arc::new(
        RecordedProvider::new()
            .with_items("ecs.ListClusters", vec![json!(cluster)])
            .with_items(
                "ecs.DescribeClusters",
                vec![json!({"ClusterArn": cluster, "ClusterName": "main"})],
            )
            .with_items(&format!("ecs.ListTasks:{}:RUNNING", cluster), vec![json!("arn:task/1")])
            .with_items(
                "ecs.DescribeTasks",
                vec![json!({"TaskArn": "arn:task/1", "ClusterArn": cluster, "LastStatus": "RUNNING"})],
            ),
    );
    let registry = registry_with(provider.clone(), Config::new());
    let (_, errors) = registry.fetch_all(&FetchContext::new(REGION), &["infra".to_string()]).await;
    assert!(!errors.any(), "{}", errors);
    assert_eq!(provider.calls("ecs.ListClusters"), 1);
    assert_eq!(provider.calls("ecs.DescribeTasks"), 1);
}

fn subnet_fixture(subnets: &[(u8, u8)]) -> RecordedProvider {
    let items = subnets
        .iter()
        .map(|(subnet, vpc)| json!({"SubnetId": format!("sub_{}", subnet), "VpcId": format!("vpc_{}", vpc)}))
        .collect();
    RecordedProvider::new().with_items("ec2.DescribeSubnets", items)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_relation_inference_is_idempotent(subnets in prop::collection::vec((0u8..20, 0u8..4), 0..12)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let registry = registry_with(Arc::new(subnet_fixture(&subnets)), Config::new());
        let ctx = FetchContext::new(REGION);
        let names = vec!["infra".to_string()];

        let (first, _) = runtime.block_on(registry.fetch_all(&ctx, &names));
        let (second, _) = runtime.block_on(registry.fetch_all(&ctx, &names));
        prop_assert_eq!(first.edges(), second.edges());
        prop_assert_eq!(rdf::to_ntriples(&first.triples()), rdf::to_ntriples(&second.triples()));
    }
}
