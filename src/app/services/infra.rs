//! Compute, network, load balancing, database, autoscaling, container and certificate
//! resources of one region.

use std::sync::Arc;

use futures::future::join_all;

use crate::app::cloud::properties::*;
use crate::app::cloud::{KeyValue, RelationKind, ResourceType};
use crate::app::config::Config;
use crate::app::convert::new_resource;
use crate::app::dto::{ecs, Dto};
use crate::app::error::FetchError;
use crate::app::fetch::{collect_pages, fan_out, fetch_func, FetchCache, FetchContext, FetchFunc, FetchOutput};
use crate::app::graph::ResourceKey;
use crate::app::provider::Clients;

use super::{list_func, list_func_with, set_extra, CloudService};

pub const NAME: &str = "infra";

const CLUSTER_NAMES_KEY: &str = "getClustersNames";
const ALL_TASKS_KEY: &str = "getAllTasks";

/// Largest id list accepted by the container describe calls.
const DESCRIBE_BATCH: usize = 100;

pub fn service(config: Arc<Config>, clients: Clients, region: &str) -> CloudService {
    use ResourceType::*;

    let c = &clients;
    let funcs = vec![
        (
            Instance,
            list_func_with(
                Instance,
                c,
                |c, t| async move { c.ec2.describe_instances(t).await },
                |reservation| {
                    reservation
                        .instances
                        .unwrap_or_default()
                        .into_iter()
                        .map(Dto::from)
                        .collect()
                },
            ),
        ),
        (Subnet, list_func(Subnet, c, |c, t| async move { c.ec2.describe_subnets(t).await })),
        (Vpc, list_func(Vpc, c, |c, t| async move { c.ec2.describe_vpcs(t).await })),
        (KeyPair, list_func(KeyPair, c, |c, t| async move { c.ec2.describe_key_pairs(t).await })),
        (
            SecurityGroup,
            list_func(SecurityGroup, c, |c, t| async move { c.ec2.describe_security_groups(t).await }),
        ),
        (Volume, list_func(Volume, c, |c, t| async move { c.ec2.describe_volumes(t).await })),
        (
            InternetGateway,
            list_func(InternetGateway, c, |c, t| async move { c.ec2.describe_internet_gateways(t).await }),
        ),
        (
            NatGateway,
            list_func(NatGateway, c, |c, t| async move { c.ec2.describe_nat_gateways(t).await }),
        ),
        (
            RouteTable,
            list_func(RouteTable, c, |c, t| async move { c.ec2.describe_route_tables(t).await }),
        ),
        (
            AvailabilityZone,
            list_func(AvailabilityZone, c, |c, t| async move { c.ec2.describe_availability_zones(t).await }),
        ),
        (Image, list_func(Image, c, |c, t| async move { c.ec2.describe_images(t).await })),
        (ElasticIp, list_func(ElasticIp, c, |c, t| async move { c.ec2.describe_addresses(t).await })),
        (
            ResourceType::Snapshot,
            list_func(ResourceType::Snapshot, c, |c, t| async move { c.ec2.describe_snapshots(t).await }),
        ),
        (
            NetworkInterface,
            list_func(NetworkInterface, c, |c, t| async move { c.ec2.describe_network_interfaces(t).await }),
        ),
        (
            ClassicLoadBalancer,
            list_func(ClassicLoadBalancer, c, |c, t| async move {
                c.elb.describe_classic_load_balancers(t).await
            }),
        ),
        (
            LoadBalancer,
            list_func(LoadBalancer, c, |c, t| async move { c.elbv2.describe_load_balancers(t).await }),
        ),
        (
            TargetGroup,
            list_func(TargetGroup, c, |c, t| async move { c.elbv2.describe_target_groups(t).await }),
        ),
        (Listener, listeners(c)),
        (Database, list_func(Database, c, |c, t| async move { c.rds.describe_db_instances(t).await })),
        (
            DbSubnetGroup,
            list_func(DbSubnetGroup, c, |c, t| async move { c.rds.describe_db_subnet_groups(t).await }),
        ),
        (
            LaunchConfiguration,
            list_func(LaunchConfiguration, c, |c, t| async move {
                c.autoscaling.describe_launch_configurations(t).await
            }),
        ),
        (
            ScalingGroup,
            list_func(ScalingGroup, c, |c, t| async move { c.autoscaling.describe_auto_scaling_groups(t).await }),
        ),
        (
            ScalingPolicy,
            list_func(ScalingPolicy, c, |c, t| async move { c.autoscaling.describe_policies(t).await }),
        ),
        (
            Repository,
            list_func(Repository, c, |c, t| async move { c.ecr.describe_repositories(t).await }),
        ),
        (ContainerCluster, clusters(c)),
        (ContainerTask, task_definitions(c)),
        (Container, containers(c)),
        (ContainerInstance, container_instances(c)),
        (Certificate, list_func(Certificate, c, |c, t| async move { c.acm.list_certificates(t).await })),
    ];

    CloudService::new(NAME, region, config, clients, funcs)
}

/// Listeners of every load balancer.
fn listeners(clients: &Clients) -> FetchFunc {
    let clients = clients.clone();
    fetch_func(move |ctx, _cache| {
        let clients = clients.clone();
        async move {
            let balancers = match collect_pages(&ctx, |t| clients.elbv2.describe_load_balancers(t)).await {
                Ok(balancers) => balancers,
                Err(e) => return FetchOutput::failed(e),
            };
            let arns: Vec<String> = balancers.into_iter().filter_map(|lb| lb.load_balancer_arn).collect();

            let per_balancer = join_all(
                arns.iter()
                    .map(|arn| collect_pages(&ctx, |t| clients.elbv2.describe_listeners(arn, t))),
            )
            .await;

            let mut output = FetchOutput::default();
            for listed in per_balancer {
                match listed {
                    Ok(listeners) => {
                        for listener in listeners {
                            output.push(listener.into()).await;
                        }
                    }
                    Err(e) => output.error.add(e),
                }
            }
            output
        }
    })
}

// ============================================================================
// Containers
// ============================================================================

/// Arns of the clusters to look into: the `cluster` filter, or every cluster.
async fn cluster_arns(ctx: &FetchContext, cache: &FetchCache, clients: &Clients) -> Result<Vec<String>, FetchError> {
    if let Some(name) = ctx.filter("cluster") {
        let clusters = clients.ecs.describe_clusters(&[name.to_string()]).await?;
        return Ok(clusters.into_iter().filter_map(|c| c.cluster_arn).collect());
    }
    let arns = cache
        .get(CLUSTER_NAMES_KEY, || collect_pages(ctx, |t| clients.ecs.list_clusters(t)))
        .await?;
    Ok(arns.to_vec())
}

/// Running and stopped tasks of every cluster.
async fn all_tasks(ctx: &FetchContext, cache: &FetchCache, clients: &Clients) -> Result<Arc<Vec<ecs::Task>>, FetchError> {
    cache
        .get(ALL_TASKS_KEY, || async {
            let clusters = cluster_arns(ctx, cache, clients).await?;
            let per_cluster = fan_out(ctx, clusters, |ctx, cluster| async move {
                let mut tasks = Vec::new();
                for status in ["RUNNING", "STOPPED"] {
                    let arns = collect_pages(&ctx, |t| clients.ecs.list_tasks(&cluster, status, t)).await?;
                    for batch in arns.chunks(DESCRIBE_BATCH) {
                        tasks.extend(clients.ecs.describe_tasks(&cluster, batch).await?);
                    }
                }
                Ok(tasks)
            })
            .await?;
            Ok(per_cluster.into_iter().flatten().collect::<Vec<_>>())
        })
        .await
}

fn clusters(clients: &Clients) -> FetchFunc {
    let clients = clients.clone();
    fetch_func(move |ctx, cache| {
        let clients = clients.clone();
        async move {
            let arns = match cluster_arns(&ctx, &cache, &clients).await {
                Ok(arns) => arns,
                Err(e) => return FetchOutput::failed(e),
            };

            let mut output = FetchOutput::default();
            for batch in arns.chunks(DESCRIBE_BATCH) {
                match clients.ecs.describe_clusters(batch).await {
                    Ok(clusters) => {
                        for cluster in clusters {
                            output.push(cluster.into()).await;
                        }
                    }
                    Err(e) => {
                        output.error.add(e);
                        break;
                    }
                }
            }
            output
        }
    })
}

fn container_instances(clients: &Clients) -> FetchFunc {
    let clients = clients.clone();
    fetch_func(move |ctx, cache| {
        let clients = clients.clone();
        async move {
            let arns = match cluster_arns(&ctx, &cache, &clients).await {
                Ok(arns) => arns,
                Err(e) => return FetchOutput::failed(e),
            };

            let clients = &clients;
            let per_cluster = fan_out(&ctx, arns, |ctx, cluster| async move {
                let listed =
                    collect_pages(&ctx, |t| clients.ecs.list_container_instances(&cluster, t)).await?;
                let mut described = Vec::new();
                for batch in listed.chunks(DESCRIBE_BATCH) {
                    described.extend(clients.ecs.describe_container_instances(&cluster, batch).await?);
                }
                Ok((cluster, described))
            })
            .await;

            let per_cluster = match per_cluster {
                Ok(per_cluster) => per_cluster,
                Err(e) => return FetchOutput::failed(e),
            };

            let mut output = FetchOutput::default();
            for (cluster, instances) in per_cluster {
                for instance in instances {
                    let dto = Dto::from(instance);
                    let (mut res, mut errors) = new_resource(&dto).await;
                    set_extra(&mut res, &mut errors, CLUSTER, cluster.as_str());
                    res.add_relation(
                        RelationKind::ChildOf,
                        ResourceKey::new(ResourceType::ContainerCluster, cluster.as_str()),
                    );
                    output.push_converted(res, dto, errors);
                }
            }
            output
        }
    })
}

/// Name part of an arn, after its last `/`.
fn arn_to_name(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

fn plural(word: &str, count: usize) -> String {
    if count > 1 {
        format!("{}s", word)
    } else {
        word.to_string()
    }
}

/// Where a task definition is deployed, from the tasks started from it.
#[derive(Debug, Default, PartialEq)]
struct Deployments {
    entries: Vec<KeyValue>,
    running_services: usize,
    stopped_services: usize,
    running_tasks: usize,
    stopped_tasks: usize,
}

impl Deployments {
    fn of(definition_arn: &str, tasks: &[ecs::Task]) -> Self {
        let mut deployments = Deployments::default();
        for task in tasks
            .iter()
            .filter(|t| t.task_definition_arn.as_deref() == Some(definition_arn))
        {
            let group = task.group.as_deref().unwrap_or_default();
            let state = task.last_status.as_deref().unwrap_or_default().to_lowercase();
            let cluster = arn_to_name(task.cluster_arn.as_deref().unwrap_or_default());

            if let Some(service) = group.strip_prefix("service:") {
                match state.as_str() {
                    "running" => deployments.running_services += 1,
                    "stopped" => deployments.stopped_services += 1,
                    _ => continue,
                }
                deployments
                    .entries
                    .push(KeyValue::new(cluster, format!("{} ({} service)", service, state)));
            } else if let Some(family) = group.strip_prefix("family:") {
                match state.as_str() {
                    "running" => deployments.running_tasks += 1,
                    "stopped" => deployments.stopped_tasks += 1,
                    _ => continue,
                }
                deployments
                    .entries
                    .push(KeyValue::new(cluster, format!("{} ({} task)", family, state)));
            }
        }
        deployments
    }

    fn state(&self, status: Option<&str>) -> String {
        let counts = [
            (self.running_services, "service", "running"),
            (self.stopped_services, "service", "stopped"),
            (self.running_tasks, "task", "running"),
            (self.stopped_tasks, "task", "stopped"),
        ];
        let parts: Vec<String> = counts
            .iter()
            .filter(|(count, _, _)| *count > 0)
            .map(|(count, word, state)| format!("{} {} {}", count, plural(word, *count), state))
            .collect();

        if !parts.is_empty() {
            return parts.join(" ");
        }
        match status.unwrap_or_default().to_lowercase() {
            status if status == "active" => "ready".to_string(),
            status => status,
        }
    }
}

fn task_definitions(clients: &Clients) -> FetchFunc {
    let clients = clients.clone();
    fetch_func(move |ctx, cache| {
        let clients = clients.clone();
        async move {
            let family_prefix = ctx.filter("name").map(str::to_string);
            let arns = match collect_pages(&ctx, |t| {
                clients.ecs.list_task_definitions(family_prefix.as_deref(), t)
            })
            .await
            {
                Ok(arns) => arns,
                Err(e) => return FetchOutput::failed(e),
            };

            let described = join_all(arns.iter().map(|arn| clients.ecs.describe_task_definition(arn))).await;

            let mut output = FetchOutput::default();
            let tasks = match all_tasks(&ctx, &cache, &clients).await {
                Ok(tasks) => tasks,
                Err(e) => {
                    output.error.add(e);
                    Arc::new(Vec::new())
                }
            };

            for result in described {
                let definition = match result {
                    Ok(definition) => definition,
                    Err(e) => {
                        let e = FetchError::from(e);
                        if !output.error.contains(&e) {
                            output.error.add(e);
                        }
                        continue;
                    }
                };

                let deployments = Deployments::of(
                    definition.task_definition_arn.as_deref().unwrap_or_default(),
                    &tasks,
                );
                let state = deployments.state(definition.status.as_deref());
                let dto = Dto::from(definition);
                let (mut res, mut errors) = new_resource(&dto).await;
                if !deployments.entries.is_empty() {
                    set_extra(&mut res, &mut errors, DEPLOYMENTS, deployments.entries);
                }
                set_extra(&mut res, &mut errors, STATE, state);
                output.push_converted(res, dto, errors);
            }
            output
        }
    })
}

fn containers(clients: &Clients) -> FetchFunc {
    let clients = clients.clone();
    fetch_func(move |ctx, cache| {
        let clients = clients.clone();
        async move {
            let tasks = match all_tasks(&ctx, &cache, &clients).await {
                Ok(tasks) => tasks,
                Err(e) => return FetchOutput::failed(e),
            };

            let mut output = FetchOutput::default();
            for task in tasks.iter() {
                let text = |field: &Option<String>| field.clone().unwrap_or_default();
                let cluster = text(&task.cluster_arn);
                let instance = text(&task.container_instance_arn);
                let definition = text(&task.task_definition_arn);

                for container in task.containers.iter().flatten() {
                    let dto = Dto::from(container.clone());
                    let (mut res, mut errors) = new_resource(&dto).await;

                    let group = text(&task.group);
                    for (name, value) in [
                        (CLUSTER, &cluster),
                        (CONTAINER_INSTANCE, &instance),
                        (CONTAINER_TASK, &definition),
                        (DEPLOYMENT_NAME, &group),
                    ] {
                        if !value.is_empty() {
                            set_extra(&mut res, &mut errors, name, value.as_str());
                        }
                    }
                    for (name, time) in [
                        (CREATED, task.created_at),
                        (LAUNCHED, task.started_at),
                        (STOPPED, task.stopped_at),
                    ] {
                        if let Some(time) = time {
                            set_extra(&mut res, &mut errors, name, time);
                        }
                    }

                    if !cluster.is_empty() {
                        res.add_relation(
                            RelationKind::ChildOf,
                            ResourceKey::new(ResourceType::ContainerCluster, cluster.as_str()),
                        );
                    }
                    if !definition.is_empty() {
                        res.add_relation(
                            RelationKind::DependingOn,
                            ResourceKey::new(ResourceType::ContainerTask, definition.as_str()),
                        );
                    }
                    if !instance.is_empty() {
                        res.add_relation(
                            RelationKind::DependingOn,
                            ResourceKey::new(ResourceType::ContainerInstance, instance.as_str()),
                        );
                    }
                    output.push_converted(res, dto, errors);
                }
            }
            output
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cloud::PropertyValue;
    use crate::app::fetch::Fetcher;
    use crate::app::provider::RecordedProvider;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn task(definition: &str, group: &str, status: &str) -> ecs::Task {
        ecs::Task {
            task_arn: Some(format!("arn:task/{}", group)),
            cluster_arn: Some("arn:aws:ecs:eu-west-1:123:cluster/main".to_string()),
            task_definition_arn: Some(definition.to_string()),
            group: Some(group.to_string()),
            last_status: Some(status.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_deployments_summary() {
        let tasks = vec![
            task("def_1", "service:web", "RUNNING"),
            task("def_1", "service:api", "RUNNING"),
            task("def_1", "family:batch", "STOPPED"),
            task("def_1", "family:batch", "PENDING"),
            task("def_2", "service:other", "RUNNING"),
        ];
        let deployments = Deployments::of("def_1", &tasks);
        assert_eq!(
            deployments.entries,
            vec![
                KeyValue::new("main", "web (running service)"),
                KeyValue::new("main", "api (running service)"),
                KeyValue::new("main", "batch (stopped task)"),
            ]
        );
        assert_eq!(deployments.state(Some("ACTIVE")), "2 services running 1 task stopped");
    }

    #[test_case(Some("ACTIVE"), "ready" ; "active is ready")]
    #[test_case(Some("INACTIVE"), "inactive" ; "other status lowercased")]
    #[test_case(None, "" ; "no status")]
    fn test_undeployed_state(status: Option<&str>, expected: &str) {
        assert_eq!(Deployments::default().state(status), expected);
    }

    fn fetcher(provider: RecordedProvider) -> (Fetcher, Arc<RecordedProvider>) {
        let provider = Arc::new(provider);
        let clients = Clients::from_provider(provider.clone());
        let fetcher = Fetcher::new()
            .register(ResourceType::ContainerCluster, clusters(&clients))
            .register(ResourceType::ContainerTask, task_definitions(&clients))
            .register(ResourceType::Container, containers(&clients))
            .register(ResourceType::ContainerInstance, container_instances(&clients));
        (fetcher, provider)
    }

    fn ecs_fixture() -> RecordedProvider {
        let cluster = "arn:aws:ecs:eu-west-1:123:cluster/main";
        RecordedProvider::new()
            .with_items("ecs.ListClusters", vec![json!(cluster)])
            .with_items(
                "ecs.DescribeClusters",
                vec![json!({"ClusterArn": cluster, "ClusterName": "main", "Status": "ACTIVE"})],
            )
            .with_items(&format!("ecs.ListTasks:{}:RUNNING", cluster), vec![json!("arn:task/1")])
            .with_items(
                "ecs.DescribeTasks",
                vec![json!({
                    "TaskArn": "arn:task/1",
                    "ClusterArn": cluster,
                    "ContainerInstanceArn": "arn:ci/1",
                    "TaskDefinitionArn": "arn:aws:ecs:eu-west-1:123:task-definition/web:3",
                    "Group": "service:web",
                    "LastStatus": "RUNNING",
                    "StartedAt": "2017-01-10T16:47:18Z",
                    "Containers": [{"ContainerArn": "arn:container/1", "Name": "nginx", "LastStatus": "RUNNING"}]
                })],
            )
            .with_items(
                "ecs.ListTaskDefinitions",
                vec![
                    json!("arn:aws:ecs:eu-west-1:123:task-definition/web:3"),
                    json!("arn:aws:ecs:eu-west-1:123:task-definition/worker:1"),
                ],
            )
            .with_items(
                "ecs.DescribeTaskDefinition",
                vec![
                    json!({"TaskDefinitionArn": "arn:aws:ecs:eu-west-1:123:task-definition/web:3", "Family": "web", "Status": "ACTIVE"}),
                    json!({"TaskDefinitionArn": "arn:aws:ecs:eu-west-1:123:task-definition/worker:1", "Family": "worker", "Status": "ACTIVE"}),
                ],
            )
            .with_items(&format!("ecs.ListContainerInstances:{}", cluster), vec![json!("arn:ci/1")])
            .with_items(
                "ecs.DescribeContainerInstances",
                vec![json!({"ContainerInstanceArn": "arn:ci/1", "Ec2InstanceId": "inst_1"})],
            )
    }

    #[tokio::test]
    async fn test_container_fetch_funcs_share_cluster_and_task_lists() {
        let (fetcher, provider) = fetcher(ecs_fixture());
        let (graph, errors) = fetcher.fetch(&FetchContext::new("eu-west-1")).await;
        assert!(!errors.any(), "{}", errors);

        assert_eq!(provider.calls("ecs.ListClusters"), 1);
        assert_eq!(provider.calls("ecs.DescribeTasks"), 1);

        let web = graph
            .get_resource(ResourceType::ContainerTask, "arn:aws:ecs:eu-west-1:123:task-definition/web:3")
            .unwrap();
        assert_eq!(web.property_str(STATE), Some("1 service running"));
        assert_eq!(
            web.property(DEPLOYMENTS),
            Some(&PropertyValue::from(vec![KeyValue::new("main", "web (running service)")]))
        );
        let worker = graph
            .get_resource(ResourceType::ContainerTask, "arn:aws:ecs:eu-west-1:123:task-definition/worker:1")
            .unwrap();
        assert_eq!(worker.property_str(STATE), Some("ready"));

        let container = graph.get_resource(ResourceType::Container, "arn:container/1").unwrap();
        assert_eq!(container.property_str(CLUSTER), Some("arn:aws:ecs:eu-west-1:123:cluster/main"));
        assert_eq!(container.property_str(DEPLOYMENT_NAME), Some("service:web"));
        assert!(container.property(LAUNCHED).is_some());

        let cluster_key = ResourceKey::new(ResourceType::ContainerCluster, "arn:aws:ecs:eu-west-1:123:cluster/main");
        let edges = graph.edges();
        assert!(edges.contains(&(
            RelationKind::ParentOf,
            cluster_key.clone(),
            ResourceKey::new(ResourceType::Container, "arn:container/1")
        )));
        assert!(edges.contains(&(
            RelationKind::ParentOf,
            cluster_key,
            ResourceKey::new(ResourceType::ContainerInstance, "arn:ci/1")
        )));
        assert!(edges.contains(&(
            RelationKind::AppliesOn,
            ResourceKey::new(ResourceType::ContainerTask, "arn:aws:ecs:eu-west-1:123:task-definition/web:3"),
            ResourceKey::new(ResourceType::Container, "arn:container/1")
        )));
    }

    #[tokio::test]
    async fn test_name_filter_is_family_prefix() {
        let (fetcher, _) = fetcher(ecs_fixture());
        let ctx = FetchContext::new("eu-west-1").with_filter("name", "work");
        let (graph, _) = fetcher.fetch_by_type(&ctx, ResourceType::ContainerTask).await;
        let tasks = graph.get_all_resources(&[ResourceType::ContainerTask]);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].property_str(NAME), Some("worker"));
    }

    #[tokio::test]
    async fn test_cluster_filter_skips_listing() {
        let (fetcher, provider) = fetcher(ecs_fixture());
        let ctx = FetchContext::new("eu-west-1").with_filter("cluster", "main");
        let (graph, errors) = fetcher.fetch_by_type(&ctx, ResourceType::ContainerCluster).await;
        assert!(!errors.any(), "{}", errors);
        assert_eq!(graph.len(), 1);
        assert_eq!(provider.calls("ecs.ListClusters"), 0);
    }

    #[tokio::test]
    async fn test_listeners_per_load_balancer() {
        let provider = Arc::new(
            RecordedProvider::new()
                .with_items(
                    "elbv2.DescribeLoadBalancers",
                    vec![json!({"LoadBalancerArn": "lb_1"}), json!({"LoadBalancerArn": "lb_2"})],
                )
                .with_items("elbv2.DescribeListeners:lb_1", vec![json!({"ListenerArn": "lst_1", "LoadBalancerArn": "lb_1"})])
                .with_items("elbv2.DescribeListeners:lb_2", vec![json!({"ListenerArn": "lst_2", "LoadBalancerArn": "lb_2"})]),
        );
        let clients = Clients::from_provider(provider.clone());
        let fetcher = Fetcher::new().register(ResourceType::Listener, listeners(&clients));

        let (graph, errors) = fetcher.fetch(&FetchContext::new("eu-west-1")).await;
        assert!(!errors.any(), "{}", errors);
        assert_eq!(graph.get_all_resources(&[ResourceType::Listener]).len(), 2);
        assert_eq!(provider.calls("elbv2.DescribeListeners"), 2);
    }
}
