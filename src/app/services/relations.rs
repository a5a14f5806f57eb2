//! Relation inference.
//!
//! Every resource type has a list of [`Rule`]s. A rule reads the raw provider object the
//! resource was built from and adds edges between that resource and the resources its
//! fields name. Lookups that need other resources, such as resolving a policy by name,
//! read the snapshot taken after the fetch so that rules running concurrently all see
//! the same graph.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::app::cloud::properties::NAME;
use crate::app::cloud::{hash_id, RelationKind, ResourceType};
use crate::app::convert::extract::{lookup, str_at};
use crate::app::error::FetchError;
use crate::app::graph::{Graph, ResourceKey, Snapshot};
use crate::app::provider::Clients;

use RelationKind::{AppliesOn, DependingOn, ParentOf};

/// What a rule works against.
pub struct RelationCtx<'a> {
    pub graph: &'a Graph,
    pub snapshot: &'a Snapshot,
    pub region: &'a str,
    pub clients: &'a Clients,
}

/// One way of deriving edges from an object.
///
/// The `kind` of the field rules reads as "target `kind` resource": `ParentOf` makes the
/// target the parent, `AppliesOn` makes the target apply on the resource and
/// `DependingOn` makes the resource apply on the target.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// A string at a dotted path.
    Field {
        target: ResourceType,
        path: &'static str,
        kind: RelationKind,
    },
    /// Every string of a list.
    StringList {
        target: ResourceType,
        path: &'static str,
        kind: RelationKind,
    },
    /// A string field of every object of a list.
    ObjectList {
        target: ResourceType,
        path: &'static str,
        inner: &'static str,
        kind: RelationKind,
    },
    /// The region of the service is the parent.
    RegionParent,
    /// `AttachedManagedPolicies[].PolicyName` resolved by policy name.
    ManagedPolicies,
    /// `GroupList` names resolved by group name.
    UserGroups,
    /// The comma separated subnets of `VPCZoneIdentifier`.
    ScalingGroupSubnets,
    /// Instances registered in a target group, asked to the provider.
    TargetHealth,
    /// The metric an alarm watches, by its hashed id.
    AlarmMetric,
}

const fn field(target: ResourceType, path: &'static str, kind: RelationKind) -> Rule {
    Rule::Field { target, path, kind }
}

const fn strings(target: ResourceType, path: &'static str, kind: RelationKind) -> Rule {
    Rule::StringList { target, path, kind }
}

const fn objects(target: ResourceType, path: &'static str, inner: &'static str, kind: RelationKind) -> Rule {
    Rule::ObjectList {
        target,
        path,
        inner,
        kind,
    }
}

static RULES: Lazy<HashMap<ResourceType, Vec<Rule>>> = Lazy::new(|| {
    use ResourceType::*;

    let mut rules = HashMap::new();
    rules.insert(Subnet, vec![field(Vpc, "VpcId", ParentOf)]);
    rules.insert(
        Instance,
        vec![
            field(Subnet, "SubnetId", ParentOf),
            objects(SecurityGroup, "SecurityGroups", "GroupId", AppliesOn),
            field(KeyPair, "KeyName", AppliesOn),
        ],
    );
    rules.insert(SecurityGroup, vec![field(Vpc, "VpcId", ParentOf)]);
    rules.insert(
        InternetGateway,
        vec![Rule::RegionParent, objects(Vpc, "Attachments", "VpcId", DependingOn)],
    );
    rules.insert(
        NatGateway,
        vec![
            Rule::RegionParent,
            field(Vpc, "VpcId", ParentOf),
            field(Subnet, "SubnetId", DependingOn),
        ],
    );
    rules.insert(
        RouteTable,
        vec![
            objects(Subnet, "Associations", "SubnetId", DependingOn),
            field(Vpc, "VpcId", ParentOf),
        ],
    );
    rules.insert(
        Volume,
        vec![
            field(AvailabilityZone, "AvailabilityZone", ParentOf),
            objects(Instance, "Attachments", "InstanceId", DependingOn),
        ],
    );
    rules.insert(ElasticIp, vec![Rule::RegionParent, field(Instance, "InstanceId", DependingOn)]);
    rules.insert(ResourceType::Snapshot, vec![Rule::RegionParent, field(Volume, "VolumeId", DependingOn)]);
    rules.insert(
        NetworkInterface,
        vec![
            field(Subnet, "SubnetId", ParentOf),
            objects(SecurityGroup, "Groups", "GroupId", AppliesOn),
            field(Instance, "Attachment.InstanceId", DependingOn),
        ],
    );
    rules.insert(
        LoadBalancer,
        vec![
            field(Vpc, "VpcId", ParentOf),
            objects(Subnet, "AvailabilityZones", "SubnetId", DependingOn),
            objects(AvailabilityZone, "AvailabilityZones", "ZoneName", DependingOn),
            strings(SecurityGroup, "SecurityGroups", AppliesOn),
        ],
    );
    rules.insert(
        ClassicLoadBalancer,
        vec![
            field(Vpc, "VPCId", ParentOf),
            strings(Subnet, "Subnets", DependingOn),
            strings(AvailabilityZone, "AvailabilityZones", DependingOn),
            strings(SecurityGroup, "SecurityGroups", AppliesOn),
        ],
    );
    rules.insert(Listener, vec![field(LoadBalancer, "LoadBalancerArn", ParentOf)]);
    rules.insert(
        TargetGroup,
        vec![
            field(Vpc, "VpcId", ParentOf),
            strings(LoadBalancer, "LoadBalancerArns", AppliesOn),
            Rule::TargetHealth,
        ],
    );
    rules.insert(
        Database,
        vec![
            field(AvailabilityZone, "AvailabilityZone", ParentOf),
            objects(SecurityGroup, "VpcSecurityGroups", "VpcSecurityGroupId", AppliesOn),
        ],
    );
    rules.insert(DbSubnetGroup, vec![Rule::RegionParent]);
    rules.insert(LaunchConfiguration, vec![Rule::RegionParent, field(KeyPair, "KeyName", AppliesOn)]);
    rules.insert(
        ScalingGroup,
        vec![
            Rule::RegionParent,
            strings(AvailabilityZone, "AvailabilityZones", AppliesOn),
            objects(Instance, "Instances", "InstanceId", DependingOn),
            strings(TargetGroup, "TargetGroupARNs", DependingOn),
            Rule::ScalingGroupSubnets,
        ],
    );
    rules.insert(ScalingPolicy, vec![Rule::RegionParent]);
    rules.insert(ContainerInstance, vec![field(Instance, "Ec2InstanceId", AppliesOn)]);
    rules.insert(Subscription, vec![field(Topic, "TopicArn", ParentOf)]);
    rules.insert(User, vec![Rule::RegionParent, Rule::UserGroups, Rule::ManagedPolicies]);
    rules.insert(Role, vec![Rule::RegionParent, Rule::ManagedPolicies]);
    rules.insert(Group, vec![Rule::RegionParent, Rule::ManagedPolicies]);
    rules.insert(MfaDevice, vec![Rule::RegionParent, field(User, "User.UserId", DependingOn)]);
    rules.insert(Alarm, vec![Rule::RegionParent, Rule::AlarmMetric]);

    for kind in [
        Vpc,
        AvailabilityZone,
        KeyPair,
        Image,
        Repository,
        ContainerCluster,
        ContainerTask,
        Certificate,
        Policy,
        InstanceProfile,
        Bucket,
        Function,
        Topic,
        Queue,
        Zone,
        Metric,
        Distribution,
        Stack,
    ] {
        rules.insert(kind, vec![Rule::RegionParent]);
    }
    rules
});

/// Rules registered for `kind`.
pub fn rules_for(kind: ResourceType) -> &'static [Rule] {
    RULES.get(&kind).map(Vec::as_slice).unwrap_or(&[])
}

fn non_empty(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

impl Rule {
    /// Adds the edges this rule derives for `res`, built from `object`.
    pub async fn apply(&self, ctx: &RelationCtx<'_>, res: &ResourceKey, object: &Value) -> Result<(), FetchError> {
        match self {
            Rule::Field { target, path, kind } => {
                let Some(found) = lookup(object, path) else {
                    return Ok(());
                };
                let id = found.as_str().ok_or_else(|| {
                    FetchError::Invalid(format!("{}: field '{}' is not a string", res, path))
                })?;
                if !id.is_empty() {
                    ctx.graph.add_relation(*kind, ResourceKey::new(*target, id), res);
                }
            }
            Rule::StringList { target, path, kind } => {
                for id in list(object, path).filter_map(non_empty) {
                    ctx.graph.add_relation(*kind, ResourceKey::new(*target, id), res);
                }
            }
            Rule::ObjectList {
                target,
                path,
                inner,
                kind,
            } => {
                for item in list(object, path) {
                    let id = str_at(item, inner);
                    if !id.is_empty() {
                        ctx.graph.add_relation(*kind, ResourceKey::new(*target, id), res);
                    }
                }
            }
            Rule::RegionParent => {
                ctx.graph
                    .add_parent_relation(ResourceKey::new(ResourceType::Region, ctx.region), res);
            }
            Rule::ManagedPolicies => add_managed_policies(ctx, res, object),
            Rule::UserGroups => add_user_groups(ctx, res, object),
            Rule::ScalingGroupSubnets => {
                for subnet in str_at(object, "VPCZoneIdentifier")
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                {
                    ctx.graph
                        .add_applies_on_relation(res, ResourceKey::new(ResourceType::Subnet, subnet));
                }
            }
            Rule::TargetHealth => {
                let targets = ctx.clients.elbv2.describe_target_health(&res.id).await?;
                for description in targets {
                    let id = description.target.and_then(|t| t.id).unwrap_or_default();
                    if !id.is_empty() {
                        ctx.graph
                            .add_applies_on_relation(res, ResourceKey::new(ResourceType::Instance, id));
                    }
                }
            }
            Rule::AlarmMetric => {
                let namespace = str_at(object, "Namespace");
                let name = str_at(object, "MetricName");
                if !namespace.is_empty() && !name.is_empty() {
                    let metric = hash_id([namespace, name]);
                    ctx.graph
                        .add_applies_on_relation(res, ResourceKey::new(ResourceType::Metric, metric));
                }
            }
        }
        Ok(())
    }
}

fn list<'a>(object: &'a Value, path: &str) -> impl Iterator<Item = &'a Value> {
    lookup(object, path)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

fn add_managed_policies(ctx: &RelationCtx<'_>, res: &ResourceKey, object: &Value) {
    for attached in list(object, "AttachedManagedPolicies") {
        let name = str_at(attached, "PolicyName");
        if name.is_empty() {
            continue;
        }
        let found = ctx.snapshot.resolve_by_property(ResourceType::Policy, NAME, name);
        match found.as_slice() {
            [policy] => ctx.graph.add_applies_on_relation(policy, res),
            [] => log_warn!("policy '{}' attached to {} not found", name, res),
            _ => log_warn!("{} policies named '{}' attached to {}", found.len(), name, res),
        }
    }
}

fn add_user_groups(ctx: &RelationCtx<'_>, res: &ResourceKey, object: &Value) {
    for name in list(object, "GroupList").filter_map(non_empty) {
        let found = ctx.snapshot.resolve_by_property(ResourceType::Group, NAME, name);
        match found.as_slice() {
            [group] => ctx.graph.add_applies_on_relation(group, res),
            [] => log_warn!("group '{}' of {} not found", name, res),
            _ => log_warn!("{} groups named '{}' for {}", found.len(), name, res),
        }
    }
}
