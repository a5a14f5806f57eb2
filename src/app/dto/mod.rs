//! Serde shapes of the provider responses.
//!
//! Each shape mirrors the provider's field names (`PascalCase`, with the provider's own
//! spelling of acronyms such as `DNSName` or `VPCZoneIdentifier`), every field optional.
//! [`Dto`] wraps them into one tagged enum: it resolves a shape to its resource type and
//! id, and projects it to JSON for the converter and the relation rules.

pub mod acm;
pub mod autoscaling;
pub mod cloudformation;
pub mod cloudfront;
pub mod cloudwatch;
pub mod ec2;
pub mod ecs;
pub mod elb;
pub mod iam;
pub mod lambda;
pub mod messaging;
pub mod rds;
pub mod route53;
pub mod s3;

use serde::{Deserialize, Serialize};

use crate::app::cloud::{hash_id, ResourceType};
use crate::app::error::FetchError;

/// EC2 style tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Tag {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }
}

/// Borrows a concrete shape back out of a [`Dto`].
pub trait FromDto: Sized {
    fn from_dto(dto: &Dto) -> Option<&Self>;
}

macro_rules! dtos {
    ($($variant:ident($ty:ty) => $kind:ident,)+) => {
        /// A provider object, tagged with its shape.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum Dto {
            $($variant($ty),)+
        }

        impl Dto {
            pub fn resource_type(&self) -> ResourceType {
                match self {
                    $(Dto::$variant(_) => ResourceType::$kind,)+
                }
            }

            /// Name of the shape, as used in logs and error messages.
            pub fn shape(&self) -> &'static str {
                match self {
                    $(Dto::$variant(_) => stringify!($variant),)+
                }
            }

            /// JSON projection of the wrapped shape.
            pub fn to_value(&self) -> Result<serde_json::Value, FetchError> {
                let value = match self {
                    $(Dto::$variant(inner) => serde_json::to_value(inner),)+
                };
                value.map_err(|e| FetchError::Invalid(format!("cannot project {}: {}", self.shape(), e)))
            }
        }

        $(
            impl From<$ty> for Dto {
                fn from(inner: $ty) -> Self {
                    Dto::$variant(inner)
                }
            }

            impl FromDto for $ty {
                fn from_dto(dto: &Dto) -> Option<&Self> {
                    match dto {
                        Dto::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+
    };
}

dtos! {
    Instance(ec2::Instance) => Instance,
    Vpc(ec2::Vpc) => Vpc,
    Subnet(ec2::Subnet) => Subnet,
    SecurityGroup(ec2::SecurityGroup) => SecurityGroup,
    KeyPair(ec2::KeyPairInfo) => KeyPair,
    Volume(ec2::Volume) => Volume,
    Image(ec2::Image) => Image,
    InternetGateway(ec2::InternetGateway) => InternetGateway,
    NatGateway(ec2::NatGateway) => NatGateway,
    RouteTable(ec2::RouteTable) => RouteTable,
    AvailabilityZone(ec2::AvailabilityZone) => AvailabilityZone,
    Address(ec2::Address) => ElasticIp,
    Snapshot(ec2::Snapshot) => Snapshot,
    NetworkInterface(ec2::NetworkInterface) => NetworkInterface,
    ClassicLoadBalancer(elb::LoadBalancerDescription) => ClassicLoadBalancer,
    LoadBalancer(elb::LoadBalancer) => LoadBalancer,
    TargetGroup(elb::TargetGroup) => TargetGroup,
    Listener(elb::Listener) => Listener,
    DbInstance(rds::DbInstance) => Database,
    DbSubnetGroup(rds::DbSubnetGroup) => DbSubnetGroup,
    LaunchConfiguration(autoscaling::LaunchConfiguration) => LaunchConfiguration,
    ScalingGroup(autoscaling::Group) => ScalingGroup,
    ScalingPolicy(autoscaling::ScalingPolicy) => ScalingPolicy,
    Repository(ecs::Repository) => Repository,
    Cluster(ecs::Cluster) => ContainerCluster,
    TaskDefinition(ecs::TaskDefinition) => ContainerTask,
    Container(ecs::Container) => Container,
    ContainerInstance(ecs::ContainerInstance) => ContainerInstance,
    Certificate(acm::CertificateSummary) => Certificate,
    User(iam::User) => User,
    UserDetail(iam::UserDetail) => User,
    GroupDetail(iam::GroupDetail) => Group,
    RoleDetail(iam::RoleDetail) => Role,
    Policy(iam::Policy) => Policy,
    ManagedPolicyDetail(iam::ManagedPolicyDetail) => Policy,
    AccessKey(iam::AccessKeyMetadata) => AccessKey,
    InstanceProfile(iam::InstanceProfile) => InstanceProfile,
    MfaDevice(iam::VirtualMfaDevice) => MfaDevice,
    Bucket(s3::Bucket) => Bucket,
    Object(s3::Object) => S3Object,
    Subscription(messaging::Subscription) => Subscription,
    Topic(messaging::Topic) => Topic,
    Queue(messaging::Queue) => Queue,
    HostedZone(route53::HostedZone) => Zone,
    RecordSet(route53::ResourceRecordSet) => Record,
    Function(lambda::FunctionConfiguration) => Function,
    Metric(cloudwatch::Metric) => Metric,
    Alarm(cloudwatch::MetricAlarm) => Alarm,
    Distribution(cloudfront::DistributionSummary) => Distribution,
    Stack(cloudformation::Stack) => Stack,
}

fn text(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}

impl Dto {
    /// Provider id of the resource built from this object. Records and metrics have
    /// no natural id and use the content hash of their identity fields.
    pub fn id(&self) -> String {
        match self {
            Dto::Instance(d) => text(&d.instance_id),
            Dto::Vpc(d) => text(&d.vpc_id),
            Dto::Subnet(d) => text(&d.subnet_id),
            Dto::SecurityGroup(d) => text(&d.group_id),
            Dto::KeyPair(d) => text(&d.key_name),
            Dto::Volume(d) => text(&d.volume_id),
            Dto::Image(d) => text(&d.image_id),
            Dto::InternetGateway(d) => text(&d.internet_gateway_id),
            Dto::NatGateway(d) => text(&d.nat_gateway_id),
            Dto::RouteTable(d) => text(&d.route_table_id),
            Dto::AvailabilityZone(d) => text(&d.zone_name),
            Dto::Address(d) => match d.allocation_id.as_deref() {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => text(&d.public_ip),
            },
            Dto::Snapshot(d) => text(&d.snapshot_id),
            Dto::NetworkInterface(d) => text(&d.network_interface_id),
            Dto::ClassicLoadBalancer(d) => text(&d.load_balancer_name),
            Dto::LoadBalancer(d) => text(&d.load_balancer_arn),
            Dto::TargetGroup(d) => text(&d.target_group_arn),
            Dto::Listener(d) => text(&d.listener_arn),
            Dto::DbInstance(d) => text(&d.db_instance_identifier),
            Dto::DbSubnetGroup(d) => text(&d.db_subnet_group_name),
            Dto::LaunchConfiguration(d) => text(&d.launch_configuration_arn),
            Dto::ScalingGroup(d) => text(&d.auto_scaling_group_arn),
            Dto::ScalingPolicy(d) => text(&d.policy_arn),
            Dto::Repository(d) => text(&d.repository_arn),
            Dto::Cluster(d) => text(&d.cluster_arn),
            Dto::TaskDefinition(d) => text(&d.task_definition_arn),
            Dto::Container(d) => text(&d.container_arn),
            Dto::ContainerInstance(d) => text(&d.container_instance_arn),
            Dto::Certificate(d) => text(&d.certificate_arn),
            Dto::User(d) => text(&d.user_id),
            Dto::UserDetail(d) => text(&d.user_id),
            Dto::GroupDetail(d) => text(&d.group_id),
            Dto::RoleDetail(d) => text(&d.role_id),
            Dto::Policy(d) => text(&d.policy_id),
            Dto::ManagedPolicyDetail(d) => text(&d.policy_id),
            Dto::AccessKey(d) => text(&d.access_key_id),
            Dto::InstanceProfile(d) => text(&d.instance_profile_id),
            Dto::MfaDevice(d) => text(&d.serial_number),
            Dto::Bucket(d) => text(&d.name),
            Dto::Object(d) => text(&d.key),
            Dto::Subscription(d) => text(&d.endpoint),
            Dto::Topic(d) => text(&d.topic_arn),
            Dto::Queue(d) => text(&d.queue_url),
            Dto::HostedZone(d) => text(&d.id),
            Dto::RecordSet(d) => hash_id([text(&d.name), text(&d.kind)]),
            Dto::Function(d) => text(&d.function_arn),
            Dto::Metric(d) => hash_id([text(&d.namespace), text(&d.metric_name)]),
            Dto::Alarm(d) => text(&d.alarm_arn),
            Dto::Distribution(d) => text(&d.id),
            Dto::Stack(d) => text(&d.stack_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resource_type_resolution() {
        let user: Dto = iam::User::default().into();
        let detail: Dto = iam::UserDetail::default().into();
        assert_eq!(user.resource_type(), ResourceType::User);
        assert_eq!(detail.resource_type(), ResourceType::User);

        let policy: Dto = iam::ManagedPolicyDetail::default().into();
        assert_eq!(policy.resource_type(), ResourceType::Policy);
        assert_eq!(policy.shape(), "ManagedPolicyDetail");
    }

    #[test]
    fn test_from_dto_matches_shape() {
        let dto = Dto::from(ec2::Vpc {
            vpc_id: Some("vpc_1".to_string()),
            ..Default::default()
        });
        assert_eq!(ec2::Vpc::from_dto(&dto).and_then(|v| v.vpc_id.as_deref()), Some("vpc_1"));
        assert!(ec2::Subnet::from_dto(&dto).is_none());
    }

    #[test]
    fn test_hashed_ids() {
        let record = Dto::from(route53::ResourceRecordSet {
            name: Some("subdomain1.my.first.domain".to_string()),
            kind: Some("A".to_string()),
            ..Default::default()
        });
        assert_eq!(record.id(), "awls-91fa0a45");

        let metric = Dto::from(cloudwatch::Metric {
            namespace: Some("namespace_1".to_string()),
            metric_name: Some("metric_1".to_string()),
            ..Default::default()
        });
        assert_eq!(metric.id(), "awls-4ba90752");
    }

    #[test]
    fn test_record_id_ignores_set_identifier() {
        let weighted = Dto::from(route53::ResourceRecordSet {
            name: Some("subdomain1.my.first.domain".to_string()),
            kind: Some("A".to_string()),
            set_identifier: Some("w1".to_string()),
            ..Default::default()
        });
        assert_eq!(weighted.id(), "awls-91fa0a45");
    }

    #[test]
    fn test_db_subnet_group_is_keyed_by_name() {
        let group = Dto::from(rds::DbSubnetGroup {
            db_subnet_group_name: Some("default-vpc-1".to_string()),
            db_subnet_group_arn: Some("arn:aws:rds:eu-west-1:123:subgrp:default-vpc-1".to_string()),
            ..Default::default()
        });
        assert_eq!(group.id(), "default-vpc-1");
    }

    #[test]
    fn test_elastic_ip_falls_back_to_public_ip() {
        let allocated = Dto::from(ec2::Address {
            allocation_id: Some("eipalloc_1".to_string()),
            public_ip: Some("1.2.3.4".to_string()),
            ..Default::default()
        });
        assert_eq!(allocated.id(), "eipalloc_1");

        let classic = Dto::from(ec2::Address {
            allocation_id: Some(String::new()),
            public_ip: Some("1.2.3.4".to_string()),
            ..Default::default()
        });
        assert_eq!(classic.id(), "1.2.3.4");
    }

    #[test]
    fn test_projection_uses_provider_field_names() {
        let lb = Dto::from(elb::LoadBalancerDescription {
            load_balancer_name: Some("lb_1".to_string()),
            dns_name: Some("lb.example".to_string()),
            vpc_id: Some("vpc_1".to_string()),
            ..Default::default()
        });
        let value = lb.to_value().unwrap();
        assert_eq!(value["DNSName"], "lb.example");
        assert_eq!(value["VPCId"], "vpc_1");
        assert!(value["Scheme"].is_null());

        let parsed: elb::LoadBalancerDescription = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.load_balancer_name.as_deref(), Some("lb_1"));
    }
}
