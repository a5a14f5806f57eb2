//! Cloud model: resource types, relation kinds and typed property values.

pub mod hash;
pub mod properties;
pub mod values;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::app::error::FetchError;

pub use hash::hash_id;
pub use values::{
    Cidr, DistributionOrigin, FirewallRule, Grant, Grantee, KeyValue, PortRange, PropertyValue,
    Route, RouteTarget, RouteTargetType, ValueKind,
};

/// Region value for services whose resources are not region scoped.
pub const REGION_GLOBAL: &str = "global";

macro_rules! resource_types {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Closed enumeration of resource types.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum ResourceType {
            $($variant),+
        }

        impl ResourceType {
            pub const ALL: &'static [ResourceType] = &[$(ResourceType::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ResourceType::$variant => $name),+
                }
            }
        }

        impl FromStr for ResourceType {
            type Err = FetchError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(ResourceType::$variant),)+
                    other => Err(FetchError::UnknownResourceType(other.to_string())),
                }
            }
        }
    };
}

resource_types! {
    Instance => "instance",
    Vpc => "vpc",
    Subnet => "subnet",
    SecurityGroup => "securitygroup",
    KeyPair => "keypair",
    Volume => "volume",
    Image => "image",
    RouteTable => "routetable",
    InternetGateway => "internetgateway",
    NatGateway => "natgateway",
    AvailabilityZone => "availabilityzone",
    ElasticIp => "elasticip",
    Snapshot => "snapshot",
    NetworkInterface => "networkinterface",
    LoadBalancer => "loadbalancer",
    ClassicLoadBalancer => "classicloadbalancer",
    TargetGroup => "targetgroup",
    Listener => "listener",
    Database => "database",
    DbSubnetGroup => "dbsubnetgroup",
    LaunchConfiguration => "launchconfiguration",
    ScalingGroup => "scalinggroup",
    ScalingPolicy => "scalingpolicy",
    Repository => "repository",
    ContainerCluster => "containercluster",
    ContainerTask => "containertask",
    Container => "container",
    ContainerInstance => "containerinstance",
    Certificate => "certificate",
    User => "user",
    Group => "group",
    Role => "role",
    Policy => "policy",
    AccessKey => "accesskey",
    InstanceProfile => "instanceprofile",
    MfaDevice => "mfadevice",
    Bucket => "bucket",
    S3Object => "s3object",
    Subscription => "subscription",
    Topic => "topic",
    Queue => "queue",
    Zone => "zone",
    Record => "record",
    Function => "function",
    Metric => "metric",
    Alarm => "alarm",
    Distribution => "distribution",
    Stack => "stack",
    Region => "region",
}

impl ResourceType {
    /// Plural form used by CLI arguments and displays ("policies", "instances").
    pub fn plural(&self) -> String {
        pluralize(self.as_str())
    }

    /// Accepts either the singular or the plural form.
    pub fn parse_any(s: &str) -> Result<Self, FetchError> {
        let lower = s.trim().to_lowercase();
        lower
            .parse()
            .or_else(|_| singularize(&lower).parse())
            .map_err(|_| FetchError::UnknownResourceType(s.to_string()))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn pluralize(s: &str) -> String {
    if let Some(stem) = s.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", s)
}

pub fn singularize(s: &str) -> String {
    if let Some(stem) = s.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    s.strip_suffix('s').unwrap_or(s).to_string()
}

/// Kinds of typed edges between resources.
///
/// Only `ParentOf` and `AppliesOn` are stored; `ChildOf` and `DependingOn` are the
/// same edges read in the reverse direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationKind {
    ParentOf,
    ChildOf,
    AppliesOn,
    DependingOn,
}

impl RelationKind {
    /// Predicate name used when serializing the edge.
    pub fn predicate(&self) -> &'static str {
        match self {
            RelationKind::ParentOf | RelationKind::ChildOf => "parent-of",
            RelationKind::AppliesOn | RelationKind::DependingOn => "applies-on",
        }
    }

    pub fn reverse(&self) -> RelationKind {
        match self {
            RelationKind::ParentOf => RelationKind::ChildOf,
            RelationKind::ChildOf => RelationKind::ParentOf,
            RelationKind::AppliesOn => RelationKind::DependingOn,
            RelationKind::DependingOn => RelationKind::AppliesOn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_round_trips_names() {
        for kind in ResourceType::ALL {
            assert_eq!(kind.as_str().parse::<ResourceType>().ok(), Some(*kind));
        }
        assert_eq!(ResourceType::ALL.len(), 49);
    }

    #[test]
    fn test_unknown_resource_type() {
        assert_eq!(
            "lambda".parse::<ResourceType>(),
            Err(FetchError::UnknownResourceType("lambda".to_string()))
        );
    }

    #[test]
    fn test_plural_forms() {
        assert_eq!(ResourceType::Policy.plural(), "policies");
        assert_eq!(ResourceType::AccessKey.plural(), "accesskeys");
        assert_eq!(ResourceType::Instance.plural(), "instances");
        assert_eq!(
            ResourceType::parse_any("Policies").ok(),
            Some(ResourceType::Policy)
        );
        assert_eq!(
            ResourceType::parse_any("subnets").ok(),
            Some(ResourceType::Subnet)
        );
    }

    #[test]
    fn test_depending_on_serializes_as_applies_on() {
        assert_eq!(RelationKind::DependingOn.predicate(), "applies-on");
        assert_eq!(RelationKind::ChildOf.predicate(), "parent-of");
        assert_eq!(RelationKind::DependingOn.reverse(), RelationKind::AppliesOn);
    }
}
