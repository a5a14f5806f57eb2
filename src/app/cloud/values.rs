//! Typed property values and the value objects they carry.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::app::error::FetchError;

// ============================================================================
// CIDR
// ============================================================================

/// An IPv4 or IPv6 network: address masked to its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cidr {
    network: IpAddr,
    prefix: u8,
}

impl Cidr {
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, FetchError> {
        let network = match addr {
            IpAddr::V4(v4) => {
                if prefix > 32 {
                    return Err(FetchError::Invalid(format!("invalid CIDR prefix /{} for {}", prefix, v4)));
                }
                let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
                IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
            }
            IpAddr::V6(v6) => {
                if prefix > 128 {
                    return Err(FetchError::Invalid(format!("invalid CIDR prefix /{} for {}", prefix, v6)));
                }
                let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
                IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
            }
        };
        Ok(Cidr { network, prefix })
    }

    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn is_ipv4(&self) -> bool {
        self.network.is_ipv4()
    }

    pub fn contains(&self, addr: &IpAddr) -> bool {
        match (addr, self.network) {
            (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_)) => {
                Cidr::new(*addr, self.prefix).map(|c| c.network == self.network).unwrap_or(false)
            }
            _ => false,
        }
    }
}

impl FromStr for Cidr {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FetchError::Invalid(format!("invalid CIDR address: {}", s));
        let (addr, prefix) = s.trim().split_once('/').ok_or_else(invalid)?;
        let addr: IpAddr = addr.parse().map_err(|_| invalid())?;
        let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
        Cidr::new(addr, prefix)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

impl Serialize for Cidr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Firewall rules
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PortRange {
    pub from_port: i64,
    pub to_port: i64,
    pub any: bool,
}

impl PortRange {
    pub fn any() -> Self {
        PortRange {
            any: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FirewallRule {
    pub protocol: String,
    pub port_range: PortRange,
    #[serde(rename = "IPRanges")]
    pub ip_ranges: Vec<Cidr>,
    pub sources: Vec<String>,
}

impl fmt::Display for FirewallRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ports = if self.port_range.any {
            "any".to_string()
        } else if self.port_range.from_port == self.port_range.to_port {
            self.port_range.from_port.to_string()
        } else {
            format!("{}-{}", self.port_range.from_port, self.port_range.to_port)
        };
        let mut origins: Vec<String> = self.ip_ranges.iter().map(|c| c.to_string()).collect();
        origins.extend(self.sources.iter().cloned());
        write!(f, "{}({}) [{}]", self.protocol, ports, origins.join(" "))
    }
}

// ============================================================================
// Routes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RouteTargetType {
    EgressOnlyInternetGateway,
    Gateway,
    Instance,
    Nat,
    NetworkInterface,
    VpcPeeringConnection,
}

impl fmt::Display for RouteTargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteTargetType::EgressOnlyInternetGateway => "egress-only-internet-gateway",
            RouteTargetType::Gateway => "gateway",
            RouteTargetType::Instance => "instance",
            RouteTargetType::Nat => "nat",
            RouteTargetType::NetworkInterface => "network-interface",
            RouteTargetType::VpcPeeringConnection => "vpc-peering-connection",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteTarget {
    #[serde(rename = "Type")]
    pub kind: RouteTargetType,
    #[serde(rename = "Ref")]
    pub reference: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Route {
    pub destination: Option<Cidr>,
    #[serde(rename = "DestinationIPv6")]
    pub destination_ipv6: Option<Cidr>,
    pub destination_prefix_list_id: String,
    pub targets: Vec<RouteTarget>,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut destinations = Vec::new();
        if let Some(dest) = &self.destination {
            destinations.push(dest.to_string());
        }
        if let Some(dest) = &self.destination_ipv6 {
            destinations.push(dest.to_string());
        }
        if !self.destination_prefix_list_id.is_empty() {
            destinations.push(self.destination_prefix_list_id.clone());
        }
        let targets: Vec<String> = self
            .targets
            .iter()
            .map(|t| format!("{}:{}", t.kind, t.reference))
            .collect();
        write!(f, "{}->{}", destinations.join(","), targets.join(","))
    }
}

// ============================================================================
// Grants
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Grantee {
    #[serde(rename = "GranteeID")]
    pub grantee_id: String,
    pub grantee_type: String,
    pub grantee_display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Grant {
    pub permission: String,
    pub grantee: Grantee,
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = if self.grantee.grantee_display_name.is_empty() {
            &self.grantee.grantee_id
        } else {
            &self.grantee.grantee_display_name
        };
        write!(f, "{}[{}]", self.permission, who)
    }
}

// ============================================================================
// Key/values and distribution origins
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyValue {
    pub key_name: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValue {
            key_name: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key_name, self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionOrigin {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "PublicDNS")]
    pub public_dns: String,
    pub path_prefix: String,
    pub origin_type: String,
    pub config: String,
}

impl fmt::Display for DistributionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.public_dns, self.path_prefix)
    }
}

// ============================================================================
// Property values
// ============================================================================

/// Datatype declared for a property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Int,
    Bool,
    Time,
    StringList,
    KeyValues,
    FirewallRules,
    Routes,
    Grants,
    Origins,
}

impl ValueKind {
    pub fn datatype(&self) -> &'static str {
        match self {
            ValueKind::String => "xsd:string",
            ValueKind::Int => "xsd:int",
            ValueKind::Bool => "xsd:boolean",
            ValueKind::Time => "xsd:dateTime",
            ValueKind::StringList => "rdfs:list",
            ValueKind::KeyValues => "cloud-owl:KeyValue",
            ValueKind::FirewallRules => "net-owl:FirewallRule",
            ValueKind::Routes => "net-owl:Route",
            ValueKind::Grants => "cloud-owl:Grant",
            ValueKind::Origins => "cloud-owl:DistributionOrigin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Bool(bool),
    Time(DateTime<Utc>),
    StringList(Vec<String>),
    KeyValues(Vec<KeyValue>),
    FirewallRules(Vec<FirewallRule>),
    Routes(Vec<Route>),
    Grants(Vec<Grant>),
    Origins(Vec<DistributionOrigin>),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::String(_) => ValueKind::String,
            PropertyValue::Int(_) => ValueKind::Int,
            PropertyValue::Bool(_) => ValueKind::Bool,
            PropertyValue::Time(_) => ValueKind::Time,
            PropertyValue::StringList(_) => ValueKind::StringList,
            PropertyValue::KeyValues(_) => ValueKind::KeyValues,
            PropertyValue::FirewallRules(_) => ValueKind::FirewallRules,
            PropertyValue::Routes(_) => ValueKind::Routes,
            PropertyValue::Grants(_) => ValueKind::Grants,
            PropertyValue::Origins(_) => ValueKind::Origins,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::StringList(list) => Some(list),
            _ => None,
        }
    }
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    format!("[{}]", parts.join(" "))
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Time(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            PropertyValue::StringList(list) => f.write_str(&join_display(list)),
            PropertyValue::KeyValues(list) => f.write_str(&join_display(list)),
            PropertyValue::FirewallRules(list) => f.write_str(&join_display(list)),
            PropertyValue::Routes(list) => f.write_str(&join_display(list)),
            PropertyValue::Grants(list) => f.write_str(&join_display(list)),
            PropertyValue::Origins(list) => f.write_str(&join_display(list)),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Int(i)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(t: DateTime<Utc>) -> Self {
        PropertyValue::Time(t)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(list: Vec<String>) -> Self {
        PropertyValue::StringList(list)
    }
}

impl From<Vec<&str>> for PropertyValue {
    fn from(list: Vec<&str>) -> Self {
        PropertyValue::StringList(list.into_iter().map(String::from).collect())
    }
}

impl From<Vec<KeyValue>> for PropertyValue {
    fn from(list: Vec<KeyValue>) -> Self {
        PropertyValue::KeyValues(list)
    }
}

impl From<Vec<FirewallRule>> for PropertyValue {
    fn from(list: Vec<FirewallRule>) -> Self {
        PropertyValue::FirewallRules(list)
    }
}

impl From<Vec<Route>> for PropertyValue {
    fn from(list: Vec<Route>) -> Self {
        PropertyValue::Routes(list)
    }
}

impl From<Vec<Grant>> for PropertyValue {
    fn from(list: Vec<Grant>) -> Self {
        PropertyValue::Grants(list)
    }
}

impl From<Vec<DistributionOrigin>> for PropertyValue {
    fn from(list: Vec<DistributionOrigin>) -> Self {
        PropertyValue::Origins(list)
    }
}
