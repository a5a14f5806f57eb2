//! Property names and their schema.
//!
//! Every property a resource may carry is declared here once, with the label it is
//! exported under and the datatype its value must have. The converter and fetch-funcs
//! write properties through these constants; [`check`] rejects a value whose datatype
//! does not match the declaration, so a bag never holds an ill-typed entry.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::values::{PropertyValue, ValueKind};
use crate::app::error::FetchError;

/// Schema entry for one property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDef {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ValueKind,
}

macro_rules! properties {
    ($($konst:ident => $name:literal, $label:literal, $kind:ident;)+) => {
        $(pub const $konst: &str = $name;)+

        static SCHEMA: Lazy<HashMap<&'static str, PropertyDef>> = Lazy::new(|| {
            let mut schema = HashMap::new();
            $(
                schema.insert($name, PropertyDef { name: $name, label: $label, kind: ValueKind::$kind });
            )+
            schema
        });
    };
}

properties! {
    ID => "ID", "cloud:id", String;
    ACCOUNT => "Account", "cloud:account", String;
    ACM_CERTIFICATE => "ACMCertificate", "cloud:acmCertificate", String;
    ACTIONS => "Actions", "cloud:actions", StringList;
    ACTIONS_ENABLED => "ActionsEnabled", "cloud:actionsEnabled", Bool;
    ACTIVE_SERVICES_COUNT => "ActiveServicesCount", "cloud:activeServicesCount", Int;
    ADJUSTMENT_TYPE => "AdjustmentType", "cloud:adjustmentType", String;
    AFFINITY => "Affinity", "cloud:affinity", String;
    AGENT_CONNECTED => "AgentConnected", "cloud:agentConnected", Bool;
    AGENT_STATE => "AgentState", "cloud:agentState", String;
    AGENT_VERSION => "AgentVersion", "cloud:agentVersion", String;
    ALARM_ACTIONS => "AlarmActions", "cloud:alarmActions", StringList;
    ALARM_NAMES => "AlarmNames", "cloud:alarmNames", StringList;
    ALIAS => "Alias", "cloud:alias", String;
    ALIASES => "Aliases", "cloud:aliases", StringList;
    APPROXIMATE_MESSAGE_COUNT => "ApproximateMessageCount", "cloud:approximateMessageCount", Int;
    ARCHITECTURE => "Architecture", "cloud:architecture", String;
    ARN => "Arn", "cloud:arn", String;
    ASSOCIATION => "Association", "cloud:association", String;
    ASSOCIATIONS => "Associations", "cloud:associations", KeyValues;
    ATTACHABLE => "Attachable", "cloud:attachable", Bool;
    ATTACHED => "Attached", "cloud:attached", Bool;
    ATTACHED_AT => "AttachedAt", "cloud:attachedAt", Time;
    ATTACHMENT => "Attachment", "cloud:attachment", String;
    ATTRIBUTES => "Attributes", "cloud:attributes", KeyValues;
    AVAILABILITY_ZONE => "AvailabilityZone", "cloud:availabilityZone", String;
    AVAILABILITY_ZONES => "AvailabilityZones", "cloud:availabilityZones", StringList;
    BUCKET => "Bucket", "cloud:bucketName", String;
    CALLER_REFERENCE => "CallerReference", "cloud:callerReference", String;
    CAPABILITIES => "Capabilities", "cloud:capabilities", StringList;
    CERTIFICATE => "Certificate", "cloud:certificate", String;
    CERTIFICATES => "Certificates", "cloud:certificates", StringList;
    CHANGE_SET => "ChangeSet", "cloud:changeSet", String;
    CHECK_HTTP_CODE => "CheckHTTPCode", "cloud:checkHTTPCode", String;
    CHECK_INTERVAL => "CheckInterval", "cloud:checkInterval", Int;
    CHECK_PATH => "CheckPath", "cloud:checkPath", String;
    CHECK_PORT => "CheckPort", "cloud:checkPort", String;
    CHECK_PROTOCOL => "CheckProtocol", "cloud:checkProtocol", String;
    CHECK_TIMEOUT => "CheckTimeout", "cloud:checkTimeout", Int;
    CIDR => "CIDR", "net:cidr", String;
    CIDR_V6 => "CIDRv6", "net:cidrv6", String;
    CIPHER_SUITE => "CipherSuite", "cloud:cipherSuite", String;
    CLASS => "Class", "cloud:class", String;
    CLUSTER => "Cluster", "cloud:cluster", String;
    COMMENT => "Comment", "rdfs:comment", String;
    CONTAINER_INSTANCE => "ContainerInstance", "cloud:containerInstance", String;
    CONTAINERS_IMAGES => "ContainersImages", "cloud:containersImages", KeyValues;
    CONTAINER_TASK => "ContainerTask", "cloud:containerTask", String;
    CONTINENT => "Continent", "cloud:continent", String;
    COOLDOWN => "Cooldown", "cloud:cooldown", Int;
    COUNTRY => "Country", "cloud:country", String;
    CREATED => "Created", "cloud:created", Time;
    DB_SUBNET_GROUP => "DBSubnetGroup", "cloud:dbSubnetGroup", String;
    DEFAULT => "Default", "cloud:default", Bool;
    DEFAULT_COOLDOWN => "DefaultCooldown", "cloud:defaultCooldown", Int;
    DELAY => "Delay", "cloud:delaySeconds", Int;
    DEPLOYMENT_NAME => "DeploymentName", "cloud:deploymentName", String;
    DEPLOYMENTS => "Deployments", "cloud:deployments", KeyValues;
    DESCRIPTION => "Description", "cloud:description", String;
    DESIRED_CAPACITY => "DesiredCapacity", "cloud:desiredCapacity", Int;
    DIMENSIONS => "Dimensions", "cloud:dimensions", KeyValues;
    DISABLE_ROLLBACK => "DisableRollback", "cloud:disableRollback", Bool;
    DOCKER_VERSION => "DockerVersion", "cloud:dockerVersion", String;
    DOCUMENT => "Document", "cloud:document", String;
    ENABLED => "Enabled", "cloud:enabled", Bool;
    ENCRYPTED => "Encrypted", "cloud:encrypted", Bool;
    ENDPOINT => "Endpoint", "cloud:endpoint", String;
    ENGINE => "Engine", "cloud:engine", String;
    ENGINE_VERSION => "EngineVersion", "cloud:engineVersion", String;
    EXIT_CODE => "ExitCode", "cloud:exitCode", Int;
    FAILOVER => "Failover", "cloud:failover", String;
    FINGERPRINT => "Fingerprint", "cloud:fingerprint", String;
    GRANTS => "Grants", "cloud:grants", Grants;
    HANDLER => "Handler", "cloud:handler", String;
    HASH => "Hash", "cloud:hash", String;
    HEALTH_CHECK => "HealthCheck", "cloud:healthCheck", String;
    HEALTH_CHECK_GRACE_PERIOD => "HealthCheckGracePeriod", "cloud:healthCheckGracePeriod", Int;
    HEALTH_CHECK_TYPE => "HealthCheckType", "cloud:healthCheckType", String;
    HEALTHY_THRESHOLD_COUNT => "HealthyThresholdCount", "cloud:healthyThresholdCount", Int;
    HOST => "Host", "cloud:host", String;
    HTTP_VERSION => "HTTPVersion", "cloud:httpVersion", String;
    HYPERVISOR => "Hypervisor", "cloud:hypervisor", String;
    IMAGE => "Image", "cloud:image", String;
    INBOUND_RULES => "InboundRules", "net:inboundRules", FirewallRules;
    INLINE_POLICIES => "InlinePolicies", "cloud:inlinePolicies", StringList;
    INSTANCE => "Instance", "cloud:instance", String;
    INSTANCE_OWNER => "InstanceOwner", "cloud:instanceOwner", String;
    INSTANCES => "Instances", "cloud:instances", StringList;
    INSUFFICIENT_DATA_ACTIONS => "InsufficientDataActions", "cloud:insufficientDataActions", StringList;
    IOPS => "IOPS", "cloud:iops", Int;
    IP_TYPE => "IPType", "net:ipType", String;
    IPV6_ADDRESSES => "IPv6Addresses", "cloud:ipv6Addresses", StringList;
    IPV6_ENABLED => "IPv6Enabled", "cloud:ipv6Enabled", Bool;
    KEY_PAIR => "KeyPair", "cloud:keyPair", String;
    LAUNCH_CONFIGURATION_NAME => "LaunchConfigurationName", "cloud:launchConfigurationName", String;
    LAUNCHED => "Launched", "cloud:launched", Time;
    LIFECYCLE => "Lifecycle", "cloud:lifecycle", String;
    LOAD_BALANCER => "LoadBalancer", "cloud:loadBalancer", String;
    LOCATION => "Location", "cloud:location", String;
    MAC_ADDRESS => "MACAddress", "cloud:macAddress", String;
    MAX_SIZE => "MaxSize", "cloud:maxSize", Int;
    MEMORY => "Memory", "cloud:memory", Int;
    MESSAGES => "Messages", "cloud:messages", StringList;
    METRIC_NAME => "MetricName", "cloud:metricName", String;
    MIN_SIZE => "MinSize", "cloud:minSize", Int;
    MODIFIED => "Modified", "cloud:modified", Time;
    MULTI_AZ => "MultiAZ", "cloud:multiAZ", Bool;
    NAME => "Name", "cloud:name", String;
    NAMESPACE => "Namespace", "cloud:namespace", String;
    NETWORK_INTERFACES => "NetworkInterfaces", "cloud:networkInterfaces", StringList;
    NEW_INSTANCES_PROTECTED => "NewInstancesProtected", "cloud:newInstancesProtected", Bool;
    NOTIFICATIONS => "Notifications", "cloud:notifications", StringList;
    OK_ACTIONS => "OKActions", "cloud:okActions", StringList;
    ORIGINS => "Origins", "cloud:origins", Origins;
    OUTBOUND_RULES => "OutboundRules", "net:outboundRules", FirewallRules;
    OUTPUTS => "Outputs", "cloud:outputs", KeyValues;
    OWNER => "Owner", "cloud:owner", String;
    PARAMETERS => "Parameters", "cloud:parameters", KeyValues;
    PASSWORD_LAST_USED => "PasswordLastUsed", "cloud:passwordLastUsed", Time;
    PATH => "Path", "cloud:path", String;
    PENDING_TASKS_COUNT => "PendingTasksCount", "cloud:pendingTasksCount", Int;
    PLACEMENT_GROUP => "PlacementGroup", "cloud:placementGroup", String;
    PORT => "Port", "net:port", Int;
    PORTS => "Ports", "net:ports", StringList;
    PRICE_CLASS => "PriceClass", "cloud:priceClass", String;
    PRIVATE => "Private", "cloud:private", Bool;
    PRIVATE_DNS => "PrivateDNS", "cloud:privateDNS", String;
    PRIVATE_IP => "PrivateIP", "net:privateIP", String;
    PROFILE => "Profile", "cloud:profile", String;
    PROGRESS => "Progress", "cloud:progress", String;
    PROTOCOL => "Protocol", "net:protocol", String;
    PUBLIC => "Public", "cloud:public", Bool;
    PUBLIC_DNS => "PublicDNS", "cloud:publicDNS", String;
    PUBLIC_IP => "PublicIP", "net:publicIP", String;
    RECORD_COUNT => "RecordCount", "cloud:recordCount", Int;
    RECORDS => "Records", "cloud:records", StringList;
    REGION => "Region", "cloud:region", String;
    REGISTERED_CONTAINER_INSTANCES_COUNT => "RegisteredContainerInstancesCount", "cloud:registeredContainerInstancesCount", Int;
    REPLICA_OF => "ReplicaOf", "cloud:replicaOf", String;
    ROLE => "Role", "cloud:role", String;
    ROLES => "Roles", "cloud:roles", StringList;
    ROOT_DEVICE => "RootDevice", "cloud:rootDevice", String;
    ROOT_DEVICE_TYPE => "RootDeviceType", "cloud:rootDeviceType", String;
    ROUTES => "Routes", "net:routes", Routes;
    RUNNING_TASKS_COUNT => "RunningTasksCount", "cloud:runningTasksCount", Int;
    RUNTIME => "Runtime", "cloud:runtime", String;
    SCALING_ADJUSTMENT => "ScalingAdjustment", "cloud:scalingAdjustment", Int;
    SCALING_GROUP_NAME => "ScalingGroupName", "cloud:scalingGroupName", String;
    SCHEME => "Scheme", "net:scheme", String;
    SECURITY_GROUPS => "SecurityGroups", "cloud:securityGroups", StringList;
    SET => "Set", "cloud:set", String;
    SIZE => "Size", "cloud:size", Int;
    SPOT_PRICE => "SpotPrice", "cloud:spotPrice", String;
    SSL_SUPPORT_METHOD => "SSLSupportMethod", "cloud:sslSupportMethod", String;
    STATE => "State", "cloud:state", String;
    STATE_MESSAGE => "StateMessage", "cloud:stateMessage", String;
    STOPPED => "Stopped", "cloud:stopped", Time;
    STORAGE => "Storage", "cloud:storage", Int;
    STORAGE_TYPE => "StorageType", "cloud:storageType", String;
    SUBNET => "Subnet", "cloud:subnet", String;
    SUBNETS => "Subnets", "cloud:subnets", StringList;
    TAGS => "Tags", "cloud:tags", StringList;
    TARGET_GROUPS => "TargetGroups", "cloud:targetGroups", StringList;
    TIMEOUT => "Timeout", "cloud:timeout", Int;
    TLS_VERSION_REQUIRED => "TLSVersionRequired", "cloud:tlsVersionRequired", String;
    TOPIC => "Topic", "cloud:topic", String;
    TRAFFIC_POLICY_INSTANCE => "TrafficPolicyInstance", "cloud:trafficPolicyInstance", String;
    TRUST_POLICY => "TrustPolicy", "cloud:trustPolicy", String;
    TTL => "TTL", "cloud:ttl", Int;
    TYPE => "Type", "cloud:type", String;
    UNHEALTHY_THRESHOLD_COUNT => "UnhealthyThresholdCount", "cloud:unhealthyThresholdCount", Int;
    UPDATED => "Updated", "cloud:updated", Time;
    URI => "URI", "cloud:uri", String;
    USER_DATA => "UserData", "cloud:userData", String;
    USERNAME => "Username", "cloud:username", String;
    VERSION => "Version", "cloud:version", String;
    VIRTUALIZATION => "Virtualization", "cloud:virtualization", String;
    VOLUME => "Volume", "cloud:volume", String;
    VPC => "Vpc", "cloud:vpc", String;
    VPCS => "Vpcs", "cloud:vpcs", StringList;
    WEB_ACL => "WebACL", "cloud:webACL", String;
    WEIGHT => "Weight", "cloud:weight", Int;
    ZONE => "Zone", "cloud:zone", String;
}

/// Schema entry for `name`, if the property is known.
pub fn definition(name: &str) -> Option<&'static PropertyDef> {
    SCHEMA.get(name)
}

pub fn is_known(name: &str) -> bool {
    SCHEMA.contains_key(name)
}

/// Export label for `name`, falling back to the bare name for unknown properties.
pub fn label(name: &str) -> &str {
    definition(name).map(|def| def.label).unwrap_or(name)
}

/// Fails when `name` is unknown or `value` is not of its declared datatype.
pub fn check(name: &str, value: &PropertyValue) -> Result<(), FetchError> {
    let def = definition(name).ok_or_else(|| FetchError::Invalid(format!("unknown property '{}'", name)))?;
    if def.kind != value.kind() {
        return Err(FetchError::Invalid(format!(
            "property '{}' expects {:?}, got {:?}",
            name,
            def.kind,
            value.kind()
        )));
    }
    Ok(())
}

/// All declared property names, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = SCHEMA.keys().copied().collect();
    names.sort_unstable();
    names
}
