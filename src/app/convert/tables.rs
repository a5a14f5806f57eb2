//! Transformation tables, one per provider shape.
//!
//! Paths name the provider's own fields, dotted for nested objects. Properties a
//! fetch-func computes from other calls (bucket grants, queue attributes, container
//! deployments...) are not listed here.

use once_cell::sync::Lazy;
use serde_json::Value;

use super::extract::{self, ExtractResult};
use super::{PropDef, Table};
use crate::app::cloud::properties::*;
use crate::app::cloud::PropertyValue;
use crate::app::dto::Dto;

pub const AWS_MANAGED_POLICY_PREFIX: &str = "arn:aws:iam::aws:policy";

fn val(path: &'static str) -> PropDef {
    PropDef::transform(path, extract::value)
}

fn map<F>(path: &'static str, extract: F) -> PropDef
where
    F: Fn(&Value) -> ExtractResult + Send + Sync + 'static,
{
    PropDef::transform(path, extract)
}

fn time(path: &'static str) -> PropDef {
    PropDef::transform(path, extract::time)
}

fn list_of(path: &'static str, field: &'static str) -> PropDef {
    PropDef::transform(path, extract::string_slice(field))
}

fn name_tag() -> PropDef {
    map("Tags", extract::tag("Name"))
}

fn tags() -> PropDef {
    map("Tags", extract::tags)
}

fn policy_type(policy: &Value) -> ExtractResult {
    let managed = if extract::str_at(policy, "Arn").starts_with(AWS_MANAGED_POLICY_PREFIX) {
        "AWS Managed"
    } else {
        "Customer Managed"
    };
    Ok(PropertyValue::from(managed))
}

fn policy_attached(policy: &Value) -> ExtractResult {
    let count = extract::lookup(policy, "AttachmentCount").and_then(Value::as_i64).unwrap_or_default();
    Ok(PropertyValue::Bool(count > 0))
}

// ============================================================================
// Infra
// ============================================================================

static INSTANCE_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, name_tag()),
        (TAGS, tags()),
        (TYPE, val("InstanceType")),
        (STATE, val("State.Name")),
        (STATE_MESSAGE, val("StateReason.Message")),
        (SUBNET, val("SubnetId")),
        (VPC, val("VpcId")),
        (PUBLIC_IP, val("PublicIpAddress")),
        (PRIVATE_IP, val("PrivateIpAddress")),
        (PUBLIC_DNS, val("PublicDnsName")),
        (PRIVATE_DNS, val("PrivateDnsName")),
        (IMAGE, val("ImageId")),
        (LAUNCHED, time("LaunchTime")),
        (KEY_PAIR, val("KeyName")),
        (SECURITY_GROUPS, list_of("SecurityGroups", "GroupId")),
        (NETWORK_INTERFACES, list_of("NetworkInterfaces", "NetworkInterfaceId")),
        (AVAILABILITY_ZONE, val("Placement.AvailabilityZone")),
        (AFFINITY, val("Placement.Affinity")),
        (PLACEMENT_GROUP, val("Placement.GroupName")),
        (ARCHITECTURE, val("Architecture")),
        (HYPERVISOR, val("Hypervisor")),
        (ROOT_DEVICE, val("RootDeviceName")),
        (ROOT_DEVICE_TYPE, val("RootDeviceType")),
        (VIRTUALIZATION, val("VirtualizationType")),
        (LIFECYCLE, val("InstanceLifecycle")),
        (PROFILE, val("IamInstanceProfile.Arn")),
    ]
});

static VPC_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, name_tag()),
        (TAGS, tags()),
        (DEFAULT, val("IsDefault")),
        (STATE, val("State")),
        (CIDR, val("CidrBlock")),
    ]
});

static SUBNET_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, name_tag()),
        (TAGS, tags()),
        (VPC, val("VpcId")),
        (PUBLIC, val("MapPublicIpOnLaunch")),
        (STATE, val("State")),
        (CIDR, val("CidrBlock")),
        (AVAILABILITY_ZONE, val("AvailabilityZone")),
        (DEFAULT, val("DefaultForAz")),
    ]
});

static SECURITY_GROUP_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("GroupName")),
        (TAGS, tags()),
        (DESCRIPTION, val("Description")),
        (INBOUND_RULES, map("IpPermissions", extract::firewall_rules)),
        (OUTBOUND_RULES, map("IpPermissionsEgress", extract::firewall_rules)),
        (OWNER, val("OwnerId")),
        (VPC, val("VpcId")),
    ]
});

static KEY_PAIR_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("KeyName")),
        (FINGERPRINT, val("KeyFingerprint")),
    ]
});

static VOLUME_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, name_tag()),
        (TAGS, tags()),
        (TYPE, val("VolumeType")),
        (STATE, val("State")),
        (SIZE, val("Size")),
        (ENCRYPTED, val("Encrypted")),
        (CREATED, time("CreateTime")),
        (AVAILABILITY_ZONE, val("AvailabilityZone")),
        (IOPS, val("Iops")),
    ]
});

static IMAGE_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("Name")),
        (TAGS, tags()),
        (DESCRIPTION, val("Description")),
        (ARCHITECTURE, val("Architecture")),
        (HYPERVISOR, val("Hypervisor")),
        (CREATED, map("CreationDate", extract::time_z)),
        (LOCATION, val("ImageLocation")),
        (TYPE, val("ImageType")),
        (OWNER, val("OwnerId")),
        (PUBLIC, val("Public")),
        (ROOT_DEVICE, val("RootDeviceName")),
        (ROOT_DEVICE_TYPE, val("RootDeviceType")),
        (STATE, val("State")),
        (VIRTUALIZATION, val("VirtualizationType")),
    ]
});

static INTERNET_GATEWAY_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, name_tag()),
        (TAGS, tags()),
        (VPCS, list_of("Attachments", "VpcId")),
    ]
});

static NAT_GATEWAY_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, name_tag()),
        (TAGS, tags()),
        (VPC, val("VpcId")),
        (SUBNET, val("SubnetId")),
        (STATE, val("State")),
        (STATE_MESSAGE, val("FailureMessage")),
        (CREATED, time("CreateTime")),
    ]
});

static ROUTE_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, name_tag()),
        (TAGS, tags()),
        (VPC, val("VpcId")),
        (ROUTES, map("Routes", extract::routes)),
        (DEFAULT, map("Associations", extract::has_true_bool("Main"))),
        (
            ASSOCIATIONS,
            map("Associations", extract::key_values("RouteTableAssociationId", "SubnetId")),
        ),
    ]
});

static AVAILABILITY_ZONE_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("ZoneName")),
        (STATE, val("State")),
        (REGION, val("RegionName")),
        (MESSAGES, list_of("Messages", "Message")),
    ]
});

static ELASTIC_IP_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (PUBLIC_IP, val("PublicIp")),
        (PRIVATE_IP, val("PrivateIpAddress")),
        (TYPE, val("Domain")),
        (ASSOCIATION, val("AssociationId")),
        (INSTANCE, val("InstanceId")),
    ]
});

static SNAPSHOT_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (TAGS, tags()),
        (VOLUME, val("VolumeId")),
        (DESCRIPTION, val("Description")),
        (ENCRYPTED, val("Encrypted")),
        (OWNER, val("OwnerId")),
        (PROGRESS, val("Progress")),
        (CREATED, time("StartTime")),
        (STATE, val("State")),
        (SIZE, val("VolumeSize")),
    ]
});

static NETWORK_INTERFACE_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (TAGS, map("TagSet", extract::tags)),
        (DESCRIPTION, val("Description")),
        (SUBNET, val("SubnetId")),
        (VPC, val("VpcId")),
        (AVAILABILITY_ZONE, val("AvailabilityZone")),
        (MAC_ADDRESS, val("MacAddress")),
        (PRIVATE_IP, val("PrivateIpAddress")),
        (PRIVATE_DNS, val("PrivateDnsName")),
        (STATE, val("Status")),
        (TYPE, val("InterfaceType")),
        (ATTACHMENT, val("Attachment.AttachmentId")),
        (INSTANCE, val("Attachment.InstanceId")),
        (INSTANCE_OWNER, val("Attachment.InstanceOwnerId")),
        (SECURITY_GROUPS, list_of("Groups", "GroupId")),
        (IPV6_ADDRESSES, list_of("Ipv6Addresses", "Ipv6Address")),
        (PUBLIC_IP, val("Association.PublicIp")),
        (PUBLIC_DNS, val("Association.PublicDnsName")),
    ]
});

static CLASSIC_LOAD_BALANCER_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("LoadBalancerName")),
        (AVAILABILITY_ZONES, val("AvailabilityZones")),
        (SUBNETS, val("Subnets")),
        (SECURITY_GROUPS, val("SecurityGroups")),
        (CREATED, time("CreatedTime")),
        (PUBLIC_DNS, val("DNSName")),
        (SCHEME, val("Scheme")),
        (VPC, val("VPCId")),
        (INSTANCES, list_of("Instances", "InstanceId")),
        (PORTS, map("ListenerDescriptions", extract::classic_listener_descriptions)),
        (HEALTH_CHECK, val("HealthCheck.Target")),
    ]
});

static LOAD_BALANCER_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("LoadBalancerName")),
        (AVAILABILITY_ZONES, list_of("AvailabilityZones", "ZoneName")),
        (SUBNETS, list_of("AvailabilityZones", "SubnetId")),
        (SECURITY_GROUPS, val("SecurityGroups")),
        (CREATED, time("CreatedTime")),
        (PUBLIC_DNS, val("DNSName")),
        (IP_TYPE, val("IpAddressType")),
        (SCHEME, val("Scheme")),
        (STATE, val("State.Code")),
        (TYPE, val("Type")),
        (VPC, val("VpcId")),
    ]
});

static TARGET_GROUP_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("TargetGroupName")),
        (CHECK_INTERVAL, val("HealthCheckIntervalSeconds")),
        (CHECK_PATH, val("HealthCheckPath")),
        (CHECK_PORT, val("HealthCheckPort")),
        (CHECK_PROTOCOL, val("HealthCheckProtocol")),
        (CHECK_TIMEOUT, val("HealthCheckTimeoutSeconds")),
        (HEALTHY_THRESHOLD_COUNT, val("HealthyThresholdCount")),
        (UNHEALTHY_THRESHOLD_COUNT, val("UnhealthyThresholdCount")),
        (CHECK_HTTP_CODE, val("Matcher.HttpCode")),
        (PORT, val("Port")),
        (PROTOCOL, val("Protocol")),
        (VPC, val("VpcId")),
    ]
});

static LISTENER_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (CERTIFICATES, list_of("Certificates", "CertificateArn")),
        (ACTIONS, list_of("DefaultActions", "Type")),
        (LOAD_BALANCER, val("LoadBalancerArn")),
        (PORT, val("Port")),
        (PROTOCOL, val("Protocol")),
        (CIPHER_SUITE, val("SslPolicy")),
    ]
});

static DATABASE_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("DBName")),
        (ARN, val("DBInstanceArn")),
        (AVAILABILITY_ZONE, val("AvailabilityZone")),
        (CLASS, val("DBInstanceClass")),
        (STATE, val("DBInstanceStatus")),
        (DB_SUBNET_GROUP, val("DBSubnetGroup.DBSubnetGroupName")),
        (ENGINE, val("Engine")),
        (ENGINE_VERSION, val("EngineVersion")),
        (ENCRYPTED, val("StorageEncrypted")),
        (PUBLIC_DNS, val("Endpoint.Address")),
        (PORT, val("Endpoint.Port")),
        (CREATED, time("InstanceCreateTime")),
        (USERNAME, val("MasterUsername")),
        (MULTI_AZ, val("MultiAZ")),
        (PUBLIC, val("PubliclyAccessible")),
        (REPLICA_OF, val("ReadReplicaSourceDBInstanceIdentifier")),
        (STORAGE_TYPE, val("StorageType")),
        (STORAGE, val("AllocatedStorage")),
        (IOPS, val("Iops")),
        (SECURITY_GROUPS, list_of("VpcSecurityGroups", "VpcSecurityGroupId")),
    ]
});

static DB_SUBNET_GROUP_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("DBSubnetGroupName")),
        (ARN, val("DBSubnetGroupArn")),
        (DESCRIPTION, val("DBSubnetGroupDescription")),
        (STATE, val("SubnetGroupStatus")),
        (VPC, val("VpcId")),
        (SUBNETS, list_of("Subnets", "SubnetIdentifier")),
    ]
});

static LAUNCH_CONFIGURATION_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("LaunchConfigurationName")),
        (IMAGE, val("ImageId")),
        (TYPE, val("InstanceType")),
        (KEY_PAIR, val("KeyName")),
        (CREATED, time("CreatedTime")),
        (SECURITY_GROUPS, val("SecurityGroups")),
        (SPOT_PRICE, val("SpotPrice")),
        (USER_DATA, val("UserData")),
        (PROFILE, val("IamInstanceProfile")),
        (PUBLIC, val("AssociatePublicIpAddress")),
    ]
});

static SCALING_GROUP_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("AutoScalingGroupName")),
        (ARN, val("AutoScalingGroupARN")),
        (TAGS, tags()),
        (CREATED, time("CreatedTime")),
        (DEFAULT_COOLDOWN, val("DefaultCooldown")),
        (DESIRED_CAPACITY, val("DesiredCapacity")),
        (HEALTH_CHECK_GRACE_PERIOD, val("HealthCheckGracePeriod")),
        (HEALTH_CHECK_TYPE, val("HealthCheckType")),
        (LAUNCH_CONFIGURATION_NAME, val("LaunchConfigurationName")),
        (MAX_SIZE, val("MaxSize")),
        (MIN_SIZE, val("MinSize")),
        (NEW_INSTANCES_PROTECTED, val("NewInstancesProtectedFromScaleIn")),
        (STATE, val("Status")),
        (AVAILABILITY_ZONES, val("AvailabilityZones")),
        (INSTANCES, list_of("Instances", "InstanceId")),
        (TARGET_GROUPS, val("TargetGroupARNs")),
    ]
});

static SCALING_POLICY_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("PolicyName")),
        (ARN, val("PolicyARN")),
        (ADJUSTMENT_TYPE, val("AdjustmentType")),
        (ALARM_NAMES, list_of("Alarms", "AlarmName")),
        (SCALING_GROUP_NAME, val("AutoScalingGroupName")),
        (COOLDOWN, val("Cooldown")),
        (TYPE, val("PolicyType")),
        (SCALING_ADJUSTMENT, val("ScalingAdjustment")),
    ]
});

static REPOSITORY_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("RepositoryName")),
        (ARN, val("RepositoryArn")),
        (CREATED, time("CreatedAt")),
        (ACCOUNT, val("RegistryId")),
        (URI, val("RepositoryUri")),
    ]
});

static CONTAINER_CLUSTER_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("ClusterName")),
        (ARN, val("ClusterArn")),
        (ACTIVE_SERVICES_COUNT, val("ActiveServicesCount")),
        (PENDING_TASKS_COUNT, val("PendingTasksCount")),
        (REGISTERED_CONTAINER_INSTANCES_COUNT, val("RegisteredContainerInstancesCount")),
        (RUNNING_TASKS_COUNT, val("RunningTasksCount")),
        (STATE, val("Status")),
    ]
});

static CONTAINER_TASK_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("Family")),
        (ARN, val("TaskDefinitionArn")),
        (VERSION, map("Revision", extract::value_as_string)),
        (STATE, val("Status")),
        (CONTAINERS_IMAGES, map("ContainerDefinitions", extract::key_values("Name", "Image"))),
        (ROLE, val("TaskRoleArn")),
        (ATTRIBUTES, map("RequiresAttributes", extract::key_values("Name", "Value"))),
    ]
});

static CONTAINER_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("Name")),
        (ARN, val("ContainerArn")),
        (EXIT_CODE, val("ExitCode")),
        (STATE, val("LastStatus")),
        (STATE_MESSAGE, val("Reason")),
    ]
});

static CONTAINER_INSTANCE_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (ARN, val("ContainerInstanceArn")),
        (AGENT_CONNECTED, val("AgentConnected")),
        (AGENT_STATE, val("AgentUpdateStatus")),
        (ATTRIBUTES, map("Attributes", extract::key_values("Name", "Value"))),
        (INSTANCE, val("Ec2InstanceId")),
        (STATE, val("Status")),
        (CREATED, time("RegisteredAt")),
        (RUNNING_TASKS_COUNT, val("RunningTasksCount")),
        (PENDING_TASKS_COUNT, val("PendingTasksCount")),
        (AGENT_VERSION, val("VersionInfo.AgentVersion")),
        (DOCKER_VERSION, val("VersionInfo.DockerVersion")),
    ]
});

static CERTIFICATE_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("DomainName")),
        (ARN, val("CertificateArn")),
    ]
});

// ============================================================================
// Access
// ============================================================================

static USER_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("UserName")),
        (ARN, val("Arn")),
        (PATH, val("Path")),
        (CREATED, time("CreateDate")),
        (PASSWORD_LAST_USED, time("PasswordLastUsed")),
    ]
});

static USER_DETAIL_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("UserName")),
        (ARN, val("Arn")),
        (PATH, val("Path")),
        (CREATED, time("CreateDate")),
        (INLINE_POLICIES, list_of("UserPolicyList", "PolicyName")),
    ]
});

static GROUP_DETAIL_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("GroupName")),
        (ARN, val("Arn")),
        (PATH, val("Path")),
        (CREATED, time("CreateDate")),
        (INLINE_POLICIES, list_of("GroupPolicyList", "PolicyName")),
    ]
});

static ROLE_DETAIL_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("RoleName")),
        (ARN, val("Arn")),
        (PATH, val("Path")),
        (CREATED, time("CreateDate")),
        (INLINE_POLICIES, list_of("RolePolicyList", "PolicyName")),
        (TRUST_POLICY, map("AssumeRolePolicyDocument", extract::url_encoded_json)),
    ]
});

fn policy_entries() -> Table {
    vec![
        (NAME, val("PolicyName")),
        (ARN, val("Arn")),
        (PATH, val("Path")),
        (CREATED, time("CreateDate")),
        (UPDATED, time("UpdateDate")),
        (DESCRIPTION, val("Description")),
        (ATTACHABLE, val("IsAttachable")),
        (VERSION, val("DefaultVersionId")),
        (TYPE, PropDef::fetch(policy_type)),
        (ATTACHED, PropDef::fetch(policy_attached)),
    ]
}

static POLICY_TABLE: Lazy<Table> = Lazy::new(policy_entries);

static MANAGED_POLICY_DETAIL_TABLE: Lazy<Table> = Lazy::new(|| {
    let mut table = policy_entries();
    table.push((DOCUMENT, map("PolicyVersionList", extract::document_default_version)));
    table
});

static ACCESS_KEY_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (USERNAME, val("UserName")),
        (STATE, val("Status")),
        (CREATED, time("CreateDate")),
    ]
});

static INSTANCE_PROFILE_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("InstanceProfileName")),
        (ARN, val("Arn")),
        (CREATED, time("CreateDate")),
        (PATH, val("Path")),
        (ROLES, list_of("Roles", "RoleName")),
    ]
});

static MFA_DEVICE_TABLE: Lazy<Table> = Lazy::new(|| vec![(ATTACHED_AT, time("EnableDate"))]);

// ============================================================================
// Storage, messaging, dns
// ============================================================================

static BUCKET_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("Name")),
        (CREATED, time("CreationDate")),
    ]
});

static S3_OBJECT_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("Key")),
        (MODIFIED, time("LastModified")),
        (OWNER, val("Owner.ID")),
        (SIZE, val("Size")),
        (CLASS, val("StorageClass")),
    ]
});

static SUBSCRIPTION_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (ENDPOINT, val("Endpoint")),
        (OWNER, val("Owner")),
        (PROTOCOL, val("Protocol")),
        (ARN, val("SubscriptionArn")),
        (TOPIC, val("TopicArn")),
    ]
});

static TOPIC_TABLE: Lazy<Table> = Lazy::new(|| vec![(ARN, val("TopicArn"))]);

static QUEUE_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (ARN, val("Attributes.QueueArn")),
        (APPROXIMATE_MESSAGE_COUNT, map("Attributes.ApproximateNumberOfMessages", extract::string_int)),
        (CREATED, map("Attributes.CreatedTimestamp", extract::unix_time)),
        (MODIFIED, map("Attributes.LastModifiedTimestamp", extract::unix_time)),
        (DELAY, map("Attributes.DelaySeconds", extract::string_int)),
    ]
});

static ZONE_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("Name")),
        (COMMENT, val("Config.Comment")),
        (PRIVATE, val("Config.PrivateZone")),
        (CALLER_REFERENCE, val("CallerReference")),
        (RECORD_COUNT, val("ResourceRecordSetCount")),
    ]
});

static RECORD_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("Name")),
        (FAILOVER, val("Failover")),
        (CONTINENT, val("GeoLocation.ContinentCode")),
        (COUNTRY, val("GeoLocation.CountryCode")),
        (HEALTH_CHECK, val("HealthCheckId")),
        (REGION, val("Region")),
        (RECORDS, list_of("ResourceRecords", "Value")),
        (SET, val("SetIdentifier")),
        (TTL, val("TTL")),
        (TYPE, val("Type")),
        (WEIGHT, val("Weight")),
        (TRAFFIC_POLICY_INSTANCE, val("TrafficPolicyInstanceId")),
        (ALIAS, val("AliasTarget.DNSName")),
    ]
});

// ============================================================================
// Lambda, monitoring, cdn, cloudformation
// ============================================================================

static FUNCTION_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("FunctionName")),
        (ARN, val("FunctionArn")),
        (DESCRIPTION, val("Description")),
        (HANDLER, val("Handler")),
        (RUNTIME, val("Runtime")),
        (ROLE, val("Role")),
        (MEMORY, val("MemorySize")),
        (TIMEOUT, val("Timeout")),
        (HASH, val("CodeSha256")),
        (VERSION, val("Version")),
        (MODIFIED, time("LastModified")),
        (SIZE, val("CodeSize")),
    ]
});

static METRIC_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAMESPACE, val("Namespace")),
        (NAME, val("MetricName")),
        (METRIC_NAME, val("MetricName")),
        (DIMENSIONS, map("Dimensions", extract::key_values("Name", "Value"))),
    ]
});

static ALARM_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("AlarmName")),
        (ARN, val("AlarmArn")),
        (DESCRIPTION, val("AlarmDescription")),
        (ACTIONS_ENABLED, val("ActionsEnabled")),
        (ALARM_ACTIONS, val("AlarmActions")),
        (OK_ACTIONS, val("OKActions")),
        (INSUFFICIENT_DATA_ACTIONS, val("InsufficientDataActions")),
        (NAMESPACE, val("Namespace")),
        (METRIC_NAME, val("MetricName")),
        (DIMENSIONS, map("Dimensions", extract::key_values("Name", "Value"))),
        (STATE, val("StateValue")),
        (STATE_MESSAGE, val("StateReason")),
        (UPDATED, time("StateUpdatedTimestamp")),
    ]
});

static DISTRIBUTION_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (ARN, val("ARN")),
        (PUBLIC_DNS, val("DomainName")),
        (COMMENT, val("Comment")),
        (ENABLED, val("Enabled")),
        (HTTP_VERSION, val("HttpVersion")),
        (IPV6_ENABLED, val("IsIPV6Enabled")),
        (MODIFIED, time("LastModifiedTime")),
        (PRICE_CLASS, val("PriceClass")),
        (STATE, val("Status")),
        (WEB_ACL, val("WebACLId")),
        (ALIASES, val("Aliases.Items")),
        (ORIGINS, map("Origins", extract::distribution_origins)),
        (ACM_CERTIFICATE, val("ViewerCertificate.ACMCertificateArn")),
        (CERTIFICATE, val("ViewerCertificate.Certificate")),
        (TLS_VERSION_REQUIRED, val("ViewerCertificate.MinimumProtocolVersion")),
        (SSL_SUPPORT_METHOD, val("ViewerCertificate.SSLSupportMethod")),
    ]
});

static STACK_TABLE: Lazy<Table> = Lazy::new(|| {
    vec![
        (NAME, val("StackName")),
        (DESCRIPTION, val("Description")),
        (STATE, val("StackStatus")),
        (STATE_MESSAGE, val("StackStatusReason")),
        (CREATED, time("CreationTime")),
        (MODIFIED, time("LastUpdatedTime")),
        (CHANGE_SET, val("ChangeSetId")),
        (DISABLE_ROLLBACK, val("DisableRollback")),
        (ROLE, val("RoleARN")),
        (CAPABILITIES, val("Capabilities")),
        (NOTIFICATIONS, val("NotificationARNs")),
        (OUTPUTS, map("Outputs", extract::key_values("OutputKey", "OutputValue"))),
        (PARAMETERS, map("Parameters", extract::key_values("ParameterKey", "ParameterValue"))),
    ]
});

/// Table for the shape of `dto`.
pub fn table_for(dto: &Dto) -> &'static Table {
    match dto {
        Dto::Instance(_) => &INSTANCE_TABLE,
        Dto::Vpc(_) => &VPC_TABLE,
        Dto::Subnet(_) => &SUBNET_TABLE,
        Dto::SecurityGroup(_) => &SECURITY_GROUP_TABLE,
        Dto::KeyPair(_) => &KEY_PAIR_TABLE,
        Dto::Volume(_) => &VOLUME_TABLE,
        Dto::Image(_) => &IMAGE_TABLE,
        Dto::InternetGateway(_) => &INTERNET_GATEWAY_TABLE,
        Dto::NatGateway(_) => &NAT_GATEWAY_TABLE,
        Dto::RouteTable(_) => &ROUTE_TABLE,
        Dto::AvailabilityZone(_) => &AVAILABILITY_ZONE_TABLE,
        Dto::Address(_) => &ELASTIC_IP_TABLE,
        Dto::Snapshot(_) => &SNAPSHOT_TABLE,
        Dto::NetworkInterface(_) => &NETWORK_INTERFACE_TABLE,
        Dto::ClassicLoadBalancer(_) => &CLASSIC_LOAD_BALANCER_TABLE,
        Dto::LoadBalancer(_) => &LOAD_BALANCER_TABLE,
        Dto::TargetGroup(_) => &TARGET_GROUP_TABLE,
        Dto::Listener(_) => &LISTENER_TABLE,
        Dto::DbInstance(_) => &DATABASE_TABLE,
        Dto::DbSubnetGroup(_) => &DB_SUBNET_GROUP_TABLE,
        Dto::LaunchConfiguration(_) => &LAUNCH_CONFIGURATION_TABLE,
        Dto::ScalingGroup(_) => &SCALING_GROUP_TABLE,
        Dto::ScalingPolicy(_) => &SCALING_POLICY_TABLE,
        Dto::Repository(_) => &REPOSITORY_TABLE,
        Dto::Cluster(_) => &CONTAINER_CLUSTER_TABLE,
        Dto::TaskDefinition(_) => &CONTAINER_TASK_TABLE,
        Dto::Container(_) => &CONTAINER_TABLE,
        Dto::ContainerInstance(_) => &CONTAINER_INSTANCE_TABLE,
        Dto::Certificate(_) => &CERTIFICATE_TABLE,
        Dto::User(_) => &USER_TABLE,
        Dto::UserDetail(_) => &USER_DETAIL_TABLE,
        Dto::GroupDetail(_) => &GROUP_DETAIL_TABLE,
        Dto::RoleDetail(_) => &ROLE_DETAIL_TABLE,
        Dto::Policy(_) => &POLICY_TABLE,
        Dto::ManagedPolicyDetail(_) => &MANAGED_POLICY_DETAIL_TABLE,
        Dto::AccessKey(_) => &ACCESS_KEY_TABLE,
        Dto::InstanceProfile(_) => &INSTANCE_PROFILE_TABLE,
        Dto::MfaDevice(_) => &MFA_DEVICE_TABLE,
        Dto::Bucket(_) => &BUCKET_TABLE,
        Dto::Object(_) => &S3_OBJECT_TABLE,
        Dto::Subscription(_) => &SUBSCRIPTION_TABLE,
        Dto::Topic(_) => &TOPIC_TABLE,
        Dto::Queue(_) => &QUEUE_TABLE,
        Dto::HostedZone(_) => &ZONE_TABLE,
        Dto::RecordSet(_) => &RECORD_TABLE,
        Dto::Function(_) => &FUNCTION_TABLE,
        Dto::Metric(_) => &METRIC_TABLE,
        Dto::Alarm(_) => &ALARM_TABLE,
        Dto::Distribution(_) => &DISTRIBUTION_TABLE,
        Dto::Stack(_) => &STACK_TABLE,
    }
}
