use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LaunchConfiguration {
    #[serde(rename = "LaunchConfigurationARN")]
    pub launch_configuration_arn: Option<String>,
    pub launch_configuration_name: Option<String>,
    pub image_id: Option<String>,
    pub instance_type: Option<String>,
    pub key_name: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub security_groups: Option<Vec<String>>,
    pub spot_price: Option<String>,
    pub user_data: Option<String>,
    pub iam_instance_profile: Option<String>,
    pub associate_public_ip_address: Option<bool>,
}

/// Auto scaling group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Group {
    #[serde(rename = "AutoScalingGroupARN")]
    pub auto_scaling_group_arn: Option<String>,
    pub auto_scaling_group_name: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub default_cooldown: Option<i64>,
    pub desired_capacity: Option<i64>,
    pub health_check_grace_period: Option<i64>,
    pub health_check_type: Option<String>,
    pub launch_configuration_name: Option<String>,
    pub max_size: Option<i64>,
    pub min_size: Option<i64>,
    pub new_instances_protected_from_scale_in: Option<bool>,
    pub status: Option<String>,
    pub availability_zones: Option<Vec<String>>,
    pub instances: Option<Vec<GroupInstance>>,
    #[serde(rename = "TargetGroupARNs")]
    pub target_group_arns: Option<Vec<String>>,
    /// Comma separated subnet ids.
    #[serde(rename = "VPCZoneIdentifier")]
    pub vpc_zone_identifier: Option<String>,
    pub tags: Option<Vec<TagDescription>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GroupInstance {
    pub instance_id: Option<String>,
    pub availability_zone: Option<String>,
    pub health_status: Option<String>,
    pub lifecycle_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TagDescription {
    pub key: Option<String>,
    pub value: Option<String>,
    pub resource_id: Option<String>,
    pub propagate_at_launch: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ScalingPolicy {
    #[serde(rename = "PolicyARN")]
    pub policy_arn: Option<String>,
    pub policy_name: Option<String>,
    pub policy_type: Option<String>,
    pub adjustment_type: Option<String>,
    pub auto_scaling_group_name: Option<String>,
    pub cooldown: Option<i64>,
    pub scaling_adjustment: Option<i64>,
    pub alarms: Option<Vec<Alarm>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Alarm {
    #[serde(rename = "AlarmARN")]
    pub alarm_arn: Option<String>,
    pub alarm_name: Option<String>,
}
