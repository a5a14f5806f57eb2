//! Identity and access shapes, including the account authorization details.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct User {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub arn: Option<String>,
    pub path: Option<String>,
    pub create_date: Option<DateTime<Utc>>,
    pub password_last_used: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserDetail {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub arn: Option<String>,
    pub path: Option<String>,
    pub create_date: Option<DateTime<Utc>>,
    pub group_list: Option<Vec<String>>,
    pub user_policy_list: Option<Vec<PolicyDetail>>,
    pub attached_managed_policies: Option<Vec<AttachedPolicy>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GroupDetail {
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub arn: Option<String>,
    pub path: Option<String>,
    pub create_date: Option<DateTime<Utc>>,
    pub group_policy_list: Option<Vec<PolicyDetail>>,
    pub attached_managed_policies: Option<Vec<AttachedPolicy>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RoleDetail {
    pub role_id: Option<String>,
    pub role_name: Option<String>,
    pub arn: Option<String>,
    pub path: Option<String>,
    pub create_date: Option<DateTime<Utc>>,
    /// URL-encoded JSON document.
    pub assume_role_policy_document: Option<String>,
    pub role_policy_list: Option<Vec<PolicyDetail>>,
    pub attached_managed_policies: Option<Vec<AttachedPolicy>>,
    pub instance_profile_list: Option<Vec<InstanceProfile>>,
}

/// Inline policy of a user, group or role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PolicyDetail {
    pub policy_name: Option<String>,
    pub policy_document: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AttachedPolicy {
    pub policy_arn: Option<String>,
    pub policy_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Policy {
    pub policy_id: Option<String>,
    pub policy_name: Option<String>,
    pub arn: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub default_version_id: Option<String>,
    pub attachment_count: Option<i64>,
    pub is_attachable: Option<bool>,
    pub create_date: Option<DateTime<Utc>>,
    pub update_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ManagedPolicyDetail {
    pub policy_id: Option<String>,
    pub policy_name: Option<String>,
    pub arn: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub default_version_id: Option<String>,
    pub attachment_count: Option<i64>,
    pub is_attachable: Option<bool>,
    pub create_date: Option<DateTime<Utc>>,
    pub update_date: Option<DateTime<Utc>>,
    pub policy_version_list: Option<Vec<PolicyVersion>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PolicyVersion {
    pub version_id: Option<String>,
    /// URL-encoded JSON document.
    pub document: Option<String>,
    pub is_default_version: Option<bool>,
    pub create_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccessKeyMetadata {
    pub access_key_id: Option<String>,
    pub user_name: Option<String>,
    pub status: Option<String>,
    pub create_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InstanceProfile {
    pub instance_profile_id: Option<String>,
    pub instance_profile_name: Option<String>,
    pub arn: Option<String>,
    pub path: Option<String>,
    pub create_date: Option<DateTime<Utc>>,
    pub roles: Option<Vec<ProfileRole>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProfileRole {
    pub role_id: Option<String>,
    pub role_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VirtualMfaDevice {
    pub serial_number: Option<String>,
    pub enable_date: Option<DateTime<Utc>>,
    pub user: Option<User>,
}

/// One page of `GetAccountAuthorizationDetails`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccountAuthorizationDetails {
    pub user_detail_list: Vec<UserDetail>,
    pub group_detail_list: Vec<GroupDetail>,
    pub role_detail_list: Vec<RoleDetail>,
    pub policies: Vec<ManagedPolicyDetail>,
}

impl AccountAuthorizationDetails {
    pub fn extend(&mut self, page: AccountAuthorizationDetails) {
        self.user_detail_list.extend(page.user_detail_list);
        self.group_detail_list.extend(page.group_detail_list);
        self.role_detail_list.extend(page.role_detail_list);
        self.policies.extend(page.policies);
    }
}

/// Entity kinds accepted by the account authorization details filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    User,
    Group,
    Role,
    LocalManagedPolicy,
    AwsManagedPolicy,
}

impl EntityType {
    pub const ALL: &'static [EntityType] = &[
        EntityType::User,
        EntityType::Group,
        EntityType::Role,
        EntityType::LocalManagedPolicy,
        EntityType::AwsManagedPolicy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::User => "User",
            EntityType::Group => "Group",
            EntityType::Role => "Role",
            EntityType::LocalManagedPolicy => "LocalManagedPolicy",
            EntityType::AwsManagedPolicy => "AWSManagedPolicy",
        }
    }
}
