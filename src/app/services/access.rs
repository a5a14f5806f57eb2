//! Identity and access resources. Account-wide, fetched once for the `global` region.

use std::sync::Arc;

use crate::app::cloud::{RelationKind, ResourceType};
use crate::app::config::Config;
use crate::app::convert::new_resource;
use crate::app::dto::iam::{AccountAuthorizationDetails, EntityType};
use crate::app::dto::Dto;
use crate::app::error::FetchError;
use crate::app::fetch::{collect_pages, fan_out, fetch_func, FetchCache, FetchContext, FetchFunc, FetchOutput};
use crate::app::graph::ResourceKey;
use crate::app::provider::Clients;

use super::{list_func, CloudService};

pub const NAME: &str = "access";

pub fn service(config: Arc<Config>, clients: Clients, region: &str) -> CloudService {
    use ResourceType::*;

    let c = &clients;
    let funcs = vec![
        (User, users(c)),
        (Group, details_func(c, |d| d.group_detail_list.iter().cloned().map(Dto::from).collect())),
        (Role, details_func(c, |d| d.role_detail_list.iter().cloned().map(Dto::from).collect())),
        (Policy, details_func(c, |d| d.policies.iter().cloned().map(Dto::from).collect())),
        (AccessKey, access_keys(c)),
        (
            InstanceProfile,
            list_func(InstanceProfile, c, |c, t| async move { c.iam.list_instance_profiles(t).await }),
        ),
        (
            MfaDevice,
            list_func(MfaDevice, c, |c, t| async move { c.iam.list_virtual_mfa_devices(t).await }),
        ),
    ];

    CloudService::new(NAME, region, config, clients, funcs)
}

/// Cache key and entity filter for the account details call.
///
/// A single-type fetch asks only for that type's entities, under its own key. A full
/// fetch asks for everything once and every fetch-func reads from it.
fn details_scope(ctx: &FetchContext) -> (&'static str, &'static [EntityType]) {
    const USERS: &[EntityType] = &[EntityType::User];
    const GROUPS: &[EntityType] = &[EntityType::Group];
    const ROLES: &[EntityType] = &[EntityType::Role];
    const POLICIES: &[EntityType] = &[EntityType::LocalManagedPolicy, EntityType::AwsManagedPolicy];

    match ctx.by_type() {
        Some(ResourceType::User) => ("usersDetails", USERS),
        Some(ResourceType::Group) => ("groupsDetails", GROUPS),
        Some(ResourceType::Role) => ("rolesDetails", ROLES),
        Some(ResourceType::Policy) => ("policiesDetails", POLICIES),
        _ => ("accountDetails", EntityType::ALL),
    }
}

async fn account_details(
    ctx: &FetchContext,
    cache: &FetchCache,
    clients: &Clients,
) -> Result<Arc<AccountAuthorizationDetails>, FetchError> {
    let (key, entities) = details_scope(ctx);
    cache
        .get(key, || async {
            let pages = collect_pages(ctx, |t| clients.iam.get_account_authorization_details(entities, t)).await?;
            let mut details = AccountAuthorizationDetails::default();
            for page in pages {
                details.extend(page);
            }
            trace_debug!(
                "account details: {} users, {} groups, {} roles, {} policies",
                details.user_detail_list.len(),
                details.group_detail_list.len(),
                details.role_detail_list.len(),
                details.policies.len()
            );
            Ok(details)
        })
        .await
}

/// Fetch-func converting one list of the account details.
fn details_func<S>(clients: &Clients, select: S) -> FetchFunc
where
    S: Fn(&AccountAuthorizationDetails) -> Vec<Dto> + Send + Sync + 'static,
{
    let clients = clients.clone();
    let select = Arc::new(select);
    fetch_func(move |ctx, cache| {
        let clients = clients.clone();
        let select = select.clone();
        async move {
            let details = match account_details(&ctx, &cache, &clients).await {
                Ok(details) => details,
                Err(e) => return FetchOutput::failed(e),
            };
            let mut output = FetchOutput::default();
            for dto in select(&details) {
                output.push(dto).await;
            }
            output
        }
    })
}

/// Users from the account details, completed by `ListUsers` which also reports the
/// password last use. Only the details are kept as objects.
fn users(clients: &Clients) -> FetchFunc {
    let clients = clients.clone();
    fetch_func(move |ctx, cache| {
        let clients = clients.clone();
        async move {
            let (details, listed) = futures::join!(
                account_details(&ctx, &cache, &clients),
                collect_pages(&ctx, |t| clients.iam.list_users(t)),
            );

            let mut output = FetchOutput::default();
            match details {
                Ok(details) => {
                    for user in details.user_detail_list.iter().cloned() {
                        output.push(user.into()).await;
                    }
                }
                Err(e) => output.error.add(e),
            }
            match listed {
                Ok(listed) => {
                    for user in listed {
                        let (res, errors) = new_resource(&Dto::from(user)).await;
                        output.error.add(errors);
                        output.resources.push(res);
                    }
                }
                Err(e) => output.error.add(e),
            }
            output
        }
    })
}

fn access_keys(clients: &Clients) -> FetchFunc {
    let clients = clients.clone();
    fetch_func(move |ctx, _cache| {
        let clients = clients.clone();
        async move {
            let users = match collect_pages(&ctx, |t| clients.iam.list_users(t)).await {
                Ok(users) => users,
                Err(e) => return FetchOutput::failed(e),
            };

            let clients = &clients;
            let per_user = fan_out(&ctx, users, |ctx, user| async move {
                let name = user.user_name.unwrap_or_default();
                let keys = collect_pages(&ctx, |t| clients.iam.list_access_keys(&name, t)).await?;
                Ok((user.user_id.unwrap_or_default(), keys))
            })
            .await;

            let per_user = match per_user {
                Ok(per_user) => per_user,
                Err(e) => return FetchOutput::failed(e),
            };

            let mut output = FetchOutput::default();
            for (user_id, keys) in per_user {
                for key in keys {
                    let dto = Dto::from(key);
                    let (mut res, errors) = new_resource(&dto).await;
                    res.add_relation(RelationKind::ChildOf, ResourceKey::new(ResourceType::User, user_id.as_str()));
                    output.push_converted(res, dto, errors);
                }
            }
            output
        }
    })
}
