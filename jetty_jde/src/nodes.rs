//! Map JDE rows onto Jetty resources, entitlements, and grants.

use std::collections::{BTreeMap, BTreeSet};

use jetty_core::connectors::nodes::{
    ConnectorData, RawEntitlement, RawGrant, RawResource, RawResourceType, ResourceId,
    ResourceTrait, UserStatus,
};

use crate::browse::{RoleRow, RoleUserRow, UserRow};

pub(crate) const USER_TYPE: &str = "user";
pub(crate) const ROLE_TYPE: &str = "role";
/// Slug of the role membership entitlement
pub(crate) const ROLE_MEMBERSHIP: &str = "member";

/// A role along with the rows assigning users to it.
pub(crate) struct RoleMembers {
    pub(crate) role: RoleRow,
    pub(crate) members: Vec<RoleUserRow>,
}

pub(crate) fn resource_types() -> Vec<RawResourceType> {
    vec![
        RawResourceType::new(USER_TYPE, "User", BTreeSet::from([ResourceTrait::User])),
        RawResourceType::new(ROLE_TYPE, "Role", BTreeSet::from([ResourceTrait::Role])),
    ]
}

/// Every JDE user is reported as enabled.
pub(crate) fn user_resource(user_id: &str) -> RawResource {
    RawResource::new(
        ResourceId::new(USER_TYPE, user_id),
        user_id.to_owned(),
        BTreeMap::from([("user_id".to_owned(), user_id.to_owned())]),
        Some(UserStatus::Enabled),
    )
}

pub(crate) fn role_resource(role: &RoleRow) -> RawResource {
    RawResource::new(
        ResourceId::new(ROLE_TYPE, &role.role_id),
        role.role_id.to_owned(),
        BTreeMap::from([
            ("role_id".to_owned(), role.role_id.to_owned()),
            ("role_description".to_owned(), role.description.to_owned()),
        ]),
        None,
    )
}

pub(crate) fn role_entitlement(role: &RawResource) -> RawEntitlement {
    RawEntitlement::assignment(
        role.id.clone(),
        ROLE_MEMBERSHIP,
        format!("{} Role {ROLE_MEMBERSHIP}", role.display_name),
        format!(
            "Member of {} role in JD Edwards EnterpriseOne",
            role.display_name
        ),
        BTreeSet::from([USER_TYPE.to_owned()]),
    )
}

pub(crate) fn role_grants(role: &RawResource, members: &[RoleUserRow]) -> Vec<RawGrant> {
    members
        .iter()
        .map(|m| {
            RawGrant::new(
                &role.id,
                ROLE_MEMBERSHIP,
                ResourceId::new(USER_TYPE, &m.to_role),
            )
        })
        .collect()
}

pub(crate) fn connector_data(users: &[UserRow], roles: &[RoleMembers]) -> ConnectorData {
    let mut resources: Vec<_> = users.iter().map(|u| user_resource(&u.user_id)).collect();
    let mut entitlements = vec![];
    let mut grants = vec![];

    for RoleMembers { role, members } in roles {
        let role_resource = role_resource(role);
        entitlements.push(role_entitlement(&role_resource));
        grants.extend(role_grants(&role_resource, members));
        resources.push(role_resource);
    }

    ConnectorData::new(resource_types(), resources, entitlements, grants)
}
