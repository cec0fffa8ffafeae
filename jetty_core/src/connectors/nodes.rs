//! Nodes to be recieved from connectors
//!
//! Connectors describe the systems they sync as a set of resources
//! (users, roles, ...), the entitlements those resources offer, and the
//! grants of those entitlements to principals.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Identifies a resource within a connector: its type and its id.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId {
    /// Id of the resource type (e.g. `user`)
    pub resource_type: String,
    /// Id of the resource, unique for its type
    pub resource: String,
}

impl ResourceId {
    /// Basic constructor
    pub fn new(resource_type: &str, resource: &str) -> Self {
        Self {
            resource_type: resource_type.to_owned(),
            resource: resource.to_owned(),
        }
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.resource)
    }
}

/// The kind of thing a resource type models.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceTrait {
    /// A person or account
    User,
    /// A role that users can be assigned to
    Role,
}

/// Status of a user account
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    /// The account can be used
    Enabled,
    /// The account is disabled
    Disabled,
    /// The connector can't tell
    #[default]
    Unspecified,
}

/// A type of resource a connector syncs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResourceType {
    /// Id of the type, referenced by [`ResourceId::resource_type`]
    pub id: String,
    /// Display name for the type
    pub display_name: String,
    /// What the type models
    pub traits: BTreeSet<ResourceTrait>,
}

impl RawResourceType {
    /// Basic constructor
    pub fn new(id: &str, display_name: &str, traits: BTreeSet<ResourceTrait>) -> Self {
        Self {
            id: id.to_owned(),
            display_name: display_name.to_owned(),
            traits,
        }
    }
}

/// Resource data provided by connectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResource {
    /// Resource id
    pub id: ResourceId,
    /// Display name
    pub display_name: String,
    /// K-V pairs of resource-specific profile data
    pub profile: BTreeMap<String, String>,
    /// Account status, for resources with the user trait
    pub status: Option<UserStatus>,
}

impl RawResource {
    /// Basic constructor
    pub fn new(
        id: ResourceId,
        display_name: String,
        profile: BTreeMap<String, String>,
        status: Option<UserStatus>,
    ) -> Self {
        Self {
            id,
            display_name,
            profile,
            status,
        }
    }
}

/// What granting an entitlement means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntitlementPurpose {
    /// Membership or assignment (e.g. member of a role)
    Assignment,
}

/// An entitlement offered by a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntitlement {
    /// The resource offering the entitlement
    pub resource: ResourceId,
    /// Short name, unique per resource (e.g. `member`)
    pub slug: String,
    /// Display name
    pub display_name: String,
    /// Description
    pub description: String,
    /// Ids of the resource types this can be granted to
    pub grantable_to: BTreeSet<String>,
    /// What the entitlement means
    pub purpose: EntitlementPurpose,
}

impl RawEntitlement {
    /// Build an assignment entitlement.
    pub fn assignment(
        resource: ResourceId,
        slug: &str,
        display_name: String,
        description: String,
        grantable_to: BTreeSet<String>,
    ) -> Self {
        Self {
            resource,
            slug: slug.to_owned(),
            display_name,
            description,
            grantable_to,
            purpose: EntitlementPurpose::Assignment,
        }
    }

    /// Globally unique id of the entitlement: `<type>:<resource>:<slug>`
    pub fn id(&self) -> String {
        entitlement_id(&self.resource, &self.slug)
    }
}

/// Build the id for the entitlement `slug` on `resource`.
pub fn entitlement_id(resource: &ResourceId, slug: &str) -> String {
    format!("{resource}:{slug}")
}

/// A grant of an entitlement to a principal
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawGrant {
    /// Id of the granted entitlement (see [`RawEntitlement::id`])
    pub entitlement: String,
    /// The principal holding the entitlement
    pub principal: ResourceId,
}

impl RawGrant {
    /// Grant `slug` on `resource` to `principal`.
    pub fn new(resource: &ResourceId, slug: &str, principal: ResourceId) -> Self {
        Self {
            entitlement: entitlement_id(resource, slug),
            principal,
        }
    }
}

/// Container for all node data for a given connector
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorData {
    /// All resource types the connector syncs
    pub resource_types: Vec<RawResourceType>,
    /// All resources in the connector
    pub resources: Vec<RawResource>,
    /// All entitlements in the connector
    pub entitlements: Vec<RawEntitlement>,
    /// All grants in the connector
    pub grants: Vec<RawGrant>,
}

impl ConnectorData {
    /// Basic constructor
    pub fn new(
        resource_types: Vec<RawResourceType>,
        resources: Vec<RawResource>,
        entitlements: Vec<RawEntitlement>,
        grants: Vec<RawGrant>,
    ) -> Self {
        Self {
            resource_types,
            resources,
            entitlements,
            grants,
        }
    }

    /// Resources of the given type
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = &'a RawResource> + 'a {
        self.resources
            .iter()
            .filter(move |r| r.id.resource_type == resource_type)
    }
}
