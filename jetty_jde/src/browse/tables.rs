//! The JDE tables the connector browses.
//!
//! Each table has a fixed column projection and, where needed, a fixed
//! filter. Callers pick a table; they don't get to reshape its query.

use serde::Deserialize;

use super::{Condition, Table, TableQuery};

/// F0092, the user profile table. Only rows with a blank group are
/// users; the rest are group profiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsersTable;

/// A row of [`UsersTable`]
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    /// User id
    #[serde(rename = "F0092_USER")]
    pub user_id: String,
    /// User group (blank for users)
    #[serde(rename = "F0092_UGRP", default)]
    pub group: String,
}

impl Table for UsersTable {
    type Row = UserRow;

    fn query(&self) -> TableQuery {
        TableQuery::new("F0092", &["F0092.USER", "F0092.UGRP"])
            .with_condition(Condition::equal("F0092.UGRP", ""))
    }
}

/// F00926, role descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolesTable;

/// A row of [`RolesTable`]
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoleRow {
    /// Role id
    #[serde(rename = "F00926_USER")]
    pub role_id: String,
    #[serde(rename = "F00926_ROLEDESC", default)]
    pub description: String,
}

impl Table for RolesTable {
    type Row = RoleRow;

    fn query(&self) -> TableQuery {
        TableQuery::new("F00926", &["F00926.USER", "F00926.ROLEDESC"])
    }
}

/// F95921, role relationships, filtered to a single role.
#[derive(Debug, Clone)]
pub struct RoleUsersTable {
    role_id: String,
}

impl RoleUsersTable {
    /// Browse the users assigned to `role_id`.
    pub fn new(role_id: &str) -> Self {
        Self {
            role_id: role_id.to_owned(),
        }
    }
}

/// A row of [`RoleUsersTable`]
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoleUserRow {
    /// The role
    #[serde(rename = "F95921_FRROLE")]
    pub from_role: String,
    /// The user assigned to it
    #[serde(rename = "F95921_TOROLE")]
    pub to_role: String,
}

impl Table for RoleUsersTable {
    type Row = RoleUserRow;

    fn query(&self) -> TableQuery {
        TableQuery::new("F95921", &["F95921.FRROLE", "F95921.TOROLE"])
            .with_condition(Condition::equal("F95921.FRROLE", &self.role_id))
    }
}
