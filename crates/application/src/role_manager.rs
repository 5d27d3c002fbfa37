use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use shopfront_core::{AppError, AppResult, ValidationErrors};
use shopfront_domain::{
    CategoryGroup, PermissionCatalog, PermissionId, RoleAggregate, RoleId, RoleLevel,
    group_by_category,
};

use crate::rbac_ports::{
    CloneRoleInput, CreateRoleInput, PermissionRepository, RoleMembershipDirectory,
    RoleRepository, UpdateRoleInput,
};

mod clone;
mod create;
mod delete;
mod queries;
mod update;

#[cfg(test)]
mod tests;

/// Application service owning the role aggregate lifecycle.
///
/// Every operation validates against the current collections and commits
/// once; nothing is written when a check fails.
#[derive(Clone)]
pub struct RoleManager {
    roles: Arc<dyn RoleRepository>,
    permissions: Arc<dyn PermissionRepository>,
    memberships: Arc<dyn RoleMembershipDirectory>,
    catalog: Arc<PermissionCatalog>,
}

impl RoleManager {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        permissions: Arc<dyn PermissionRepository>,
        memberships: Arc<dyn RoleMembershipDirectory>,
        catalog: Arc<PermissionCatalog>,
    ) -> Self {
        Self {
            roles,
            permissions,
            memberships,
            catalog,
        }
    }

    async fn load_role(&self, role_id: RoleId) -> AppResult<RoleAggregate> {
        let mut role = self
            .roles
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        role.user_count = self.memberships.count_users_with_role(role_id).await?;

        Ok(role)
    }

    async fn check_permission_ids(
        &self,
        permission_ids: &BTreeSet<PermissionId>,
        errors: &mut ValidationErrors,
    ) -> AppResult<()> {
        if permission_ids.is_empty() {
            return Ok(());
        }

        let known: BTreeSet<PermissionId> = self
            .permissions
            .list_permissions()
            .await?
            .into_iter()
            .map(|record| record.id)
            .collect();

        for permission_id in permission_ids.difference(&known) {
            errors.push(
                "permission_ids",
                format!("permission '{permission_id}' does not exist"),
            );
        }

        Ok(())
    }

    async fn ensure_name_unused(&self, name: &str) -> AppResult<()> {
        let taken = self
            .roles
            .list_roles()
            .await?
            .iter()
            .any(|role| role.name == name);

        if taken {
            return Err(AppError::Conflict(format!("role '{name}' already exists")));
        }

        Ok(())
    }
}
