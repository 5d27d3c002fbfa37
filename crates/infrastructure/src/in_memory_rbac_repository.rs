use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use shopfront_application::{PermissionRepository, RoleMembershipDirectory, RoleRepository};
use shopfront_core::{AppError, AppResult};
use shopfront_domain::{
    PermissionAction, PermissionId, PermissionRecord, PermissionResource, RoleAggregate, RoleId,
};
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[cfg(test)]
mod tests;

#[derive(Debug, Default)]
struct RbacState {
    roles: HashMap<RoleId, RoleAggregate>,
    permissions: HashMap<PermissionId, PermissionRecord>,
    assignments: HashMap<RoleId, HashSet<String>>,
}

impl RbacState {
    fn active_name_taken(&self, role: &RoleAggregate) -> bool {
        role.is_active
            && self
                .roles
                .values()
                .any(|other| other.is_active && role.name_conflicts_with(other))
    }

    fn missing_permission(&self, role: &RoleAggregate) -> Option<PermissionId> {
        role.permissions
            .iter()
            .copied()
            .find(|permission_id| !self.permissions.contains_key(permission_id))
    }

    fn pair_taken(&self, record: &PermissionRecord) -> bool {
        self.permissions.values().any(|other| {
            other.id != record.id && other.matches(record.resource, record.action)
        })
    }

    fn assigned_users(&self, role_id: RoleId) -> usize {
        self.assignments.get(&role_id).map_or(0, HashSet::len)
    }

    fn is_referenced(&self, permission_id: PermissionId) -> bool {
        self.roles
            .values()
            .any(|role| role.permissions.contains(&permission_id))
    }

    fn check_role_write(&self, role: &RoleAggregate) -> AppResult<()> {
        if self.active_name_taken(role) {
            warn!(role_name = %role.name, "rejected role write on active name collision");
            return Err(AppError::Conflict(format!(
                "an active role named '{}' already exists",
                role.name
            )));
        }

        if let Some(permission_id) = self.missing_permission(role) {
            return Err(AppError::Conflict(format!(
                "permission '{permission_id}' no longer exists"
            )));
        }

        Ok(())
    }
}

/// In-memory role, permission and role assignment store.
///
/// All collections sit behind one lock so every guard and its commit run
/// atomically.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    state: RwLock<RbacState>,
}

impl InMemoryRbacRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RbacState::default()),
        }
    }

    /// Assigns a role to a subject. Repeated assignments are ignored.
    pub async fn assign(&self, role_id: RoleId, subject: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        let inserted = state
            .assignments
            .entry(role_id)
            .or_default()
            .insert(subject.to_owned());
        if inserted {
            debug!(role_id = %role_id, subject, "assigned role");
        }

        Ok(())
    }

    /// Removes a role from a subject.
    pub async fn unassign(&self, role_id: RoleId, subject: &str) {
        let mut state = self.state.write().await;
        if let Some(subjects) = state.assignments.get_mut(&role_id) {
            subjects.remove(subject);
            if subjects.is_empty() {
                state.assignments.remove(&role_id);
            }
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryRbacRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleAggregate>> {
        let state = self.state.read().await;
        let mut roles: Vec<RoleAggregate> = state.roles.values().cloned().collect();
        roles.sort_by(|left, right| left.name.cmp(&right.name));

        Ok(roles)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleAggregate>> {
        Ok(self.state.read().await.roles.get(&role_id).cloned())
    }

    async fn insert_role(&self, mut role: RoleAggregate) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state.roles.contains_key(&role.id) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.id
            )));
        }
        state.check_role_write(&role)?;

        role.user_count = 0;
        debug!(role_id = %role.id, role_name = %role.name, "inserted role");
        state.roles.insert(role.id, role);
        Ok(())
    }

    async fn update_role(&self, mut role: RoleAggregate, expected_version: u64) -> AppResult<()> {
        let mut state = self.state.write().await;

        let stored_version = state
            .roles
            .get(&role.id)
            .map(|stored| stored.version)
            .ok_or_else(|| AppError::NotFound(format!("role '{}' was not found", role.id)))?;

        if stored_version != expected_version {
            warn!(
                role_id = %role.id,
                expected_version,
                stored_version,
                "rejected stale role update"
            );
            return Err(AppError::Conflict(format!(
                "role '{}' was modified concurrently",
                role.name
            )));
        }
        state.check_role_write(&role)?;

        role.user_count = 0;
        debug!(role_id = %role.id, version = role.version, "updated role");
        state.roles.insert(role.id, role);
        Ok(())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;

        let assigned_users = state.assigned_users(role_id);
        if assigned_users > 0 {
            warn!(role_id = %role_id, assigned_users, "rejected delete of assigned role");
            return Err(AppError::Conflict(format!(
                "role '{role_id}' is still assigned to {assigned_users} user(s)"
            )));
        }

        if state.roles.remove(&role_id).is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        debug!(role_id = %role_id, "deleted role");
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for InMemoryRbacRepository {
    async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<PermissionRecord> = state.permissions.values().cloned().collect();
        records.sort_by_key(PermissionRecord::key);

        Ok(records)
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionRecord>> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .get(&permission_id)
            .cloned())
    }

    async fn find_permission_by_pair(
        &self,
        resource: PermissionResource,
        action: PermissionAction,
    ) -> AppResult<Option<PermissionRecord>> {
        Ok(self
            .state
            .read()
            .await
            .permissions
            .values()
            .find(|record| record.matches(resource, action))
            .cloned())
    }

    async fn insert_permission(&self, record: PermissionRecord) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state.pair_taken(&record) || state.permissions.contains_key(&record.id) {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                record.key()
            )));
        }

        debug!(permission = %record.key(), "inserted permission");
        state.permissions.insert(record.id, record);
        Ok(())
    }

    async fn update_permission(&self, record: PermissionRecord) -> AppResult<()> {
        let mut state = self.state.write().await;

        if !state.permissions.contains_key(&record.id) {
            return Err(AppError::NotFound(format!(
                "permission '{}' was not found",
                record.id
            )));
        }

        if state.pair_taken(&record) {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                record.key()
            )));
        }

        debug!(permission = %record.key(), "updated permission");
        state.permissions.insert(record.id, record);
        Ok(())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state.is_referenced(permission_id) {
            warn!(permission_id = %permission_id, "rejected delete of referenced permission");
            return Err(AppError::Conflict(format!(
                "permission '{permission_id}' is still granted by at least one role"
            )));
        }

        if state.permissions.remove(&permission_id).is_none() {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' was not found"
            )));
        }

        debug!(permission_id = %permission_id, "deleted permission");
        Ok(())
    }

    async fn is_permission_referenced(&self, permission_id: PermissionId) -> AppResult<bool> {
        Ok(self.state.read().await.is_referenced(permission_id))
    }
}

#[async_trait]
impl RoleMembershipDirectory for InMemoryRbacRepository {
    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        let count = self.state.read().await.assigned_users(role_id);

        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
