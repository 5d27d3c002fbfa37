use async_trait::async_trait;

use shopfront_core::AppResult;
use shopfront_domain::{
    PermissionAction, PermissionId, PermissionRecord, PermissionResource, RoleAggregate, RoleId,
};

/// Repository port for role aggregates.
///
/// Implementations must run each write's guards and its commit atomically.
/// `user_count` is never persisted; stored roles are returned with zero.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists every stored role.
    async fn list_roles(&self) -> AppResult<Vec<RoleAggregate>>;

    /// Finds one role by identifier.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleAggregate>>;

    /// Inserts a new role.
    ///
    /// Fails with a conflict when the role is active and another active role
    /// carries the same name, or when a referenced permission vanished.
    async fn insert_role(&self, role: RoleAggregate) -> AppResult<()>;

    /// Replaces a stored role when its stored version still equals
    /// `expected_version`.
    ///
    /// Fails with not-found for unknown roles and with a conflict on a stale
    /// version or an active-name collision.
    async fn update_role(&self, role: RoleAggregate, expected_version: u64) -> AppResult<()>;

    /// Permanently removes a role and its grants.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;
}

/// Repository port for permission records.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Lists every stored permission record.
    async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>>;

    /// Finds one record by identifier.
    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionRecord>>;

    /// Finds the record governing a `resource:action` pair.
    async fn find_permission_by_pair(
        &self,
        resource: PermissionResource,
        action: PermissionAction,
    ) -> AppResult<Option<PermissionRecord>>;

    /// Inserts a record, failing with a conflict on a duplicate pair.
    async fn insert_permission(&self, record: PermissionRecord) -> AppResult<()>;

    /// Replaces a record, failing with a conflict on a duplicate pair.
    async fn update_permission(&self, record: PermissionRecord) -> AppResult<()>;

    /// Removes a record, failing with a conflict while any role references it.
    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()>;

    /// Returns true while at least one role references the record.
    async fn is_permission_referenced(&self, permission_id: PermissionId) -> AppResult<bool>;
}

/// Read port onto the user directory that owns role assignments.
#[async_trait]
pub trait RoleMembershipDirectory: Send + Sync {
    /// Counts accounts currently holding the role.
    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64>;
}
