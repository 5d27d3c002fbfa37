use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use shopfront_core::{AppError, AppResult};
use shopfront_domain::{
    PermissionAction, PermissionCatalog, PermissionId, PermissionRecord, PermissionResource,
    RoleAggregate, RoleId,
};

use crate::{
    PermissionRegistry, PermissionRepository, RoleManager, RoleMembershipDirectory,
    RoleRepository,
};

#[derive(Default)]
pub(crate) struct FakeRbacStore {
    roles: Mutex<Vec<RoleAggregate>>,
    permissions: Mutex<Vec<PermissionRecord>>,
    user_counts: Mutex<HashMap<RoleId, u64>>,
}

impl FakeRbacStore {
    pub(crate) async fn add_permission(
        &self,
        resource: PermissionResource,
        action: PermissionAction,
        category: &str,
        is_system: bool,
    ) -> PermissionId {
        let now = Utc::now();
        let id = PermissionId::new();
        self.permissions.lock().await.push(PermissionRecord {
            id,
            resource,
            action,
            name: format!("{resource}:{action}"),
            name_localized: Default::default(),
            description_localized: Default::default(),
            category: category.to_owned(),
            is_active: true,
            is_system,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub(crate) async fn set_user_count(&self, role_id: RoleId, count: u64) {
        self.user_counts.lock().await.insert(role_id, count);
    }

    pub(crate) async fn stored_role(&self, role_id: RoleId) -> Option<RoleAggregate> {
        self.roles
            .lock()
            .await
            .iter()
            .find(|role| role.id == role_id)
            .cloned()
    }

    pub(crate) async fn role_count(&self) -> usize {
        self.roles.lock().await.len()
    }

    pub(crate) async fn permission_count(&self) -> usize {
        self.permissions.lock().await.len()
    }
}

#[async_trait]
impl RoleRepository for FakeRbacStore {
    async fn list_roles(&self) -> AppResult<Vec<RoleAggregate>> {
        Ok(self.roles.lock().await.clone())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleAggregate>> {
        Ok(self.stored_role(role_id).await)
    }

    async fn insert_role(&self, mut role: RoleAggregate) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        if role.is_active
            && roles
                .iter()
                .any(|other| other.is_active && role.name_conflicts_with(other))
        {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.name
            )));
        }

        role.user_count = 0;
        roles.push(role);
        Ok(())
    }

    async fn update_role(&self, mut role: RoleAggregate, expected_version: u64) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        let index = roles
            .iter()
            .position(|stored| stored.id == role.id)
            .ok_or_else(|| AppError::NotFound(format!("role '{}' was not found", role.id)))?;

        if roles[index].version != expected_version {
            return Err(AppError::Conflict("stale role version".to_owned()));
        }

        role.user_count = 0;
        roles[index] = role;
        Ok(())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        let before = roles.len();
        roles.retain(|role| role.id != role_id);
        if roles.len() == before {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for FakeRbacStore {
    async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>> {
        Ok(self.permissions.lock().await.clone())
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionRecord>> {
        Ok(self
            .permissions
            .lock()
            .await
            .iter()
            .find(|record| record.id == permission_id)
            .cloned())
    }

    async fn find_permission_by_pair(
        &self,
        resource: PermissionResource,
        action: PermissionAction,
    ) -> AppResult<Option<PermissionRecord>> {
        Ok(self
            .permissions
            .lock()
            .await
            .iter()
            .find(|record| record.matches(resource, action))
            .cloned())
    }

    async fn insert_permission(&self, record: PermissionRecord) -> AppResult<()> {
        self.permissions.lock().await.push(record);
        Ok(())
    }

    async fn update_permission(&self, record: PermissionRecord) -> AppResult<()> {
        let mut permissions = self.permissions.lock().await;
        if let Some(stored) = permissions.iter_mut().find(|stored| stored.id == record.id) {
            *stored = record;
        }
        Ok(())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        if self.is_permission_referenced(permission_id).await? {
            return Err(AppError::Conflict("permission is referenced".to_owned()));
        }

        self.permissions
            .lock()
            .await
            .retain(|record| record.id != permission_id);
        Ok(())
    }

    async fn is_permission_referenced(&self, permission_id: PermissionId) -> AppResult<bool> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .any(|role| role.permissions.contains(&permission_id)))
    }
}

#[async_trait]
impl RoleMembershipDirectory for FakeRbacStore {
    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        Ok(self
            .user_counts
            .lock()
            .await
            .get(&role_id)
            .copied()
            .unwrap_or_default())
    }
}

pub(crate) fn services() -> (RoleManager, PermissionRegistry, Arc<FakeRbacStore>) {
    let store = Arc::new(FakeRbacStore::default());
    let catalog = Arc::new(PermissionCatalog::standard());
    let role_manager = RoleManager::new(store.clone(), store.clone(), store.clone(), catalog.clone());
    let registry = PermissionRegistry::new(store.clone(), catalog);

    (role_manager, registry, store)
}
