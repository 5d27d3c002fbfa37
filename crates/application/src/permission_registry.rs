use std::sync::Arc;

use chrono::Utc;

use shopfront_core::{AppError, AppResult, ValidationErrors};
use shopfront_domain::{
    PermissionAction, PermissionCatalog, PermissionCategory, PermissionId, PermissionRecord,
    PermissionResource,
};

use crate::rbac_ports::{CreatePermissionInput, PermissionRepository, UpdatePermissionInput};


/// Application service for permission records and the catalog behind them.
#[derive(Clone)]
pub struct PermissionRegistry {
    permissions: Arc<dyn PermissionRepository>,
    catalog: Arc<PermissionCatalog>,
}

impl PermissionRegistry {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(permissions: Arc<dyn PermissionRepository>, catalog: Arc<PermissionCatalog>) -> Self {
        Self {
            permissions,
            catalog,
        }
    }

    /// Returns catalog categories in display order.
    #[must_use]
    pub fn list_categories(&self) -> &[PermissionCategory] {
        self.catalog.list_categories()
    }

    /// Returns the catalog backing this registry.
    #[must_use]
    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    /// Lists stored records ordered by their `resource:action` key.
    pub async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>> {
        let mut records = self.permissions.list_permissions().await?;
        records.sort_by_key(PermissionRecord::key);
        Ok(records)
    }

    /// Returns one record.
    pub async fn get_permission(&self, permission_id: PermissionId) -> AppResult<PermissionRecord> {
        self.permissions
            .find_permission(permission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' was not found"))
            })
    }

    /// Returns the stored record governing a pair.
    pub async fn resolve_permission(
        &self,
        resource: PermissionResource,
        action: PermissionAction,
    ) -> AppResult<PermissionRecord> {
        self.permissions
            .find_permission_by_pair(resource, action)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{resource}:{action}' was not found"))
            })
    }

    /// Creates a record for a pair not yet stored.
    pub async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionRecord> {
        let category = input.category.clone().or_else(|| {
            self.catalog
                .category_of(input.resource, input.action)
                .map(str::to_owned)
        });

        let mut errors = ValidationErrors::new();
        check_display_name(&input.name, &mut errors);
        match category.as_deref() {
            Some(category) => self.check_category(category, &mut errors),
            None => errors.push(
                "category",
                format!(
                    "category is required for '{}:{}', which the catalog does not list",
                    input.resource, input.action
                ),
            ),
        }
        errors.into_result()?;

        self.ensure_pair_unused(input.resource, input.action, None)
            .await?;

        let now = Utc::now();
        let record = PermissionRecord {
            id: PermissionId::new(),
            resource: input.resource,
            action: input.action,
            name: input.name,
            name_localized: input.name_localized.unwrap_or_default(),
            description_localized: input.description_localized.unwrap_or_default(),
            category: category.unwrap_or_default(),
            is_active: input.is_active,
            is_system: input.is_system,
            created_at: now,
            updated_at: now,
        };

        self.permissions.insert_permission(record.clone()).await?;

        Ok(record)
    }

    /// Applies a partial update to a record.
    ///
    /// System records keep their resource and action.
    pub async fn update_permission(
        &self,
        permission_id: PermissionId,
        patch: UpdatePermissionInput,
    ) -> AppResult<PermissionRecord> {
        let mut record = self.get_permission(permission_id).await?;

        let mut errors = ValidationErrors::new();
        if let Some(name) = &patch.name {
            check_display_name(name, &mut errors);
        }
        if let Some(category) = &patch.category {
            self.check_category(category, &mut errors);
        }
        errors.into_result()?;

        let resource = patch.resource.unwrap_or(record.resource);
        let action = patch.action.unwrap_or(record.action);
        let pair_changed = resource != record.resource || action != record.action;

        if pair_changed {
            if record.is_system {
                return Err(AppError::Conflict(format!(
                    "permission '{}' is a system permission; its resource and action cannot change",
                    record.key()
                )));
            }

            self.ensure_pair_unused(resource, action, Some(record.id))
                .await?;
        }

        record.resource = resource;
        record.action = action;
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(name_localized) = patch.name_localized {
            record.name_localized = name_localized;
        }
        if let Some(description_localized) = patch.description_localized {
            record.description_localized = description_localized;
        }
        if let Some(category) = patch.category {
            record.category = category;
        }
        if let Some(is_active) = patch.is_active {
            record.is_active = is_active;
        }
        record.updated_at = Utc::now();

        self.permissions.update_permission(record.clone()).await?;

        Ok(record)
    }

    /// Deletes a record that is neither system-defined nor referenced.
    pub async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let record = self.get_permission(permission_id).await?;

        if record.is_system {
            return Err(AppError::Conflict(format!(
                "permission '{}' is a system permission and cannot be deleted",
                record.key()
            )));
        }

        if self
            .permissions
            .is_permission_referenced(permission_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "permission '{}' is still granted by at least one role",
                record.key()
            )));
        }

        self.permissions.delete_permission(permission_id).await
    }

    /// Stores a system record for every catalog entry not stored yet.
    ///
    /// Returns the number of records created. Running it again is a no-op.
    pub async fn seed_catalog(&self) -> AppResult<usize> {
        let mut created = 0;
        for (category, entry) in self.catalog.entries() {
            if self
                .permissions
                .find_permission_by_pair(entry.resource, entry.action)
                .await?
                .is_some()
            {
                continue;
            }

            let now = Utc::now();
            self.permissions
                .insert_permission(PermissionRecord {
                    id: PermissionId::new(),
                    resource: entry.resource,
                    action: entry.action,
                    name: entry.display_name.clone(),
                    name_localized: Default::default(),
                    description_localized: Default::default(),
                    category: category.to_owned(),
                    is_active: true,
                    is_system: true,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
            created += 1;
        }

        Ok(created)
    }

    fn check_category(&self, category: &str, errors: &mut ValidationErrors) {
        errors.ensure(
            self.catalog.has_category(category),
            "category",
            format!("unknown permission category '{category}'"),
        );
    }

    async fn ensure_pair_unused(
        &self,
        resource: PermissionResource,
        action: PermissionAction,
        except: Option<PermissionId>,
    ) -> AppResult<()> {
        let existing = self
            .permissions
            .find_permission_by_pair(resource, action)
            .await?;

        if let Some(existing) = existing
            && Some(existing.id) != except
        {
            return Err(AppError::Conflict(format!(
                "permission '{resource}:{action}' already exists"
            )));
        }

        Ok(())
    }
}

fn check_display_name(name: &str, errors: &mut ValidationErrors) {
    errors.ensure(
        !name.trim().is_empty(),
        "name",
        "name must not be empty or whitespace",
    );
}
