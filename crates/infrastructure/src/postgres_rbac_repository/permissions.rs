use super::*;

const PERMISSION_COLUMNS: &str = r#"
    id,
    resource,
    action,
    name,
    name_localized,
    description_localized,
    category,
    is_active,
    is_system,
    created_at,
    updated_at
"#;

impl PostgresRbacRepository {
    pub(super) async fn list_permissions_impl(&self) -> AppResult<Vec<PermissionRecord>> {
        let rows = sqlx::query_as::<_, PermissionRow>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM rbac_permissions ORDER BY resource, action"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        rows.into_iter().map(permission_from_row).collect()
    }

    pub(super) async fn find_permission_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionRecord>> {
        let row = sqlx::query_as::<_, PermissionRow>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM rbac_permissions WHERE id = $1"
        ))
        .bind(permission_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find permission '{permission_id}': {error}"
            ))
        })?;

        row.map(permission_from_row).transpose()
    }

    pub(super) async fn find_permission_by_pair_impl(
        &self,
        resource: PermissionResource,
        action: PermissionAction,
    ) -> AppResult<Option<PermissionRecord>> {
        let row = sqlx::query_as::<_, PermissionRow>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM rbac_permissions WHERE resource = $1 AND action = $2"
        ))
        .bind(resource.as_str())
        .bind(action.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find permission '{resource}:{action}': {error}"
            ))
        })?;

        row.map(permission_from_row).transpose()
    }

    pub(super) async fn insert_permission_impl(&self, record: PermissionRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rbac_permissions (
                id,
                resource,
                action,
                name,
                name_localized,
                description_localized,
                category,
                is_active,
                is_system,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.resource.as_str())
        .bind(record.action.as_str())
        .bind(record.name.as_str())
        .bind(Json(&record.name_localized))
        .bind(Json(&record.description_localized))
        .bind(record.category.as_str())
        .bind(record.is_active)
        .bind(record.is_system)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| map_permission_write_error(error, &record))?;

        debug!(permission = %record.key(), "inserted permission");
        Ok(())
    }

    pub(super) async fn update_permission_impl(&self, record: PermissionRecord) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE rbac_permissions
            SET
                resource = $2,
                action = $3,
                name = $4,
                name_localized = $5,
                description_localized = $6,
                category = $7,
                is_active = $8,
                is_system = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.resource.as_str())
        .bind(record.action.as_str())
        .bind(record.name.as_str())
        .bind(Json(&record.name_localized))
        .bind(Json(&record.description_localized))
        .bind(record.category.as_str())
        .bind(record.is_active)
        .bind(record.is_system)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| map_permission_write_error(error, &record))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{}' was not found",
                record.id
            )));
        }

        debug!(permission = %record.key(), "updated permission");
        Ok(())
    }

    pub(super) async fn delete_permission_impl(&self, permission_id: PermissionId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM rbac_permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if database_code(&error).as_deref() == Some("23503") {
                warn!(permission_id = %permission_id, "rejected delete of referenced permission");
                return AppError::Conflict(format!(
                    "permission '{permission_id}' is still granted by at least one role"
                ));
            }

            AppError::Internal(format!(
                "failed to delete permission '{permission_id}': {error}"
            ))
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' was not found"
            )));
        }

        debug!(permission_id = %permission_id, "deleted permission");
        Ok(())
    }

    pub(super) async fn is_permission_referenced_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM rbac_role_permissions
                WHERE permission_id = $1
            )
            "#,
        )
        .bind(permission_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to check references for permission '{permission_id}': {error}"
            ))
        })
    }
}
