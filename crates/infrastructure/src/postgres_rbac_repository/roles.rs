use super::*;

const ROLE_COLUMNS: &str = r#"
    id,
    name,
    name_localized,
    description_localized,
    level,
    is_active,
    is_system,
    is_immutable,
    version,
    created_at,
    updated_at
"#;

impl PostgresRbacRepository {
    pub(super) async fn list_roles_impl(&self) -> AppResult<Vec<RoleAggregate>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM rbac_roles ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        let grant_rows = sqlx::query_as::<_, RoleGrantRow>(
            r#"
            SELECT role_id, permission_id
            FROM rbac_role_permissions
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role grants: {error}")))?;

        let mut grants = group_grants(grant_rows);
        rows.into_iter()
            .map(|row| {
                let role_grants = grants.remove(&row.id).unwrap_or_default();
                role_from_row(row, role_grants)
            })
            .collect()
    }

    pub(super) async fn find_role_impl(&self, role_id: RoleId) -> AppResult<Option<RoleAggregate>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM rbac_roles WHERE id = $1"
        ))
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role '{role_id}': {error}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let grant_rows = sqlx::query_as::<_, RoleGrantRow>(
            r#"
            SELECT role_id, permission_id
            FROM rbac_role_permissions
            WHERE role_id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load grants for role '{role_id}': {error}"))
        })?;

        let grants = grant_rows
            .into_iter()
            .map(|grant| PermissionId::from_uuid(grant.permission_id))
            .collect();

        role_from_row(row, grants).map(Some)
    }

    pub(super) async fn insert_role_impl(&self, role: RoleAggregate) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO rbac_roles (
                id,
                name,
                name_localized,
                description_localized,
                level,
                is_active,
                is_system,
                is_immutable,
                version,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(role.id.as_uuid())
        .bind(role.name.as_str())
        .bind(Json(&role.name_localized))
        .bind(Json(&role.description_localized))
        .bind(i16::from(role.level.value()))
        .bind(role.is_active)
        .bind(role.is_system)
        .bind(role.is_immutable)
        .bind(version_to_i64(role.version)?)
        .bind(role.created_at)
        .bind(role.updated_at)
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_write_error(error, &role))?;

        replace_grants(&mut transaction, &role).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        debug!(role_id = %role.id, role_name = %role.name, "inserted role");
        Ok(())
    }

    pub(super) async fn update_role_impl(
        &self,
        role: RoleAggregate,
        expected_version: u64,
    ) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        let rows_affected = sqlx::query(
            r#"
            UPDATE rbac_roles
            SET
                name = $3,
                name_localized = $4,
                description_localized = $5,
                level = $6,
                is_active = $7,
                is_system = $8,
                is_immutable = $9,
                version = $10,
                updated_at = $11
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(role.id.as_uuid())
        .bind(version_to_i64(expected_version)?)
        .bind(role.name.as_str())
        .bind(Json(&role.name_localized))
        .bind(Json(&role.description_localized))
        .bind(i16::from(role.level.value()))
        .bind(role.is_active)
        .bind(role.is_system)
        .bind(role.is_immutable)
        .bind(version_to_i64(role.version)?)
        .bind(role.updated_at)
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_write_error(error, &role))?
        .rows_affected();

        if rows_affected == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS (SELECT 1 FROM rbac_roles WHERE id = $1)
                "#,
            )
            .bind(role.id.as_uuid())
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to resolve role '{}': {error}", role.id))
            })?;

            if !exists {
                return Err(AppError::NotFound(format!(
                    "role '{}' was not found",
                    role.id
                )));
            }

            warn!(role_id = %role.id, expected_version, "rejected stale role update");
            return Err(AppError::Conflict(format!(
                "role '{}' was modified concurrently",
                role.name
            )));
        }

        sqlx::query(
            r#"
            DELETE FROM rbac_role_permissions
            WHERE role_id = $1
            "#,
        )
        .bind(role.id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to clear grants for role '{}': {error}",
                role.id
            ))
        })?;

        replace_grants(&mut transaction, &role).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        debug!(role_id = %role.id, version = role.version, "updated role");
        Ok(())
    }

    pub(super) async fn delete_role_impl(&self, role_id: RoleId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM rbac_roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if database_code(&error).as_deref() == Some("23503") {
                return AppError::Conflict(format!(
                    "role '{role_id}' is still assigned to at least one user"
                ));
            }

            AppError::Internal(format!("failed to delete role '{role_id}': {error}"))
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        debug!(role_id = %role_id, "deleted role");
        Ok(())
    }
}

async fn replace_grants(
    transaction: &mut Transaction<'_, Postgres>,
    role: &RoleAggregate,
) -> AppResult<()> {
    for permission_id in &role.permissions {
        sqlx::query(
            r#"
            INSERT INTO rbac_role_permissions (role_id, permission_id)
            VALUES ($1, $2)
            ON CONFLICT (role_id, permission_id) DO NOTHING
            "#,
        )
        .bind(role.id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(&mut **transaction)
        .await
        .map_err(|error| map_role_write_error(error, role))?;
    }

    Ok(())
}
