use async_trait::async_trait;
use sqlx::PgPool;

use shopfront_application::RoleMembershipDirectory;
use shopfront_core::{AppError, AppResult};
use shopfront_domain::RoleId;

/// PostgreSQL-backed view over user role assignments.
#[derive(Clone)]
pub struct PostgresRoleMembershipDirectory {
    pool: PgPool,
}

impl PostgresRoleMembershipDirectory {
    /// Creates a directory with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleMembershipDirectory for PostgresRoleMembershipDirectory {
    async fn count_users_with_role(&self, role_id: RoleId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT subject)
            FROM user_roles
            WHERE role_id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to count users holding role '{role_id}': {error}"
            ))
        })?;

        u64::try_from(count).map_err(|error| {
            AppError::Internal(format!("invalid user count for role '{role_id}': {error}"))
        })
    }
}
