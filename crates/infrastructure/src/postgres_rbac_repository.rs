use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::{debug, warn};

use shopfront_application::{PermissionRepository, RoleRepository};
use shopfront_core::{AppError, AppResult};
use shopfront_domain::{
    LocalizedText, PermissionAction, PermissionId, PermissionRecord, PermissionResource,
    RoleAggregate, RoleId, RoleLevel,
};

mod permissions;
mod roles;


/// PostgreSQL-backed repository for roles and permission records.
///
/// Active-name uniqueness, grant referential integrity and version checks are
/// enforced by the schema and by conditional writes inside one transaction.
#[derive(Clone)]
pub struct PostgresRbacRepository {
    pool: PgPool,
}

impl PostgresRbacRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: uuid::Uuid,
    name: String,
    name_localized: Json<LocalizedText>,
    description_localized: Json<LocalizedText>,
    level: i16,
    is_active: bool,
    is_system: bool,
    is_immutable: bool,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct RoleGrantRow {
    role_id: uuid::Uuid,
    permission_id: uuid::Uuid,
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: uuid::Uuid,
    resource: String,
    action: String,
    name: String,
    name_localized: Json<LocalizedText>,
    description_localized: Json<LocalizedText>,
    category: String,
    is_active: bool,
    is_system: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl RoleRepository for PostgresRbacRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleAggregate>> {
        self.list_roles_impl().await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleAggregate>> {
        self.find_role_impl(role_id).await
    }

    async fn insert_role(&self, role: RoleAggregate) -> AppResult<()> {
        self.insert_role_impl(role).await
    }

    async fn update_role(&self, role: RoleAggregate, expected_version: u64) -> AppResult<()> {
        self.update_role_impl(role, expected_version).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.delete_role_impl(role_id).await
    }
}

#[async_trait]
impl PermissionRepository for PostgresRbacRepository {
    async fn list_permissions(&self) -> AppResult<Vec<PermissionRecord>> {
        self.list_permissions_impl().await
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionRecord>> {
        self.find_permission_impl(permission_id).await
    }

    async fn find_permission_by_pair(
        &self,
        resource: PermissionResource,
        action: PermissionAction,
    ) -> AppResult<Option<PermissionRecord>> {
        self.find_permission_by_pair_impl(resource, action).await
    }

    async fn insert_permission(&self, record: PermissionRecord) -> AppResult<()> {
        self.insert_permission_impl(record).await
    }

    async fn update_permission(&self, record: PermissionRecord) -> AppResult<()> {
        self.update_permission_impl(record).await
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.delete_permission_impl(permission_id).await
    }

    async fn is_permission_referenced(&self, permission_id: PermissionId) -> AppResult<bool> {
        self.is_permission_referenced_impl(permission_id).await
    }
}

fn role_from_row(row: RoleRow, grants: BTreeSet<PermissionId>) -> AppResult<RoleAggregate> {
    let level = RoleLevel::new(i64::from(row.level)).map_err(|error| {
        AppError::Internal(format!("stored level for role '{}' is invalid: {error}", row.id))
    })?;
    let version = u64::try_from(row.version).map_err(|error| {
        AppError::Internal(format!(
            "stored version for role '{}' is invalid: {error}",
            row.id
        ))
    })?;

    Ok(RoleAggregate {
        id: RoleId::from_uuid(row.id),
        name: row.name,
        name_localized: row.name_localized.0,
        description_localized: row.description_localized.0,
        level,
        is_active: row.is_active,
        is_system: row.is_system,
        is_immutable: row.is_immutable,
        permissions: grants,
        user_count: 0,
        version,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn group_grants(rows: Vec<RoleGrantRow>) -> HashMap<uuid::Uuid, BTreeSet<PermissionId>> {
    let mut grants: HashMap<uuid::Uuid, BTreeSet<PermissionId>> = HashMap::new();
    for row in rows {
        grants
            .entry(row.role_id)
            .or_default()
            .insert(PermissionId::from_uuid(row.permission_id));
    }

    grants
}

fn permission_from_row(row: PermissionRow) -> AppResult<PermissionRecord> {
    let resource = PermissionResource::from_str(row.resource.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "stored resource '{}' for permission '{}' is invalid: {error}",
            row.resource, row.id
        ))
    })?;
    let action = PermissionAction::from_str(row.action.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "stored action '{}' for permission '{}' is invalid: {error}",
            row.action, row.id
        ))
    })?;

    Ok(PermissionRecord {
        id: PermissionId::from_uuid(row.id),
        resource,
        action,
        name: row.name,
        name_localized: row.name_localized.0,
        description_localized: row.description_localized.0,
        category: row.category,
        is_active: row.is_active,
        is_system: row.is_system,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn version_to_i64(version: u64) -> AppResult<i64> {
    i64::try_from(version)
        .map_err(|error| AppError::Internal(format!("role version is out of range: {error}")))
}

fn database_code(error: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(database_error) = error {
        return database_error.code().map(|code| code.into_owned());
    }

    None
}

fn map_role_write_error(error: sqlx::Error, role: &RoleAggregate) -> AppError {
    match database_code(&error).as_deref() {
        Some("23505") => {
            warn!(role_name = %role.name, "rejected role write on active name collision");
            AppError::Conflict(format!("an active role named '{}' already exists", role.name))
        }
        Some("23503") => AppError::Conflict(format!(
            "role '{}' references a permission that no longer exists",
            role.name
        )),
        _ => AppError::Internal(format!("failed to persist role '{}': {error}", role.id)),
    }
}

fn map_permission_write_error(error: sqlx::Error, record: &PermissionRecord) -> AppError {
    if database_code(&error).as_deref() == Some("23505") {
        return AppError::Conflict(format!("permission '{}' already exists", record.key()));
    }

    AppError::Internal(format!(
        "failed to persist permission '{}': {error}",
        record.key()
    ))
}
