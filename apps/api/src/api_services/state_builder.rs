use std::sync::Arc;

use shopfront_application::{
    PermissionRegistry, PermissionRepository, RoleManager, RoleMembershipDirectory,
    RoleRepository,
};
use shopfront_core::AppError;
use shopfront_domain::PermissionCatalog;
use shopfront_infrastructure::{
    InMemoryRbacRepository, PostgresRbacRepository, PostgresRoleMembershipDirectory,
};
use sqlx::PgPool;
use tracing::info;

use crate::state::AppState;

pub fn build_in_memory_state() -> AppState {
    let repository = Arc::new(InMemoryRbacRepository::new());
    assemble(repository.clone(), repository, "memory")
}

pub fn build_postgres_state(pool: PgPool) -> AppState {
    assemble(
        Arc::new(PostgresRbacRepository::new(pool.clone())),
        Arc::new(PostgresRoleMembershipDirectory::new(pool)),
        "postgres",
    )
}

/// Materializes missing catalog entries as system permission records.
pub async fn seed_permission_catalog(state: &AppState) -> Result<(), AppError> {
    let created = state.permission_registry.seed_catalog().await?;
    info!(created, "permission catalog seeded");

    Ok(())
}

fn assemble<R>(
    repository: Arc<R>,
    memberships: Arc<dyn RoleMembershipDirectory>,
    storage_backend: &'static str,
) -> AppState
where
    R: RoleRepository + PermissionRepository + 'static,
{
    let catalog = Arc::new(PermissionCatalog::standard());
    let roles: Arc<dyn RoleRepository> = repository.clone();
    let permissions: Arc<dyn PermissionRepository> = repository;

    AppState {
        role_manager: RoleManager::new(
            roles,
            permissions.clone(),
            memberships,
            catalog.clone(),
        ),
        permission_registry: PermissionRegistry::new(permissions, catalog),
        storage_backend,
    }
}
