use shopfront_application::{PermissionRegistry, RoleManager};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub role_manager: RoleManager,
    pub permission_registry: PermissionRegistry,
    /// Active storage backend, `memory` or `postgres`.
    pub storage_backend: &'static str,
}
