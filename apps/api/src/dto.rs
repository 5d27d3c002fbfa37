mod common;
mod permissions;
mod roles;
mod selection;

pub use common::HealthResponse;
pub(crate) use common::{ids_to_transport, parse_permission_ids};
pub use permissions::{
    CatalogCategoryResponse, CatalogPermissionResponse, CreatePermissionRequest,
    PermissionResponse, UpdatePermissionRequest,
};
pub use roles::{
    CloneRoleRequest, CreateRoleRequest, RolePermissionGroupResponse, RoleResponse,
    UpdateRoleRequest,
};
pub use selection::{CategorySelectionRequest, SelectionStateResponse, ToggleCategoryResponse};
