mod inputs;
mod repositories;

pub use inputs::{
    CloneRoleInput, CreatePermissionInput, CreateRoleInput, UpdatePermissionInput,
    UpdateRoleInput,
};
pub use repositories::{PermissionRepository, RoleMembershipDirectory, RoleRepository};
