//! Application services and ports.

#![forbid(unsafe_code)]

mod permission_registry;
mod rbac_ports;
mod role_manager;

#[cfg(test)]
mod test_support;

pub use permission_registry::PermissionRegistry;
pub use rbac_ports::{
    CloneRoleInput, CreatePermissionInput, CreateRoleInput, PermissionRepository,
    RoleMembershipDirectory, RoleRepository, UpdatePermissionInput, UpdateRoleInput,
};
pub use role_manager::RoleManager;
