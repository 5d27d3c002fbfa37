//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod catalog;
mod localized;
mod permission;
mod role;
mod selection;

pub use catalog::{CatalogPermission, PermissionCatalog, PermissionCategory};
pub use localized::{LocalizedText, SUPPORTED_LANGUAGE_TAGS};
pub use permission::{PermissionAction, PermissionId, PermissionRecord, PermissionResource};
pub use role::{ROLE_LEVEL_MAX, ROLE_LEVEL_MIN, RoleAggregate, RoleId, RoleLevel};
pub use selection::{
    CategoryGroup, SelectionState, group_by_category, selection_state, toggle_category,
};
