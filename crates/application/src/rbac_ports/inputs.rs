use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use shopfront_domain::{LocalizedText, PermissionAction, PermissionId, PermissionResource};

/// Input payload for role creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoleInput {
    /// Role name, compared exactly against existing roles.
    pub name: String,
    /// Optional translated names.
    pub name_localized: Option<LocalizedText>,
    /// Optional translated descriptions.
    pub description_localized: Option<LocalizedText>,
    /// Raw level, validated against the allowed range.
    pub level: i64,
    /// Whether the role starts active.
    pub is_active: bool,
    /// Whether the role is protected from deletion.
    pub is_system: bool,
    /// Whether the role rejects later changes. Requires `is_system`.
    #[serde(default)]
    pub is_immutable: bool,
    /// Permission records granted by the role.
    pub permission_ids: BTreeSet<PermissionId>,
}

/// Partial update for a role. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRoleInput {
    /// New role name.
    pub name: Option<String>,
    /// New translated names.
    pub name_localized: Option<LocalizedText>,
    /// New translated descriptions.
    pub description_localized: Option<LocalizedText>,
    /// New raw level.
    pub level: Option<i64>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New system flag. Switching it off is rejected.
    pub is_system: Option<bool>,
    /// New immutability flag. Switching it off is rejected.
    pub is_immutable: Option<bool>,
    /// Replacement permission set.
    pub permission_ids: Option<BTreeSet<PermissionId>>,
    /// Version the caller last read, checked before committing.
    pub expected_version: Option<u64>,
}

/// Overrides applied when cloning a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneRoleInput {
    /// Name of the new role.
    pub name: String,
    /// Optional translated names for the new role.
    pub name_localized: Option<LocalizedText>,
    /// Optional level; defaults to the source role's level.
    pub level: Option<i64>,
}

/// Input payload for permission record creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePermissionInput {
    /// Governed resource.
    pub resource: PermissionResource,
    /// Allowed action.
    pub action: PermissionAction,
    /// Default display name.
    pub name: String,
    /// Optional translated names.
    pub name_localized: Option<LocalizedText>,
    /// Optional translated descriptions.
    pub description_localized: Option<LocalizedText>,
    /// Category name; defaults to the catalog category listing the pair.
    pub category: Option<String>,
    /// Whether the record starts active.
    pub is_active: bool,
    /// Whether the record is protected from deletion.
    pub is_system: bool,
}

/// Partial update for a permission record. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePermissionInput {
    /// New resource. Rejected for system records.
    pub resource: Option<PermissionResource>,
    /// New action. Rejected for system records.
    pub action: Option<PermissionAction>,
    /// New display name.
    pub name: Option<String>,
    /// New translated names.
    pub name_localized: Option<LocalizedText>,
    /// New translated descriptions.
    pub description_localized: Option<LocalizedText>,
    /// New category name.
    pub category: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}
