use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shopfront_application::{CloneRoleInput, CreateRoleInput, UpdateRoleInput};
use shopfront_core::{AppError, ValidationErrors};
use shopfront_domain::{CategoryGroup, RoleAggregate, RoleLevel};
use ts_rs::TS;

use super::common::{
    collect_permission_ids, ids_to_transport, localized_from_transport, localized_to_transport,
    timestamp,
};
use super::permissions::PermissionResponse;

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub name_localized: BTreeMap<String, String>,
    pub description_localized: BTreeMap<String, String>,
    pub level: u8,
    pub is_active: bool,
    pub is_system: bool,
    pub is_immutable: bool,
    pub permission_ids: Vec<String>,
    #[ts(type = "number")]
    pub user_count: u64,
    #[ts(type = "number")]
    pub version: u64,
    pub created_at: String,
    pub updated_at: String,
}

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub name_localized: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub description_localized: Option<BTreeMap<String, String>>,
    pub level: i32,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_system: Option<bool>,
    #[serde(default)]
    pub is_immutable: Option<bool>,
    #[serde(default)]
    pub permission_ids: Vec<String>,
}

/// Incoming payload for partial role updates.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_localized: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub description_localized: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_system: Option<bool>,
    #[serde(default)]
    pub is_immutable: Option<bool>,
    #[serde(default)]
    pub permission_ids: Option<Vec<String>>,
    /// Version from the last read; stale values are rejected with 409.
    #[serde(default)]
    #[ts(type = "number | null")]
    pub expected_version: Option<u64>,
}

/// Incoming payload for role cloning.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/clone-role-request.ts"
)]
pub struct CloneRoleRequest {
    pub name: String,
    #[serde(default)]
    pub name_localized: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub level: Option<i32>,
}

/// A role's permission records under one catalog category.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/role-permission-group-response.ts"
)]
pub struct RolePermissionGroupResponse {
    pub category: String,
    pub permissions: Vec<PermissionResponse>,
}

impl From<RoleAggregate> for RoleResponse {
    fn from(value: RoleAggregate) -> Self {
        Self {
            role_id: value.id.to_string(),
            name_localized: localized_to_transport(&value.name_localized),
            description_localized: localized_to_transport(&value.description_localized),
            name: value.name,
            level: value.level.value(),
            is_active: value.is_active,
            is_system: value.is_system,
            is_immutable: value.is_immutable,
            permission_ids: ids_to_transport(&value.permissions),
            user_count: value.user_count,
            version: value.version,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

impl From<CategoryGroup> for RolePermissionGroupResponse {
    fn from(value: CategoryGroup) -> Self {
        Self {
            category: value.category,
            permissions: value
                .permissions
                .into_iter()
                .map(PermissionResponse::from)
                .collect(),
        }
    }
}

impl TryFrom<CreateRoleRequest> for CreateRoleInput {
    type Error = AppError;

    fn try_from(value: CreateRoleRequest) -> Result<Self, Self::Error> {
        let is_system = value.is_system.unwrap_or(false);
        let is_immutable = value.is_immutable.unwrap_or(false);

        let mut errors = ValidationErrors::new();
        let permission_ids =
            collect_permission_ids(&value.permission_ids, "permission_ids", &mut errors);
        // Malformed ids stop the request before the service runs its own checks.
        if !errors.is_empty() {
            RoleAggregate::check_name(&value.name, &mut errors);
            RoleLevel::check(i64::from(value.level), &mut errors);
            RoleAggregate::check_flags(is_system, is_immutable, &mut errors);
        }
        errors.into_result()?;

        Ok(Self {
            permission_ids,
            name: value.name,
            name_localized: localized_from_transport(value.name_localized),
            description_localized: localized_from_transport(value.description_localized),
            level: i64::from(value.level),
            is_active: value.is_active.unwrap_or(true),
            is_system,
            is_immutable,
        })
    }
}

impl TryFrom<UpdateRoleRequest> for UpdateRoleInput {
    type Error = AppError;

    fn try_from(value: UpdateRoleRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        let permission_ids = value
            .permission_ids
            .as_deref()
            .map(|ids| collect_permission_ids(ids, "permission_ids", &mut errors));
        if !errors.is_empty() {
            if let Some(name) = &value.name {
                RoleAggregate::check_name(name, &mut errors);
            }
            if let Some(level) = value.level {
                RoleLevel::check(i64::from(level), &mut errors);
            }
        }
        errors.into_result()?;

        Ok(Self {
            name: value.name,
            name_localized: localized_from_transport(value.name_localized),
            description_localized: localized_from_transport(value.description_localized),
            level: value.level.map(i64::from),
            is_active: value.is_active,
            is_system: value.is_system,
            is_immutable: value.is_immutable,
            permission_ids,
            expected_version: value.expected_version,
        })
    }
}

impl From<CloneRoleRequest> for CloneRoleInput {
    fn from(value: CloneRoleRequest) -> Self {
        Self {
            name: value.name,
            name_localized: localized_from_transport(value.name_localized),
            level: value.level.map(i64::from),
        }
    }
}
