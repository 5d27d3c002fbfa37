use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shopfront_application::{CreatePermissionInput, UpdatePermissionInput};
use shopfront_core::{AppError, ValidationErrors};
use shopfront_domain::{
    CatalogPermission, PermissionAction, PermissionCategory, PermissionRecord, PermissionResource,
};
use ts_rs::TS;

use super::common::{localized_from_transport, localized_to_transport, parse_field, timestamp};

/// API representation of one catalog entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/catalog-permission-response.ts"
)]
pub struct CatalogPermissionResponse {
    pub resource: String,
    pub action: String,
    pub key: String,
    pub display_name: String,
}

/// API representation of one catalog category.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/catalog-category-response.ts"
)]
pub struct CatalogCategoryResponse {
    pub name: String,
    pub permissions: Vec<CatalogPermissionResponse>,
}

/// API representation of a stored permission record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub permission_id: String,
    pub resource: String,
    pub action: String,
    pub key: String,
    pub name: String,
    pub name_localized: BTreeMap<String, String>,
    pub description_localized: BTreeMap<String, String>,
    pub category: String,
    pub is_active: bool,
    pub is_system: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Incoming payload for permission record creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/create-permission-request.ts"
)]
pub struct CreatePermissionRequest {
    pub resource: String,
    pub action: String,
    pub name: String,
    #[serde(default)]
    pub name_localized: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub description_localized: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_system: Option<bool>,
}

/// Incoming payload for partial permission record updates.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/update-permission-request.ts"
)]
pub struct UpdatePermissionRequest {
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_localized: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub description_localized: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<&CatalogPermission> for CatalogPermissionResponse {
    fn from(value: &CatalogPermission) -> Self {
        Self {
            resource: value.resource.as_str().to_owned(),
            action: value.action.as_str().to_owned(),
            key: format!("{}:{}", value.resource, value.action),
            display_name: value.display_name.clone(),
        }
    }
}

impl From<&PermissionCategory> for CatalogCategoryResponse {
    fn from(value: &PermissionCategory) -> Self {
        Self {
            name: value.name.clone(),
            permissions: value
                .permissions
                .iter()
                .map(CatalogPermissionResponse::from)
                .collect(),
        }
    }
}

impl From<PermissionRecord> for PermissionResponse {
    fn from(value: PermissionRecord) -> Self {
        Self {
            permission_id: value.id.to_string(),
            resource: value.resource.as_str().to_owned(),
            action: value.action.as_str().to_owned(),
            key: value.key(),
            name_localized: localized_to_transport(&value.name_localized),
            description_localized: localized_to_transport(&value.description_localized),
            name: value.name,
            category: value.category,
            is_active: value.is_active,
            is_system: value.is_system,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

impl TryFrom<CreatePermissionRequest> for CreatePermissionInput {
    type Error = AppError;

    fn try_from(value: CreatePermissionRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        let resource = parse_field::<PermissionResource>(&value.resource, "resource", &mut errors);
        let action = parse_field::<PermissionAction>(&value.action, "action", &mut errors);

        let (Some(resource), Some(action)) = (resource, action) else {
            return Err(AppError::Validation(errors));
        };

        Ok(Self {
            resource,
            action,
            name: value.name,
            name_localized: localized_from_transport(value.name_localized),
            description_localized: localized_from_transport(value.description_localized),
            category: value.category,
            is_active: value.is_active.unwrap_or(true),
            is_system: value.is_system.unwrap_or(false),
        })
    }
}

impl TryFrom<UpdatePermissionRequest> for UpdatePermissionInput {
    type Error = AppError;

    fn try_from(value: UpdatePermissionRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        let resource = value
            .resource
            .as_deref()
            .and_then(|raw| parse_field::<PermissionResource>(raw, "resource", &mut errors));
        let action = value
            .action
            .as_deref()
            .and_then(|raw| parse_field::<PermissionAction>(raw, "action", &mut errors));
        errors.into_result()?;

        Ok(Self {
            resource,
            action,
            name: value.name,
            name_localized: localized_from_transport(value.name_localized),
            description_localized: localized_from_transport(value.description_localized),
            category: value.category,
            is_active: value.is_active,
        })
    }
}
