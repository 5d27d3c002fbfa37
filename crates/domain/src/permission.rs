use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopfront_core::AppError;
use uuid::Uuid;

use crate::LocalizedText;

/// Unique identifier for a permission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(Uuid);

impl PermissionId {
    /// Creates a random permission identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a permission identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PermissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for PermissionId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self).map_err(|error| {
            AppError::validation(
                "permission_id",
                format!("invalid permission id '{value}': {error}"),
            )
        })
    }
}

/// Resource nouns a permission can govern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionResource {
    /// Customer and staff accounts.
    Users,
    /// Roles and their grants.
    Roles,
    /// Permission records.
    Permissions,
    /// Catalog products.
    Products,
    /// Product categories.
    Categories,
    /// Customer orders.
    Orders,
    /// Product reviews.
    Reviews,
    /// Sales and activity reports.
    Reports,
    /// Storefront notifications.
    Notifications,
    /// Store-wide settings.
    Settings,
}

impl PermissionResource {
    /// Returns a stable storage value for this resource.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Roles => "roles",
            Self::Permissions => "permissions",
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Orders => "orders",
            Self::Reviews => "reviews",
            Self::Reports => "reports",
            Self::Notifications => "notifications",
            Self::Settings => "settings",
        }
    }

    /// Returns all known resources.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionResource] = &[
            PermissionResource::Users,
            PermissionResource::Roles,
            PermissionResource::Permissions,
            PermissionResource::Products,
            PermissionResource::Categories,
            PermissionResource::Orders,
            PermissionResource::Reviews,
            PermissionResource::Reports,
            PermissionResource::Notifications,
            PermissionResource::Settings,
        ];

        ALL
    }
}

impl FromStr for PermissionResource {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|resource| resource.as_str() == value)
            .ok_or_else(|| {
                AppError::validation("resource", format!("unknown permission resource '{value}'"))
            })
    }
}

impl Display for PermissionResource {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Verbs a permission can allow on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// Create new items.
    Create,
    /// Read items.
    Read,
    /// Update existing items.
    Update,
    /// Delete items.
    Delete,
    /// Full control over the resource.
    Manage,
    /// Approve pending items.
    Approve,
    /// Reject pending items.
    Reject,
    /// Export items.
    Export,
    /// Import items.
    Import,
    /// Publish items to the storefront.
    Publish,
    /// Withdraw items from the storefront.
    Unpublish,
    /// Archive items.
    Archive,
    /// Restore archived items.
    Restore,
}

impl PermissionAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Manage => "manage",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Export => "export",
            Self::Import => "import",
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
            Self::Archive => "archive",
            Self::Restore => "restore",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionAction] = &[
            PermissionAction::Create,
            PermissionAction::Read,
            PermissionAction::Update,
            PermissionAction::Delete,
            PermissionAction::Manage,
            PermissionAction::Approve,
            PermissionAction::Reject,
            PermissionAction::Export,
            PermissionAction::Import,
            PermissionAction::Publish,
            PermissionAction::Unpublish,
            PermissionAction::Archive,
            PermissionAction::Restore,
        ];

        ALL
    }
}

impl FromStr for PermissionAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| {
                AppError::validation("action", format!("unknown permission action '{value}'"))
            })
    }
}

impl Display for PermissionAction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Persisted permission wrapping one `resource:action` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// Stable permission identifier.
    pub id: PermissionId,
    /// Governed resource.
    pub resource: PermissionResource,
    /// Allowed action.
    pub action: PermissionAction,
    /// Default display name.
    pub name: String,
    /// Translated display names.
    pub name_localized: LocalizedText,
    /// Translated descriptions.
    pub description_localized: LocalizedText,
    /// Catalog category the permission is listed under.
    pub category: String,
    /// Inactive permissions stay referenced but are hidden from pickers.
    pub is_active: bool,
    /// System permissions cannot be deleted and keep their resource/action.
    pub is_system: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PermissionRecord {
    /// Returns the canonical `resource:action` key.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.resource.as_str(), self.action.as_str())
    }

    /// Returns true when this record governs the given pair.
    #[must_use]
    pub fn matches(&self, resource: PermissionResource, action: PermissionAction) -> bool {
        self.resource == resource && self.action == action
    }
}
