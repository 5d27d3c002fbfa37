use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shopfront_core::{AppError, AppResult};

use crate::{PermissionAction, PermissionResource};

/// One recognized `resource:action` pair with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPermission {
    /// Governed resource.
    pub resource: PermissionResource,
    /// Allowed action.
    pub action: PermissionAction,
    /// Default display name.
    pub display_name: String,
}

impl CatalogPermission {
    /// Creates a catalog entry.
    #[must_use]
    pub fn new(
        resource: PermissionResource,
        action: PermissionAction,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            resource,
            action,
            display_name: display_name.into(),
        }
    }
}

/// Named group of catalog entries rendered together in the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCategory {
    /// Category display name, also used as the permission record category.
    pub name: String,
    /// Entries in display order.
    pub permissions: Vec<CatalogPermission>,
}

/// Fixed universe of permissions the storefront recognizes.
///
/// Category order and entry order are significant: the admin console renders
/// permission pickers in exactly this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCatalog {
    categories: Vec<PermissionCategory>,
}

impl PermissionCatalog {
    /// Creates a validated catalog.
    pub fn new(categories: Vec<PermissionCategory>) -> AppResult<Self> {
        let mut category_names = HashSet::new();
        let mut pairs = HashSet::new();

        for category in &categories {
            if category.name.trim().is_empty() {
                return Err(AppError::validation(
                    "category",
                    "category name must not be empty",
                ));
            }

            if !category_names.insert(category.name.as_str()) {
                return Err(AppError::validation(
                    "category",
                    format!("category '{}' is declared twice", category.name),
                ));
            }

            for permission in &category.permissions {
                if !pairs.insert((permission.resource, permission.action)) {
                    return Err(AppError::validation(
                        "permissions",
                        format!(
                            "permission '{}:{}' is declared twice",
                            permission.resource, permission.action
                        ),
                    ));
                }
            }
        }

        Ok(Self { categories })
    }

    /// Returns the built-in storefront catalog.
    #[must_use]
    pub fn standard() -> Self {
        use PermissionAction as A;
        use PermissionResource as R;

        Self {
            categories: vec![
                category(
                    "User Management",
                    &[
                        (R::Users, A::Create, "Create users"),
                        (R::Users, A::Read, "View users"),
                        (R::Users, A::Update, "Edit users"),
                        (R::Users, A::Delete, "Delete users"),
                        (R::Users, A::Export, "Export users"),
                    ],
                ),
                category(
                    "Role Management",
                    &[
                        (R::Roles, A::Create, "Create roles"),
                        (R::Roles, A::Read, "View roles"),
                        (R::Roles, A::Update, "Edit roles"),
                        (R::Roles, A::Delete, "Delete roles"),
                        (R::Permissions, A::Read, "View permissions"),
                        (R::Permissions, A::Manage, "Manage permissions"),
                    ],
                ),
                category(
                    "Product Management",
                    &[
                        (R::Products, A::Create, "Create products"),
                        (R::Products, A::Read, "View products"),
                        (R::Products, A::Update, "Edit products"),
                        (R::Products, A::Delete, "Delete products"),
                        (R::Products, A::Publish, "Publish products"),
                        (R::Products, A::Unpublish, "Unpublish products"),
                        (R::Products, A::Archive, "Archive products"),
                        (R::Products, A::Restore, "Restore products"),
                        (R::Products, A::Import, "Import products"),
                        (R::Products, A::Export, "Export products"),
                    ],
                ),
                category(
                    "Category Management",
                    &[
                        (R::Categories, A::Create, "Create categories"),
                        (R::Categories, A::Read, "View categories"),
                        (R::Categories, A::Update, "Edit categories"),
                        (R::Categories, A::Delete, "Delete categories"),
                    ],
                ),
                category(
                    "Order Management",
                    &[
                        (R::Orders, A::Read, "View orders"),
                        (R::Orders, A::Update, "Edit orders"),
                        (R::Orders, A::Approve, "Approve orders"),
                        (R::Orders, A::Reject, "Reject orders"),
                        (R::Orders, A::Export, "Export orders"),
                    ],
                ),
                category(
                    "Review Management",
                    &[
                        (R::Reviews, A::Read, "View reviews"),
                        (R::Reviews, A::Approve, "Approve reviews"),
                        (R::Reviews, A::Reject, "Reject reviews"),
                        (R::Reviews, A::Delete, "Delete reviews"),
                    ],
                ),
                category(
                    "Reports",
                    &[
                        (R::Reports, A::Read, "View reports"),
                        (R::Reports, A::Export, "Export reports"),
                    ],
                ),
                category(
                    "Notifications",
                    &[
                        (R::Notifications, A::Read, "View notifications"),
                        (R::Notifications, A::Manage, "Manage notifications"),
                    ],
                ),
                category(
                    "System Settings",
                    &[
                        (R::Settings, A::Read, "View settings"),
                        (R::Settings, A::Manage, "Manage settings"),
                    ],
                ),
            ],
        }
    }

    /// Returns categories in display order.
    #[must_use]
    pub fn list_categories(&self) -> &[PermissionCategory] {
        self.categories.as_slice()
    }

    /// Returns true when a category with this exact name exists.
    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|category| category.name == name)
    }

    /// Finds the catalog entry for a pair.
    #[must_use]
    pub fn resolve(
        &self,
        resource: PermissionResource,
        action: PermissionAction,
    ) -> Option<&CatalogPermission> {
        self.categories
            .iter()
            .flat_map(|category| category.permissions.iter())
            .find(|permission| permission.resource == resource && permission.action == action)
    }

    /// Returns the category name listing a pair.
    #[must_use]
    pub fn category_of(
        &self,
        resource: PermissionResource,
        action: PermissionAction,
    ) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| {
                category
                    .permissions
                    .iter()
                    .any(|permission| permission.resource == resource && permission.action == action)
            })
            .map(|category| category.name.as_str())
    }

    /// Iterates every entry with its category name, in display order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CatalogPermission)> {
        self.categories.iter().flat_map(|category| {
            category
                .permissions
                .iter()
                .map(move |permission| (category.name.as_str(), permission))
        })
    }
}

fn category(
    name: &str,
    entries: &[(PermissionResource, PermissionAction, &str)],
) -> PermissionCategory {
    PermissionCategory {
        name: name.to_owned(),
        permissions: entries
            .iter()
            .map(|(resource, action, display_name)| {
                CatalogPermission::new(*resource, *action, *display_name)
            })
            .collect(),
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogPermission, PermissionCatalog, PermissionCategory};
    use crate::{PermissionAction, PermissionResource};

    #[test]
    fn standard_catalog_passes_validation() {
        let catalog = PermissionCatalog::standard();
        let revalidated = PermissionCatalog::new(catalog.list_categories().to_vec());
        assert!(revalidated.is_ok());
    }

    #[test]
    fn category_order_is_stable() {
        let catalog = PermissionCatalog::standard();
        let first: Vec<&str> = catalog
            .list_categories()
            .iter()
            .map(|category| category.name.as_str())
            .collect();
        let second: Vec<&str> = catalog
            .list_categories()
            .iter()
            .map(|category| category.name.as_str())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first.first().copied(), Some("User Management"));
    }

    #[test]
    fn resolves_known_pair_and_its_category() {
        let catalog = PermissionCatalog::standard();

        let entry = catalog.resolve(PermissionResource::Products, PermissionAction::Publish);
        assert_eq!(
            entry.map(|permission| permission.display_name.as_str()),
            Some("Publish products")
        );
        assert_eq!(
            catalog.category_of(PermissionResource::Products, PermissionAction::Publish),
            Some("Product Management")
        );
    }

    #[test]
    fn unknown_pair_does_not_resolve() {
        let catalog = PermissionCatalog::standard();
        assert!(
            catalog
                .resolve(PermissionResource::Reports, PermissionAction::Delete)
                .is_none()
        );
    }

    #[test]
    fn duplicate_pair_is_rejected() {
        let entry = CatalogPermission::new(
            PermissionResource::Users,
            PermissionAction::Read,
            "View users",
        );
        let result = PermissionCatalog::new(vec![
            PermissionCategory {
                name: "Users".to_owned(),
                permissions: vec![entry.clone()],
            },
            PermissionCategory {
                name: "Accounts".to_owned(),
                permissions: vec![entry],
            },
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn duplicate_category_name_is_rejected() {
        let result = PermissionCatalog::new(vec![
            PermissionCategory {
                name: "Users".to_owned(),
                permissions: Vec::new(),
            },
            PermissionCategory {
                name: "Users".to_owned(),
                permissions: Vec::new(),
            },
        ]);

        assert!(result.is_err());
    }
}
