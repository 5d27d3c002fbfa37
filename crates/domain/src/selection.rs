//! Category-level bulk selection for permission pickers.
//!
//! These helpers derive a disposable view over a set of selected permission
//! ids. The role aggregate remains the system of record.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{PermissionCatalog, PermissionId, PermissionRecord};

/// How much of one category is currently selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Selected ids belonging to the category.
    pub selected: usize,
    /// Ids in the category.
    pub total: usize,
    /// True when every id of a non-empty category is selected.
    pub all_selected: bool,
}

impl SelectionState {
    /// Returns true when some, but not all, ids are selected.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.selected > 0 && self.selected < self.total
    }
}

/// Computes the selection state of one category.
#[must_use]
pub fn selection_state(
    category_permission_ids: &BTreeSet<PermissionId>,
    selected_ids: &BTreeSet<PermissionId>,
) -> SelectionState {
    let total = category_permission_ids.len();
    let selected = category_permission_ids.intersection(selected_ids).count();

    SelectionState {
        selected,
        total,
        all_selected: selected == total && total > 0,
    }
}

/// Flips a whole category on or off.
///
/// A fully selected category is cleared. Anything else, including a partial
/// selection, selects the whole category.
#[must_use]
pub fn toggle_category(
    category_permission_ids: &BTreeSet<PermissionId>,
    selected_ids: &BTreeSet<PermissionId>,
) -> BTreeSet<PermissionId> {
    if selection_state(category_permission_ids, selected_ids).all_selected {
        return selected_ids
            .difference(category_permission_ids)
            .copied()
            .collect();
    }

    selected_ids
        .union(category_permission_ids)
        .copied()
        .collect()
}

/// Permission records listed under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    /// Category name.
    pub category: String,
    /// Records in display order.
    pub permissions: Vec<PermissionRecord>,
}

impl CategoryGroup {
    /// Returns the ids of this group's records.
    #[must_use]
    pub fn permission_ids(&self) -> BTreeSet<PermissionId> {
        self.permissions.iter().map(|record| record.id).collect()
    }
}

/// Groups records for display in catalog order.
///
/// Categories follow the catalog's order and records follow the catalog's
/// entry order inside each category. Records whose category the catalog does
/// not declare are appended afterwards, grouped by name. Empty categories are
/// omitted.
#[must_use]
pub fn group_by_category(
    catalog: &PermissionCatalog,
    records: impl IntoIterator<Item = PermissionRecord>,
) -> Vec<CategoryGroup> {
    let mut by_category: BTreeMap<String, Vec<PermissionRecord>> = BTreeMap::new();
    for record in records {
        by_category
            .entry(record.category.clone())
            .or_default()
            .push(record);
    }

    let mut groups = Vec::new();
    for category in catalog.list_categories() {
        let Some(mut permissions) = by_category.remove(&category.name) else {
            continue;
        };

        permissions.sort_by_key(|record| {
            category
                .permissions
                .iter()
                .position(|entry| record.matches(entry.resource, entry.action))
                .unwrap_or(usize::MAX)
        });
        groups.push(CategoryGroup {
            category: category.name.clone(),
            permissions,
        });
    }

    groups.extend(
        by_category
            .into_iter()
            .map(|(category, mut permissions)| {
                permissions.sort_by_key(PermissionRecord::key);
                CategoryGroup {
                    category,
                    permissions,
                }
            }),
    );

    groups
}
