use serde::{Deserialize, Serialize};
use shopfront_domain::SelectionState;
use ts_rs::TS;

/// Incoming payload for the category selection helpers.
///
/// The helper is stateless: callers send the category's ids and the ids
/// currently selected in their picker.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/category-selection-request.ts"
)]
pub struct CategorySelectionRequest {
    pub category_permission_ids: Vec<String>,
    #[serde(default)]
    pub selected_ids: Vec<String>,
}

/// Selection state of one category.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/selection-state-response.ts"
)]
pub struct SelectionStateResponse {
    pub selected: usize,
    pub total: usize,
    pub all_selected: bool,
    pub partial: bool,
}

/// Result of toggling one category.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/toggle-category-response.ts"
)]
pub struct ToggleCategoryResponse {
    pub selected_ids: Vec<String>,
    pub state: SelectionStateResponse,
}

impl From<SelectionState> for SelectionStateResponse {
    fn from(value: SelectionState) -> Self {
        Self {
            selected: value.selected,
            total: value.total,
            all_selected: value.all_selected,
            partial: value.is_partial(),
        }
    }
}
