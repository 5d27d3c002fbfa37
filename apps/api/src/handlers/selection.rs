use super::*;

use shopfront_domain::{selection_state, toggle_category};

use crate::dto::{
    CategorySelectionRequest, SelectionStateResponse, ToggleCategoryResponse, ids_to_transport,
    parse_permission_ids,
};

pub async fn selection_state_handler(
    Json(payload): Json<CategorySelectionRequest>,
) -> ApiResult<Json<SelectionStateResponse>> {
    let category_ids =
        parse_permission_ids(&payload.category_permission_ids, "category_permission_ids")?;
    let selected_ids = parse_permission_ids(&payload.selected_ids, "selected_ids")?;

    Ok(Json(SelectionStateResponse::from(selection_state(
        &category_ids,
        &selected_ids,
    ))))
}

pub async fn toggle_category_handler(
    Json(payload): Json<CategorySelectionRequest>,
) -> ApiResult<Json<ToggleCategoryResponse>> {
    let category_ids =
        parse_permission_ids(&payload.category_permission_ids, "category_permission_ids")?;
    let selected_ids = parse_permission_ids(&payload.selected_ids, "selected_ids")?;

    let toggled = toggle_category(&category_ids, &selected_ids);
    let state = selection_state(&category_ids, &toggled);

    Ok(Json(ToggleCategoryResponse {
        selected_ids: ids_to_transport(&toggled),
        state: SelectionStateResponse::from(state),
    }))
}
