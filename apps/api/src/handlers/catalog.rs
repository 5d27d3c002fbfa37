use super::*;

use crate::dto::CatalogCategoryResponse;

pub async fn permission_catalog_handler(
    State(state): State<AppState>,
) -> Json<Vec<CatalogCategoryResponse>> {
    let categories = state
        .permission_registry
        .list_categories()
        .iter()
        .map(CatalogCategoryResponse::from)
        .collect();

    Json(categories)
}
