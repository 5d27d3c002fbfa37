use super::*;

use shopfront_domain::PermissionId;

use crate::dto::{CreatePermissionRequest, PermissionResponse, UpdatePermissionRequest};

pub async fn list_permissions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .permission_registry
        .list_permissions()
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission_id = permission_id.parse::<PermissionId>()?;
    let permission = state
        .permission_registry
        .get_permission(permission_id)
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .permission_registry
        .create_permission(payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn update_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
    Json(payload): Json<UpdatePermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission_id = permission_id.parse::<PermissionId>()?;
    let permission = state
        .permission_registry
        .update_permission(permission_id, payload.try_into()?)
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
) -> ApiResult<StatusCode> {
    let permission_id = permission_id.parse::<PermissionId>()?;
    state
        .permission_registry
        .delete_permission(permission_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
