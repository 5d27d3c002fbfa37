use super::*;

use shopfront_domain::RoleId;

use crate::dto::{
    CloneRoleRequest, CreateRoleRequest, RolePermissionGroupResponse, RoleResponse,
    UpdateRoleRequest,
};

pub async fn list_roles_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .role_manager
        .list_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id = role_id.parse::<RoleId>()?;
    let role = state.role_manager.get_role(role_id).await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state.role_manager.create_role(payload.try_into()?).await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id = role_id.parse::<RoleId>()?;
    let role = state
        .role_manager
        .update_role(role_id, payload.try_into()?)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    let role_id = role_id.parse::<RoleId>()?;
    state.role_manager.delete_role(role_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn clone_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    Json(payload): Json<CloneRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role_id = role_id.parse::<RoleId>()?;
    let role = state
        .role_manager
        .clone_role(role_id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<Vec<RolePermissionGroupResponse>>> {
    let role_id = role_id.parse::<RoleId>()?;
    let groups = state
        .role_manager
        .role_permissions_by_category(role_id)
        .await?
        .into_iter()
        .map(RolePermissionGroupResponse::from)
        .collect();

    Ok(Json(groups))
}
