use std::collections::BTreeSet;

use chrono::Utc;
use shopfront_application::{PermissionRepository, RoleMembershipDirectory, RoleRepository};
use shopfront_core::AppError;
use shopfront_domain::{
    LocalizedText, PermissionAction, PermissionId, PermissionRecord, PermissionResource,
    RoleAggregate, RoleId, RoleLevel,
};

use super::InMemoryRbacRepository;

fn permission(resource: PermissionResource, action: PermissionAction) -> PermissionRecord {
    let now = Utc::now();
    PermissionRecord {
        id: PermissionId::new(),
        resource,
        action,
        name: format!("{resource}:{action}"),
        name_localized: LocalizedText::new(),
        description_localized: LocalizedText::new(),
        category: "Product Management".to_owned(),
        is_active: true,
        is_system: false,
        created_at: now,
        updated_at: now,
    }
}

fn role(name: &str, is_active: bool, permissions: &[PermissionId]) -> RoleAggregate {
    let now = Utc::now();
    RoleAggregate {
        id: RoleId::new(),
        name: name.to_owned(),
        name_localized: LocalizedText::new(),
        description_localized: LocalizedText::new(),
        level: RoleLevel::new(50).unwrap_or_else(|_| unreachable!()),
        is_active,
        is_system: false,
        is_immutable: false,
        permissions: permissions.iter().copied().collect(),
        user_count: 0,
        version: 1,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn insert_and_find_role() {
    let repository = InMemoryRbacRepository::new();
    let record = permission(PermissionResource::Products, PermissionAction::Read);
    assert!(repository.insert_permission(record.clone()).await.is_ok());

    let editor = role("Editor", true, &[record.id]);
    assert!(repository.insert_role(editor.clone()).await.is_ok());

    let found = repository.find_role(editor.id).await;
    assert!(found.is_ok());
    let found = found.unwrap_or_default();
    assert_eq!(
        found.map(|role| role.permissions),
        Some(BTreeSet::from([record.id]))
    );
}

#[tokio::test]
async fn active_name_collision_is_rejected() {
    let repository = InMemoryRbacRepository::new();
    assert!(repository.insert_role(role("Manager", true, &[])).await.is_ok());

    let duplicate = repository.insert_role(role("Manager", true, &[])).await;
    let inactive = repository.insert_role(role("Manager", false, &[])).await;

    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert!(inactive.is_ok());
}

#[tokio::test]
async fn role_referencing_unknown_permission_is_rejected() {
    let repository = InMemoryRbacRepository::new();

    let result = repository
        .insert_role(role("Editor", true, &[PermissionId::new()]))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(repository.list_roles().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn stale_update_is_rejected() {
    let repository = InMemoryRbacRepository::new();
    let editor = role("Editor", true, &[]);
    assert!(repository.insert_role(editor.clone()).await.is_ok());

    let mut first = editor.clone();
    first.version = 2;
    assert!(repository.update_role(first, 1).await.is_ok());

    let mut second = editor;
    second.version = 2;
    second.name = "Writer".to_owned();
    let result = repository.update_role(second, 1).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_unknown_role_is_not_found() {
    let repository = InMemoryRbacRepository::new();

    let result = repository.update_role(role("Ghost", true, &[]), 1).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn delete_role_twice_is_not_found() {
    let repository = InMemoryRbacRepository::new();
    let editor = role("Editor", true, &[]);
    assert!(repository.insert_role(editor.clone()).await.is_ok());

    assert!(repository.delete_role(editor.id).await.is_ok());
    let second = repository.delete_role(editor.id).await;

    assert!(matches!(second, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn duplicate_permission_pair_is_rejected() {
    let repository = InMemoryRbacRepository::new();
    let first = permission(PermissionResource::Orders, PermissionAction::Export);
    let second = permission(PermissionResource::Orders, PermissionAction::Export);

    assert!(repository.insert_permission(first).await.is_ok());
    let result = repository.insert_permission(second).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn referenced_permission_cannot_be_deleted() {
    let repository = InMemoryRbacRepository::new();
    let record = permission(PermissionResource::Products, PermissionAction::Publish);
    assert!(repository.insert_permission(record.clone()).await.is_ok());
    let publisher = role("Publisher", true, &[record.id]);
    assert!(repository.insert_role(publisher.clone()).await.is_ok());

    let blocked = repository.delete_permission(record.id).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));
    assert!(
        repository
            .is_permission_referenced(record.id)
            .await
            .unwrap_or_default()
    );

    assert!(repository.delete_role(publisher.id).await.is_ok());
    assert!(repository.delete_permission(record.id).await.is_ok());
    assert!(
        repository
            .find_permission(record.id)
            .await
            .unwrap_or_default()
            .is_none()
    );
}

#[tokio::test]
async fn find_permission_by_pair_matches_resource_and_action() {
    let repository = InMemoryRbacRepository::new();
    let record = permission(PermissionResource::Reviews, PermissionAction::Reject);
    assert!(repository.insert_permission(record.clone()).await.is_ok());

    let found = repository
        .find_permission_by_pair(PermissionResource::Reviews, PermissionAction::Reject)
        .await
        .unwrap_or_default();
    let missing = repository
        .find_permission_by_pair(PermissionResource::Reviews, PermissionAction::Approve)
        .await
        .unwrap_or_default();

    assert_eq!(found.map(|found| found.id), Some(record.id));
    assert!(missing.is_none());
}

#[tokio::test]
async fn counts_distinct_subjects_per_role() {
    let repository = InMemoryRbacRepository::new();
    let editor = role("Editor", true, &[]);
    assert!(repository.insert_role(editor.clone()).await.is_ok());

    assert!(repository.assign(editor.id, "alice").await.is_ok());
    assert!(repository.assign(editor.id, "alice").await.is_ok());
    assert!(repository.assign(editor.id, "bob").await.is_ok());

    let count = repository.count_users_with_role(editor.id).await;
    assert_eq!(count.ok(), Some(2));

    repository.unassign(editor.id, "alice").await;
    repository.unassign(editor.id, "bob").await;
    let count = repository.count_users_with_role(editor.id).await;
    assert_eq!(count.ok(), Some(0));
}

#[tokio::test]
async fn assign_unknown_role_is_not_found() {
    let repository = InMemoryRbacRepository::new();

    let result = repository.assign(RoleId::new(), "alice").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn delete_role_rechecks_assignments_under_lock() {
    let repository = InMemoryRbacRepository::new();
    let editor = role("Editor", true, &[]);
    assert!(repository.insert_role(editor.clone()).await.is_ok());
    assert_eq!(repository.count_users_with_role(editor.id).await.ok(), Some(0));

    // Assigned after the caller read a zero count.
    assert!(repository.assign(editor.id, "alice").await.is_ok());

    let blocked = repository.delete_role(editor.id).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));
    assert!(
        repository
            .find_role(editor.id)
            .await
            .unwrap_or_default()
            .is_some()
    );

    repository.unassign(editor.id, "alice").await;
    assert!(repository.delete_role(editor.id).await.is_ok());
}
