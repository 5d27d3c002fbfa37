use std::collections::BTreeSet;

use shopfront_core::AppError;
use shopfront_domain::{LocalizedText, PermissionAction, PermissionId, PermissionResource, RoleId};

use crate::test_support::{FakeRbacStore, services};
use crate::{CloneRoleInput, CreateRoleInput, UpdateRoleInput};

fn create_input(name: &str, level: i64, permission_ids: &[PermissionId]) -> CreateRoleInput {
    CreateRoleInput {
        name: name.to_owned(),
        name_localized: None,
        description_localized: None,
        level,
        is_active: true,
        is_system: false,
        is_immutable: false,
        permission_ids: permission_ids.iter().copied().collect(),
    }
}

async fn two_permissions(store: &FakeRbacStore) -> (PermissionId, PermissionId) {
    let first = store
        .add_permission(
            PermissionResource::Products,
            PermissionAction::Read,
            "Product Management",
            true,
        )
        .await;
    let second = store
        .add_permission(
            PermissionResource::Products,
            PermissionAction::Update,
            "Product Management",
            true,
        )
        .await;
    (first, second)
}

#[tokio::test]
async fn create_role_keeps_exact_permission_set() {
    let (manager, _, store) = services();
    let (p1, p2) = two_permissions(&store).await;

    let role = manager
        .create_role(create_input("Editor", 70, &[p1, p2]))
        .await;

    let role = match role {
        Ok(role) => role,
        Err(error) => panic!("expected role, got {error}"),
    };
    assert_eq!(role.permissions, BTreeSet::from([p1, p2]));
    assert_eq!(role.user_count, 0);
    assert_eq!(role.level.value(), 70);
    assert_eq!(role.version, 1);
    assert!(store.stored_role(role.id).await.is_some());
}

#[tokio::test]
async fn create_role_rejects_level_out_of_range() {
    let (manager, _, store) = services();
    let (p1, _) = two_permissions(&store).await;

    let result = manager.create_role(create_input("Editor", 200, &[p1])).await;

    match result {
        Err(error @ AppError::Validation(_)) => {
            assert!(error.violations().iter().any(|v| v.field == "level"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(store.role_count().await, 0);
}

#[tokio::test]
async fn create_role_reports_every_violation_at_once() {
    let (manager, _, _) = services();
    let unknown = PermissionId::new();

    let result = manager.create_role(create_input("  ", -5, &[unknown])).await;

    let Err(error) = result else {
        panic!("expected validation error");
    };
    let fields: Vec<&str> = error
        .violations()
        .iter()
        .map(|violation| violation.field.as_str())
        .collect();
    assert_eq!(fields, vec!["name", "level", "permission_ids"]);
}

#[tokio::test]
async fn create_role_rejects_duplicate_name() {
    let (manager, _, _) = services();

    let first = manager.create_role(create_input("Manager", 50, &[])).await;
    let second = manager.create_role(create_input("Manager", 40, &[])).await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn create_role_name_match_is_case_sensitive() {
    let (manager, _, _) = services();

    let first = manager.create_role(create_input("Manager", 50, &[])).await;
    let second = manager.create_role(create_input("manager", 50, &[])).await;

    assert!(first.is_ok());
    assert!(second.is_ok());
}

#[tokio::test]
async fn create_role_rejects_immutable_non_system_role() {
    let (manager, _, _) = services();
    let mut input = create_input("Auditor", 30, &[]);
    input.is_immutable = true;

    let result = manager.create_role(input).await;

    assert!(matches!(result, Err(AppError::Validation(ref errors)) if errors.has_field("is_immutable")));
}

#[tokio::test]
async fn delete_system_role_conflicts_and_keeps_role() {
    let (manager, _, store) = services();
    let mut input = create_input("Administrator", 100, &[]);
    input.is_system = true;
    let role = manager.create_role(input).await;
    let Ok(role) = role else {
        panic!("expected role");
    };

    let result = manager.delete_role(role.id).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(store.stored_role(role.id).await.is_some());
}

#[tokio::test]
async fn delete_role_fails_iff_system_or_assigned() {
    for (is_system, user_count) in [(false, 0), (false, 3), (true, 0), (true, 3)] {
        let (manager, _, store) = services();
        let mut input = create_input("Support", 20, &[]);
        input.is_system = is_system;
        let Ok(role) = manager.create_role(input).await else {
            panic!("expected role");
        };
        store.set_user_count(role.id, user_count).await;

        let result = manager.delete_role(role.id).await;

        if is_system || user_count > 0 {
            assert!(matches!(result, Err(AppError::Conflict(_))));
            assert!(manager.get_role(role.id).await.is_ok());
        } else {
            assert!(result.is_ok());
            assert!(matches!(
                manager.get_role(role.id).await,
                Err(AppError::NotFound(_))
            ));
        }
    }
}

#[tokio::test]
async fn delete_unknown_role_is_not_found() {
    let (manager, _, _) = services();

    let result = manager.delete_role(RoleId::new()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn clone_of_system_role_is_never_system() {
    let (manager, _, store) = services();
    let (p1, p2) = two_permissions(&store).await;
    let mut input = create_input("Manager", 80, &[p1, p2]);
    input.is_system = true;
    input.is_immutable = true;
    let Ok(source) = manager.create_role(input).await else {
        panic!("expected role");
    };
    store.set_user_count(source.id, 9).await;

    let copy = manager
        .clone_role(
            source.id,
            CloneRoleInput {
                name: "Manager Copy".to_owned(),
                name_localized: None,
                level: None,
            },
        )
        .await;

    let Ok(copy) = copy else {
        panic!("expected clone");
    };
    assert_ne!(copy.id, source.id);
    assert!(!copy.is_system);
    assert!(!copy.is_immutable);
    assert_eq!(copy.permissions, source.permissions);
    assert_eq!(copy.level, source.level);
    assert_eq!(copy.user_count, 0);
}

#[tokio::test]
async fn clone_applies_level_and_name_overrides() {
    let (manager, _, _) = services();
    let Ok(source) = manager.create_role(create_input("Editor", 70, &[])).await else {
        panic!("expected role");
    };

    let copy = manager
        .clone_role(
            source.id,
            CloneRoleInput {
                name: "Junior Editor".to_owned(),
                name_localized: Some(LocalizedText::new().with("vi", "Biên tập viên")),
                level: Some(40),
            },
        )
        .await;

    let Ok(copy) = copy else {
        panic!("expected clone");
    };
    assert_eq!(copy.level.value(), 40);
    assert_eq!(copy.name_localized.get("vi"), Some("Biên tập viên"));
}

#[tokio::test]
async fn clone_rejects_colliding_name() {
    let (manager, _, store) = services();
    let Ok(source) = manager.create_role(create_input("Editor", 70, &[])).await else {
        panic!("expected role");
    };

    let result = manager
        .clone_role(
            source.id,
            CloneRoleInput {
                name: "Editor".to_owned(),
                name_localized: None,
                level: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(store.role_count().await, 1);
}

#[tokio::test]
async fn clone_validates_level_override() {
    let (manager, _, _) = services();
    let Ok(source) = manager.create_role(create_input("Editor", 70, &[])).await else {
        panic!("expected role");
    };

    let result = manager
        .clone_role(
            source.id,
            CloneRoleInput {
                name: String::new(),
                name_localized: None,
                level: Some(101),
            },
        )
        .await;

    let Err(error) = result else {
        panic!("expected validation error");
    };
    assert_eq!(error.violations().len(), 2);
}

#[tokio::test]
async fn update_unknown_role_is_not_found() {
    let (manager, _, _) = services();

    let result = manager
        .update_role(RoleId::new(), UpdateRoleInput::default())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn update_rejects_rename_onto_active_role() {
    let (manager, _, _) = services();
    let Ok(_) = manager.create_role(create_input("Manager", 50, &[])).await else {
        panic!("expected role");
    };
    let Ok(staff) = manager.create_role(create_input("Staff", 10, &[])).await else {
        panic!("expected role");
    };

    let result = manager
        .update_role(
            staff.id,
            UpdateRoleInput {
                name: Some("Manager".to_owned()),
                ..UpdateRoleInput::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_allows_rename_onto_inactive_role() {
    let (manager, _, _) = services();
    let mut retired = create_input("Manager", 50, &[]);
    retired.is_active = false;
    let Ok(_) = manager.create_role(retired).await else {
        panic!("expected role");
    };
    let Ok(staff) = manager.create_role(create_input("Staff", 10, &[])).await else {
        panic!("expected role");
    };

    let result = manager
        .update_role(
            staff.id,
            UpdateRoleInput {
                name: Some("Manager".to_owned()),
                ..UpdateRoleInput::default()
            },
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn update_rejects_rename_of_inactive_role_onto_active_role() {
    let (manager, _, store) = services();
    let Ok(_) = manager.create_role(create_input("Manager", 50, &[])).await else {
        panic!("expected role");
    };
    let mut retired = create_input("Staff", 10, &[]);
    retired.is_active = false;
    let Ok(staff) = manager.create_role(retired).await else {
        panic!("expected role");
    };

    let result = manager
        .update_role(
            staff.id,
            UpdateRoleInput {
                name: Some("Manager".to_owned()),
                ..UpdateRoleInput::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    let stored = store.stored_role(staff.id).await;
    assert_eq!(stored.map(|role| role.name), Some("Staff".to_owned()));
}

#[tokio::test]
async fn update_system_role_grants_and_level() {
    let (manager, _, store) = services();
    let (p1, p2) = two_permissions(&store).await;
    let mut input = create_input("Administrator", 90, &[p1]);
    input.is_system = true;
    let Ok(role) = manager.create_role(input).await else {
        panic!("expected role");
    };

    let updated = manager
        .update_role(
            role.id,
            UpdateRoleInput {
                level: Some(95),
                permission_ids: Some(BTreeSet::from([p1, p2])),
                ..UpdateRoleInput::default()
            },
        )
        .await;

    let Ok(updated) = updated else {
        panic!("expected update");
    };
    assert!(updated.is_system);
    assert_eq!(updated.level.value(), 95);
    assert_eq!(updated.permissions, BTreeSet::from([p1, p2]));
    assert_eq!(updated.version, 2);
}

#[tokio::test]
async fn update_cannot_remove_system_flag() {
    let (manager, _, _) = services();
    let mut input = create_input("Administrator", 90, &[]);
    input.is_system = true;
    let Ok(role) = manager.create_role(input).await else {
        panic!("expected role");
    };

    let result = manager
        .update_role(
            role.id,
            UpdateRoleInput {
                is_system: Some(false),
                ..UpdateRoleInput::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn immutable_role_rejects_grant_changes_but_accepts_translations() {
    let (manager, _, store) = services();
    let (p1, p2) = two_permissions(&store).await;
    let mut input = create_input("Super Admin", 100, &[p1]);
    input.is_system = true;
    input.is_immutable = true;
    let Ok(role) = manager.create_role(input).await else {
        panic!("expected role");
    };

    let rejected = manager
        .update_role(
            role.id,
            UpdateRoleInput {
                permission_ids: Some(BTreeSet::from([p1, p2])),
                ..UpdateRoleInput::default()
            },
        )
        .await;
    assert!(matches!(rejected, Err(AppError::Conflict(_))));

    let accepted = manager
        .update_role(
            role.id,
            UpdateRoleInput {
                name: Some("Super Admin".to_owned()),
                name_localized: Some(LocalizedText::new().with("ja", "スーパー管理者")),
                ..UpdateRoleInput::default()
            },
        )
        .await;
    let Ok(accepted) = accepted else {
        panic!("expected update");
    };
    assert_eq!(accepted.permissions, BTreeSet::from([p1]));
    assert_eq!(accepted.name_localized.get("ja"), Some("スーパー管理者"));
}

#[tokio::test]
async fn update_rejects_stale_version_without_writing() {
    let (manager, _, store) = services();
    let Ok(role) = manager.create_role(create_input("Editor", 70, &[])).await else {
        panic!("expected role");
    };

    let first = manager
        .update_role(
            role.id,
            UpdateRoleInput {
                level: Some(60),
                expected_version: Some(1),
                ..UpdateRoleInput::default()
            },
        )
        .await;
    assert!(first.is_ok());

    let second = manager
        .update_role(
            role.id,
            UpdateRoleInput {
                level: Some(10),
                expected_version: Some(1),
                ..UpdateRoleInput::default()
            },
        )
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let stored = store.stored_role(role.id).await;
    assert_eq!(stored.map(|role| role.level.value()), Some(60));
}

#[tokio::test]
async fn update_validates_only_present_fields() {
    let (manager, _, _) = services();
    let Ok(role) = manager.create_role(create_input("Editor", 70, &[])).await else {
        panic!("expected role");
    };

    let result = manager
        .update_role(
            role.id,
            UpdateRoleInput {
                level: Some(250),
                permission_ids: Some(BTreeSet::from([PermissionId::new()])),
                ..UpdateRoleInput::default()
            },
        )
        .await;

    let Err(error) = result else {
        panic!("expected validation error");
    };
    let fields: Vec<&str> = error
        .violations()
        .iter()
        .map(|violation| violation.field.as_str())
        .collect();
    assert_eq!(fields, vec!["level", "permission_ids"]);
}

#[tokio::test]
async fn list_roles_orders_by_level_then_name_with_user_counts() {
    let (manager, _, store) = services();
    for (name, level) in [("Staff", 10), ("Manager", 80), ("Auditor", 80)] {
        let Ok(_) = manager.create_role(create_input(name, level, &[])).await else {
            panic!("expected role");
        };
    }
    let roles = manager.list_roles().await.unwrap_or_default();
    let staff_id = roles
        .iter()
        .find(|role| role.name == "Staff")
        .map(|role| role.id);
    if let Some(staff_id) = staff_id {
        store.set_user_count(staff_id, 5).await;
    }

    let roles = manager.list_roles().await.unwrap_or_default();

    let names: Vec<&str> = roles.iter().map(|role| role.name.as_str()).collect();
    assert_eq!(names, vec!["Auditor", "Manager", "Staff"]);
    assert_eq!(roles.last().map(|role| role.user_count), Some(5));
}

#[tokio::test]
async fn role_permissions_are_grouped_by_catalog_category() {
    let (manager, _, store) = services();
    let orders = store
        .add_permission(
            PermissionResource::Orders,
            PermissionAction::Approve,
            "Order Management",
            true,
        )
        .await;
    let users = store
        .add_permission(
            PermissionResource::Users,
            PermissionAction::Read,
            "User Management",
            true,
        )
        .await;
    let _unused = store
        .add_permission(
            PermissionResource::Reports,
            PermissionAction::Read,
            "Reports",
            true,
        )
        .await;
    let Ok(role) = manager
        .create_role(create_input("Fulfilment", 40, &[orders, users]))
        .await
    else {
        panic!("expected role");
    };

    let groups = manager
        .role_permissions_by_category(role.id)
        .await
        .unwrap_or_default();

    let categories: Vec<&str> = groups.iter().map(|group| group.category.as_str()).collect();
    assert_eq!(categories, vec!["User Management", "Order Management"]);
}
