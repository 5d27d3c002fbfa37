use super::*;

impl RoleManager {
    /// Applies a partial update to a role.
    ///
    /// Present fields are validated like on creation. System roles stay
    /// editable, but the system and immutability flags are one-way and an
    /// immutable role rejects changes to name, level, activity and grants.
    /// A new name must not belong to another active role, even when this
    /// role is inactive.
    pub async fn update_role(
        &self,
        role_id: RoleId,
        patch: UpdateRoleInput,
    ) -> AppResult<RoleAggregate> {
        let mut role = self.load_role(role_id).await?;
        let stored_version = role.version;

        let mut errors = ValidationErrors::new();
        if let Some(name) = &patch.name {
            RoleAggregate::check_name(name, &mut errors);
        }
        if let Some(level) = patch.level {
            RoleLevel::check(level, &mut errors);
        }
        if let Some(permission_ids) = &patch.permission_ids {
            self.check_permission_ids(permission_ids, &mut errors)
                .await?;
        }
        let is_system = patch.is_system.unwrap_or(role.is_system);
        let is_immutable = patch.is_immutable.unwrap_or(role.is_immutable);
        RoleAggregate::check_flags(is_system, is_immutable, &mut errors);
        errors.into_result()?;

        if let Some(expected_version) = patch.expected_version
            && expected_version != stored_version
        {
            return Err(AppError::Conflict(format!(
                "role '{}' was modified concurrently (expected version {expected_version}, found {stored_version})",
                role.name
            )));
        }

        if role.is_system && !is_system {
            return Err(AppError::Conflict(format!(
                "role '{}' is a system role; the system flag cannot be removed",
                role.name
            )));
        }

        if role.is_immutable && !is_immutable {
            return Err(AppError::Conflict(format!(
                "role '{}' is immutable; the immutability flag cannot be removed",
                role.name
            )));
        }

        let level = patch.level.map(RoleLevel::new).transpose()?;
        if role.is_immutable {
            let locked_fields = locked_field_changes(&role, &patch, level);
            if !locked_fields.is_empty() {
                return Err(AppError::Conflict(format!(
                    "role '{}' is immutable; cannot change {}",
                    role.name,
                    locked_fields.join(", ")
                )));
            }
        }

        let renamed = patch.name.as_ref().is_some_and(|name| name != &role.name);
        if let Some(name) = patch.name {
            role.name = name;
        }
        if let Some(name_localized) = patch.name_localized {
            role.name_localized = name_localized;
        }
        if let Some(description_localized) = patch.description_localized {
            role.description_localized = description_localized;
        }
        if let Some(level) = level {
            role.level = level;
        }
        if let Some(is_active) = patch.is_active {
            role.is_active = is_active;
        }
        if let Some(permission_ids) = patch.permission_ids {
            role.permissions = permission_ids;
        }
        role.is_system = is_system;
        role.is_immutable = is_immutable;

        if role.is_active || renamed {
            let taken = self
                .roles
                .list_roles()
                .await?
                .iter()
                .any(|other| other.is_active && role.name_conflicts_with(other));
            if taken {
                return Err(AppError::Conflict(format!(
                    "an active role named '{}' already exists",
                    role.name
                )));
            }
        }

        role.touch(Utc::now());
        self.roles.update_role(role.clone(), stored_version).await?;

        Ok(role)
    }
}

fn locked_field_changes(
    role: &RoleAggregate,
    patch: &UpdateRoleInput,
    level: Option<RoleLevel>,
) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if patch.name.as_ref().is_some_and(|name| name != &role.name) {
        changed.push("name");
    }
    if level.is_some_and(|level| level != role.level) {
        changed.push("level");
    }
    if patch
        .is_active
        .is_some_and(|is_active| is_active != role.is_active)
    {
        changed.push("is_active");
    }
    if patch
        .permission_ids
        .as_ref()
        .is_some_and(|permission_ids| permission_ids != &role.permissions)
    {
        changed.push("permission_ids");
    }

    changed
}
