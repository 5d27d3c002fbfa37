use super::*;

impl RoleManager {
    /// Creates a role after validating every input field.
    ///
    /// All field violations are reported together. A name already used by
    /// any existing role is a conflict.
    pub async fn create_role(&self, input: CreateRoleInput) -> AppResult<RoleAggregate> {
        let mut errors = ValidationErrors::new();
        RoleAggregate::check_name(&input.name, &mut errors);
        RoleLevel::check(input.level, &mut errors);
        self.check_permission_ids(&input.permission_ids, &mut errors)
            .await?;
        RoleAggregate::check_flags(input.is_system, input.is_immutable, &mut errors);
        errors.into_result()?;

        self.ensure_name_unused(&input.name).await?;

        let level = RoleLevel::new(input.level)?;
        let now = Utc::now();
        let role = RoleAggregate {
            id: RoleId::new(),
            name: input.name,
            name_localized: input.name_localized.unwrap_or_default(),
            description_localized: input.description_localized.unwrap_or_default(),
            level,
            is_active: input.is_active,
            is_system: input.is_system,
            is_immutable: input.is_immutable,
            permissions: input.permission_ids,
            user_count: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        };

        self.roles.insert_role(role.clone()).await?;

        Ok(role)
    }
}
