use super::*;

impl RoleManager {
    /// Creates a new role carrying the source role's grants.
    ///
    /// The copy keeps the source level unless overridden, starts active with
    /// no users and is never a system role.
    pub async fn clone_role(
        &self,
        source_id: RoleId,
        input: CloneRoleInput,
    ) -> AppResult<RoleAggregate> {
        let source = self.load_role(source_id).await?;

        let mut errors = ValidationErrors::new();
        RoleAggregate::check_name(&input.name, &mut errors);
        if let Some(level) = input.level {
            RoleLevel::check(level, &mut errors);
        }
        errors.into_result()?;

        self.ensure_name_unused(&input.name).await?;

        let level = input.level.map(RoleLevel::new).transpose()?;
        let copy = source.duplicate(input.name, input.name_localized, level, Utc::now());

        self.roles.insert_role(copy.clone()).await?;

        Ok(copy)
    }
}
