use super::*;

impl RoleManager {
    /// Permanently deletes a role.
    ///
    /// System roles and roles still assigned to users cannot be deleted.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let role = self.load_role(role_id).await?;
        role.ensure_deletable()?;

        self.roles.delete_role(role_id).await
    }
}
