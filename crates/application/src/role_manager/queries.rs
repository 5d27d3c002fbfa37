use super::*;

impl RoleManager {
    /// Returns one role with its current user count.
    pub async fn get_role(&self, role_id: RoleId) -> AppResult<RoleAggregate> {
        self.load_role(role_id).await
    }

    /// Lists roles by level, most privileged first, then by name.
    pub async fn list_roles(&self) -> AppResult<Vec<RoleAggregate>> {
        let mut roles = self.roles.list_roles().await?;
        for role in &mut roles {
            role.user_count = self.memberships.count_users_with_role(role.id).await?;
        }

        roles.sort_by(|left, right| {
            right
                .level
                .cmp(&left.level)
                .then_with(|| left.name.cmp(&right.name))
        });

        Ok(roles)
    }

    /// Returns a role's permission records grouped in catalog order.
    pub async fn role_permissions_by_category(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<CategoryGroup>> {
        let role = self.load_role(role_id).await?;
        let records = self
            .permissions
            .list_permissions()
            .await?
            .into_iter()
            .filter(|record| role.permissions.contains(&record.id));

        Ok(group_by_category(&self.catalog, records))
    }
}
