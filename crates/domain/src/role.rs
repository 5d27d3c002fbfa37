use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopfront_core::{AppError, AppResult, ValidationErrors};
use uuid::Uuid;

use crate::{LocalizedText, PermissionId};

/// Lowest role level.
pub const ROLE_LEVEL_MIN: i64 = 0;

/// Highest role level.
pub const ROLE_LEVEL_MAX: i64 = 100;

/// Unique identifier for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for RoleId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self).map_err(|error| {
            AppError::validation("role_id", format!("invalid role id '{value}': {error}"))
        })
    }
}

/// Privilege rank of a role, higher is more privileged.
///
/// The level only drives sorting and labels in the admin console. Nothing in
/// this crate treats it as an authorization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RoleLevel(u8);

impl RoleLevel {
    /// Creates a validated level.
    pub fn new(value: i64) -> AppResult<Self> {
        if !(ROLE_LEVEL_MIN..=ROLE_LEVEL_MAX).contains(&value) {
            return Err(AppError::validation("level", Self::range_message(value)));
        }

        u8::try_from(value)
            .map(Self)
            .map_err(|_| AppError::validation("level", Self::range_message(value)))
    }

    /// Validates a raw level, recording a violation instead of failing.
    pub fn check(value: i64, errors: &mut ValidationErrors) {
        if Self::new(value).is_err() {
            errors.push("level", Self::range_message(value));
        }
    }

    /// Returns the numeric level.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    fn range_message(value: i64) -> String {
        format!("level must be between {ROLE_LEVEL_MIN} and {ROLE_LEVEL_MAX}, got {value}")
    }
}

impl TryFrom<i64> for RoleLevel {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleLevel> for i64 {
    fn from(value: RoleLevel) -> Self {
        i64::from(value.0)
    }
}

impl Display for RoleLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Named, leveled collection of permission references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAggregate {
    /// Stable role identifier.
    pub id: RoleId,
    /// Role name, unique among active roles.
    pub name: String,
    /// Translated display names.
    pub name_localized: LocalizedText,
    /// Translated descriptions.
    pub description_localized: LocalizedText,
    /// Advisory privilege rank.
    pub level: RoleLevel,
    /// Inactive roles are kept but no longer granted.
    pub is_active: bool,
    /// System roles cannot be deleted.
    pub is_system: bool,
    /// Immutable roles reject any change to name, level, activity or grants.
    pub is_immutable: bool,
    /// Referenced permission records.
    pub permissions: BTreeSet<PermissionId>,
    /// Number of accounts holding this role, computed by the user directory.
    pub user_count: u64,
    /// Optimistic concurrency version, bumped on every committed update.
    pub version: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl RoleAggregate {
    /// Validates a role name, recording a violation when blank.
    pub fn check_name(name: &str, errors: &mut ValidationErrors) {
        errors.ensure(
            !name.trim().is_empty(),
            "name",
            "name must not be empty or whitespace",
        );
    }

    /// Records a violation when a non-system role is marked immutable.
    pub fn check_flags(is_system: bool, is_immutable: bool, errors: &mut ValidationErrors) {
        errors.ensure(
            is_system || !is_immutable,
            "is_immutable",
            "only system roles can be immutable",
        );
    }

    /// Returns true when another role's name blocks this one.
    ///
    /// Names compare case-sensitively and exactly.
    #[must_use]
    pub fn name_conflicts_with(&self, other: &RoleAggregate) -> bool {
        self.id != other.id && self.name == other.name
    }

    /// Fails when the role must not be removed.
    pub fn ensure_deletable(&self) -> AppResult<()> {
        if self.is_system {
            return Err(AppError::Conflict(format!(
                "role '{}' is a system role and cannot be deleted",
                self.name
            )));
        }

        if self.user_count > 0 {
            return Err(AppError::Conflict(format!(
                "role '{}' is still assigned to {} user(s); reassign them first",
                self.name, self.user_count
            )));
        }

        Ok(())
    }

    /// Builds an unsaved copy carrying this role's grants.
    ///
    /// Copies never inherit system protection or immutability.
    #[must_use]
    pub fn duplicate(
        &self,
        name: String,
        name_localized: Option<LocalizedText>,
        level: Option<RoleLevel>,
        now: DateTime<Utc>,
    ) -> RoleAggregate {
        RoleAggregate {
            id: RoleId::new(),
            name,
            name_localized: name_localized.unwrap_or_default(),
            description_localized: self.description_localized.clone(),
            level: level.unwrap_or(self.level),
            is_active: true,
            is_system: false,
            is_immutable: false,
            permissions: self.permissions.clone(),
            user_count: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the aggregate as changed.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }
}
