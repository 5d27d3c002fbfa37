use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use shopfront_core::{AppError, AppResult, ValidationErrors};
use shopfront_domain::{LocalizedText, PermissionId};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Active storage backend, `memory` or `postgres`.
    pub storage: &'static str,
}

pub(super) fn parse_field<T>(value: &str, field: &str, errors: &mut ValidationErrors) -> Option<T>
where
    T: FromStr<Err = AppError>,
{
    match T::from_str(value) {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            let message = error.violations().first().map_or_else(
                || error.to_string(),
                |violation| violation.message.clone(),
            );
            errors.push(field, message);
            None
        }
    }
}

/// Parses transport ids, reporting every malformed value at once.
pub(crate) fn parse_permission_ids(
    values: &[String],
    field: &str,
) -> AppResult<BTreeSet<PermissionId>> {
    let mut errors = ValidationErrors::new();
    let ids = collect_permission_ids(values, field, &mut errors);

    errors.into_result()?;
    Ok(ids)
}

/// Parses the well-formed ids and records a violation for each other value.
pub(super) fn collect_permission_ids(
    values: &[String],
    field: &str,
    errors: &mut ValidationErrors,
) -> BTreeSet<PermissionId> {
    values
        .iter()
        .filter_map(|value| parse_field::<PermissionId>(value, field, errors))
        .collect()
}

pub(super) fn localized_from_transport(
    value: Option<BTreeMap<String, String>>,
) -> Option<LocalizedText> {
    value.map(|entries| entries.into_iter().collect())
}

pub(super) fn localized_to_transport(value: &LocalizedText) -> BTreeMap<String, String> {
    value
        .iter()
        .map(|(language_tag, text)| (language_tag.to_owned(), text.to_owned()))
        .collect()
}

pub(super) fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn ids_to_transport(ids: &BTreeSet<PermissionId>) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}
