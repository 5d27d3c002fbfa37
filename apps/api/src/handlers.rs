use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::error::ApiResult;
use crate::state::AppState;

pub mod catalog;
pub mod health;
pub mod permissions;
pub mod roles;
pub mod selection;
