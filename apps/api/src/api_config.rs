use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use shopfront_core::AppError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: Option<String>,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub seed_permission_catalog: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        ensure_migration_target(migrate_only, database_url.as_deref())?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = match env::var("API_PORT") {
            Ok(value) => value.parse::<u16>().map_err(|error| {
                AppError::validation("API_PORT", format!("invalid API_PORT '{value}': {error}"))
            })?,
            Err(_) => 3001,
        };
        let seed_permission_catalog = optional_bool_env("SEED_PERMISSION_CATALOG", true)?;

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            api_host,
            api_port,
            seed_permission_catalog,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::validation(
                "API_HOST",
                format!("invalid API_HOST '{}': {error}", self.api_host),
            )
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn ensure_migration_target(
    migrate_only: bool,
    database_url: Option<&str>,
) -> Result<(), AppError> {
    if migrate_only && database_url.is_none() {
        return Err(AppError::validation(
            "DATABASE_URL",
            "DATABASE_URL is required to run migrations",
        ));
    }

    Ok(())
}

fn optional_bool_env(name: &str, default: bool) -> Result<bool, AppError> {
    let Ok(value) = env::var(name) else {
        return Ok(default);
    };

    parse_bool(value.as_str())
        .ok_or_else(|| AppError::validation(name, format!("{name} must be 'true' or 'false'")))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
