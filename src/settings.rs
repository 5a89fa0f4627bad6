//! Process settings from environment variables (a `.env` file is honored by the server binary).

use crate::error::ConfigError;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: String,
    /// PostgreSQL URL; without it records live in memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub media_root: PathBuf,
    pub media_url: String,
    /// Reject unsafe API methods without a valid token.
    pub require_api_auth: bool,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind_addr: "127.0.0.1:8000".into(),
            database_url: None,
            database_max_connections: 5,
            media_root: PathBuf::from("media"),
            media_url: "/media/".into(),
            require_api_auth: false,
            body_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source; unset or empty variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Settings::default();
        let media_url = get("MEDIA_URL").unwrap_or(defaults.media_url);
        if !media_url.starts_with('/') || media_url.trim_matches('/').is_empty() {
            return Err(ConfigError::Setting {
                name: "MEDIA_URL",
                message: "must be a path below '/', such as /media/".into(),
            });
        }
        Ok(Settings {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: get("DATABASE_URL"),
            database_max_connections: parse(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                defaults.database_max_connections,
            )?,
            media_root: get("MEDIA_ROOT").map(PathBuf::from).unwrap_or(defaults.media_root),
            media_url,
            require_api_auth: parse_bool("REQUIRE_API_AUTH", get("REQUIRE_API_AUTH"), defaults.require_api_auth)?,
            body_limit_bytes: parse("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), defaults.body_limit_bytes)?,
        })
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(s) => s.parse().map_err(|e: T::Err| ConfigError::Setting {
            name,
            message: e.to_string(),
        }),
    }
}

fn parse_bool(name: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::Setting {
            name,
            message: format!("expected a boolean, got {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind_addr, "127.0.0.1:8000");
        assert!(s.database_url.is_none());
        assert_eq!(s.media_url, "/media/");
        assert!(!s.require_api_auth);
    }

    #[test]
    fn overrides_and_parsing() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/edu"),
            ("REQUIRE_API_AUTH", "TRUE"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("BIND_ADDR", " "),
        ])
        .unwrap();
        assert_eq!(s.database_url.as_deref(), Some("postgres://localhost/edu"));
        assert!(s.require_api_auth);
        assert_eq!(s.database_max_connections, 12);
        assert_eq!(s.bind_addr, "127.0.0.1:8000");
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(settings(&[("DATABASE_MAX_CONNECTIONS", "many")]).is_err());
        assert!(settings(&[("REQUIRE_API_AUTH", "maybe")]).is_err());
        assert!(settings(&[("MEDIA_URL", "media")]).is_err());
        assert!(settings(&[("MEDIA_URL", "/")]).is_err());
    }
}
