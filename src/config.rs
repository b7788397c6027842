//! Client configuration parsed from environment variables.
//!
//! The SSR binary reads the process environment. The WASM bundle has no
//! environment at runtime, so the same keys are also captured at compile
//! time with `option_env!` and used as the fallback.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_ENDPOINT: &str = "/api";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_HOME_PATH: &str = "/";

/// Errors produced while parsing configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown FOLKERS_TOKEN_STORAGE: {0} (expected 'cookie' or 'local_storage')")]
    UnknownStorage(String),

    #[error("{var} must be an absolute path, got '{value}'")]
    RelativePath { var: &'static str, value: String },
}

/// Which browser facility persists the access token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Cookie,
    LocalStorage,
}

/// Navigation surfaces the guards redirect between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePaths {
    pub login: String,
    pub home: String,
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self { login: DEFAULT_LOGIN_PATH.to_owned(), home: DEFAULT_HOME_PATH.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_endpoint: String,
    pub storage: StorageBackend,
    pub routes: RoutePaths,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_owned(),
            storage: StorageBackend::default(),
            routes: RoutePaths::default(),
        }
    }
}

impl ClientConfig {
    /// Build config from the environment, falling back to build-time values.
    ///
    /// Optional:
    /// - `FOLKERS_API_ENDPOINT`: default `/api`
    /// - `FOLKERS_TOKEN_STORAGE`: `cookie` (default) or `local_storage`
    /// - `FOLKERS_LOGIN_PATH`: default `/login`
    /// - `FOLKERS_HOME_PATH`: default `/`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an unknown storage backend or a relative route path.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| compiled_value(key)))
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_endpoint = lookup("FOLKERS_API_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let storage = parse_storage(lookup("FOLKERS_TOKEN_STORAGE").as_deref())?;
        let login = parse_path("FOLKERS_LOGIN_PATH", lookup("FOLKERS_LOGIN_PATH"), DEFAULT_LOGIN_PATH)?;
        let home = parse_path("FOLKERS_HOME_PATH", lookup("FOLKERS_HOME_PATH"), DEFAULT_HOME_PATH)?;

        Ok(Self { api_endpoint, storage, routes: RoutePaths { login, home } })
    }
}

fn compiled_value(key: &str) -> Option<String> {
    let value = match key {
        "FOLKERS_API_ENDPOINT" => option_env!("FOLKERS_API_ENDPOINT"),
        "FOLKERS_TOKEN_STORAGE" => option_env!("FOLKERS_TOKEN_STORAGE"),
        "FOLKERS_LOGIN_PATH" => option_env!("FOLKERS_LOGIN_PATH"),
        "FOLKERS_HOME_PATH" => option_env!("FOLKERS_HOME_PATH"),
        _ => None,
    };
    value.map(str::to_owned)
}

fn parse_storage(raw: Option<&str>) -> Result<StorageBackend, ConfigError> {
    match raw.map(str::trim).unwrap_or("cookie") {
        "cookie" => Ok(StorageBackend::Cookie),
        "local_storage" | "localStorage" => Ok(StorageBackend::LocalStorage),
        other => Err(ConfigError::UnknownStorage(other.to_owned())),
    }
}

fn parse_path(var: &'static str, raw: Option<String>, default: &str) -> Result<String, ConfigError> {
    let Some(value) = raw else {
        return Ok(default.to_owned());
    };
    if !value.starts_with('/') {
        return Err(ConfigError::RelativePath { var, value });
    }
    if value.len() > 1 {
        return Ok(value.trim_end_matches('/').to_owned());
    }
    Ok(value)
}
