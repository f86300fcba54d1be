// Server configuration loaded from environment variables
// Decision: Every setting has a development-friendly default; production only
// needs MONGODB_URI and a JWT secret
// Decision: Loading goes through a lookup function so tests never mutate the
// process environment

use std::path::PathBuf;

/// Errors raised while reading configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        lookup("APP_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .map(|s| Self::from_str(&s))
            .unwrap_or_default()
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

/// Which storage backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    #[default]
    MongoDb,
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub kind: StorageKind,
    /// Connection string; a database in its path takes precedence
    pub mongodb_uri: String,
    /// Database used when the URI names none
    pub mongodb_database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::MongoDb,
            mongodb_uri: "mongodb://localhost:27017/hiringhelper".to_string(),
            mongodb_database: "hiringhelper".to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub environment: Environment,
    /// Listen address
    pub bind_addr: String,
    /// Prefix for all API routes, normalized to "" or "/segment"
    pub api_prefix: String,
    /// Origins allowed for credentialed CORS requests; empty disables CORS
    pub cors_origins: Vec<String>,
    /// Built front-end bundle served behind the route guard
    pub ui_dist_dir: Option<PathBuf>,
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            bind_addr: "0.0.0.0:3000".to_string(),
            api_prefix: "/api".to_string(),
            cors_origins: Vec::new(),
            ui_dist_dir: None,
            storage: StorageConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let environment = Environment::from_lookup(&lookup);

        let bind_addr = lookup("BIND_ADDR").unwrap_or(defaults.bind_addr);

        let api_prefix = lookup("API_PREFIX")
            .map(|s| normalize_prefix(&s))
            .unwrap_or(defaults.api_prefix);

        let cors_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let ui_dist_dir = lookup("UI_DIST_DIR")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let kind = match lookup("STORAGE_BACKEND") {
            None => StorageKind::MongoDb,
            Some(value) => match value.trim().to_lowercase().as_str() {
                "" | "mongodb" | "mongo" => StorageKind::MongoDb,
                "memory" | "in-memory" => StorageKind::Memory,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "STORAGE_BACKEND",
                        value,
                    })
                }
            },
        };

        let storage = StorageConfig {
            kind,
            mongodb_uri: lookup("MONGODB_URI").unwrap_or(defaults.storage.mongodb_uri),
            mongodb_database: lookup("MONGODB_DATABASE")
                .unwrap_or(defaults.storage.mongodb_database),
        };

        Ok(Self {
            environment,
            bind_addr,
            api_prefix,
            cors_origins,
            ui_dist_dir,
            storage,
        })
    }
}

/// Normalize an API prefix: "" and "/" mean no prefix, otherwise a single
/// leading slash and no trailing slash.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Parse a boolean flag the way the rest of the config does ("true" or "1")
pub fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
