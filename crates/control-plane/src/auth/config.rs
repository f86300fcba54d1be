// Authentication configuration loaded from environment variables.
// Decision: Accept both AUTH_JWT_SECRET and the legacy JWT_SECRET
// Decision: Production refuses to start without a secret; development generates
// a random one (sessions then do not survive a restart)

use std::time::Duration;

use crate::config::{parse_flag, ConfigError, Environment};

/// Upper bound for AUTH_TOKEN_LIFETIME (one year)
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 365 * 24 * 60 * 60;

/// Pages that the route guard never redirects away from
pub const DEFAULT_PUBLIC_ROUTES: &[&str] =
    &["/login", "/register", "/forgot-password", "/reset-password"];

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWTs
    pub secret: String,
    /// Token lifetime (also the cookie Max-Age)
    pub token_lifetime: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_lifetime: Duration::from_secs(24 * 60 * 60), // 24 hours
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    /// Whether to set the Secure attribute
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "auth_token".to_string(),
            secure: false,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
    /// Route guard allow-list (exact paths)
    pub public_routes: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            cookie: CookieConfig::default(),
            public_routes: DEFAULT_PUBLIC_ROUTES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        Self::from_lookup(environment, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        environment: Environment,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let secret = match lookup("AUTH_JWT_SECRET")
            .or_else(|| lookup("JWT_SECRET"))
            .filter(|s| !s.is_empty())
        {
            Some(secret) => secret,
            None if environment.is_production() => {
                return Err(ConfigError::Missing("AUTH_JWT_SECRET"))
            }
            None => {
                tracing::warn!(
                    "AUTH_JWT_SECRET not set, generating a random secret for this process"
                );
                generate_secret()
            }
        };

        let token_lifetime = match lookup("AUTH_TOKEN_LIFETIME") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 && secs <= MAX_TOKEN_LIFETIME_SECS => {
                    Duration::from_secs(secs)
                }
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "AUTH_TOKEN_LIFETIME",
                        value,
                    })
                }
            },
            None => defaults.jwt.token_lifetime,
        };

        let cookie = CookieConfig {
            name: lookup("AUTH_COOKIE_NAME")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.cookie.name),
            secure: lookup("AUTH_COOKIE_SECURE")
                .map(|s| parse_flag(&s))
                .unwrap_or_else(|| environment.is_production()),
        };

        let public_routes = lookup("AUTH_PUBLIC_ROUTES")
            .map(|s| {
                s.split(',')
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.public_routes);

        Ok(Self {
            jwt: JwtConfig {
                secret,
                token_lifetime,
            },
            cookie,
            public_routes,
        })
    }

    /// Check whether a page path is on the public allow-list.
    /// A trailing slash is ignored ("/login/" matches "/login").
    pub fn is_public_route(&self, path: &str) -> bool {
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };
        self.public_routes.iter().any(|r| r == path)
    }
}

/// Generate a random secret (64 hex characters)
fn generate_secret() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}
