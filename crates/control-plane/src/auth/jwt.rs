// JWT token service for authentication
// Decision: Use HS256 algorithm (symmetric key shared by every server instance)
// Decision: Single token type; the session lives as long as the token

use anyhow::{Context, Result};
use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::config::JwtConfig;

/// JWT claims for session tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user document id, hex)
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// JWT service for token generation and validation
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a session token for a user
    pub fn issue(&self, user_id: &ObjectId, email: &str) -> Result<String> {
        let now = Utc::now();
        let lifetime = Duration::from_std(self.config.token_lifetime)
            .context("Token lifetime out of range")?;
        let exp = now
            .checked_add_signed(lifetime)
            .context("Token expiry out of range")?;

        let claims = Claims {
            sub: user_id.to_hex(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to encode token")
    }

    /// Validate signature and expiry, then decode the claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).context("Invalid token")?;

        let claims = token_data.claims;
        if claims.sub.is_empty() || claims.email.is_empty() {
            anyhow::bail!("Invalid token payload");
        }

        Ok(claims)
    }

    /// Token lifetime in seconds (cookie Max-Age)
    pub fn token_lifetime_secs(&self) -> i64 {
        i64::try_from(self.config.token_lifetime.as_secs()).unwrap_or(i64::MAX)
    }
}
