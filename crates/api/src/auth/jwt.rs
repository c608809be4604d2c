//! Staff access tokens.
//!
//! HS256 JWTs issued by `POST /auth/login`. Only staff carry them; guests
//! prove an email address with a session token instead.

use chrono::Utc;
use innkeep_core::roles::ROLE_ADMIN;
use innkeep_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim stamped on and required of every token.
pub const TOKEN_ISSUER: &str = "innkeep-api";

/// Shortest signing secret accepted from the environment.
const MIN_SECRET_LENGTH: usize = 16;

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Admin user id.
    pub sub: DbId,
    pub role: String,
    pub iss: String,
    /// Unix seconds.
    pub iat: i64,
    /// Unix seconds.
    pub exp: i64,
    /// Per-token UUID so individual logins show up distinctly in logs.
    pub jti: String,
}

impl Claims {
    fn new(user_id: DbId, role: &str, lifetime_mins: i64) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: user_id,
            role: role.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat,
            exp: iat + lifetime_mins * 60,
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, at least 16 bytes) and
    /// `JWT_ACCESS_EXPIRY_MINS` (default 60).
    ///
    /// # Panics
    ///
    /// On a missing or short secret, or a non-positive expiry.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(
            secret.len() >= MIN_SECRET_LENGTH,
            "JWT_SECRET must be at least {MIN_SECRET_LENGTH} bytes"
        );

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|mins| *mins > 0)
                .expect("JWT_ACCESS_EXPIRY_MINS must be a positive integer"),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Token lifetime in seconds, as reported to clients.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation
    }
}

/// Sign a token for `user_id` carrying `role`.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(user_id, role, config.access_token_expiry_mins);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, issuer, and expiry, and return the claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &JwtConfig::validation(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issued_token_round_trips() {
        let config = config("front-desk-signing-secret");
        let token = generate_access_token(42, ROLE_ADMIN, &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert!(claims.is_admin());
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert_eq!(config.expires_in_secs(), 900);
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = "front-desk-signing-secret";
        let mut claims = Claims::new(1, ROLE_ADMIN, 15);
        // Past the library's default 60 s leeway.
        claims.exp = claims.iat - 300;

        assert!(validate_token(&sign(&claims, secret), &config(secret)).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let secret = "front-desk-signing-secret";
        let mut claims = Claims::new(1, ROLE_ADMIN, 15);
        claims.iss = "someone-else".to_string();

        assert!(validate_token(&sign(&claims, secret), &config(secret)).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(1, ROLE_ADMIN, &config("secret-alpha-alpha")).unwrap();
        assert!(validate_token(&token, &config("secret-bravo-bravo")).is_err());
    }

    #[test]
    fn other_roles_are_not_admin() {
        assert!(!Claims::new(1, "viewer", 15).is_admin());
    }
}
