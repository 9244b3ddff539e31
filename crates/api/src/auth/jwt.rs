//! Access tokens for buyers and sellers.
//!
//! Tokens are HS256 JWTs carrying the user id and role. The same token
//! authenticates HTTP requests (`Authorization: Bearer`) and binds a
//! WebSocket connection to its user (`?token=`).

use heirloom_core::roles::validate_role;
use heirloom_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// `"Buyer"` or `"Seller"`.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    /// Random per-token id.
    pub jti: String,
}

impl Claims {
    fn issue(user_id: DbId, role: &str, ttl_mins: i64) -> Self {
        let iat = chrono::Utc::now().timestamp();
        Self {
            sub: user_id,
            role: role.to_owned(),
            exp: iat + ttl_mins * 60,
            iat,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Signature was valid but the role is not one a user can hold.
    #[error("Token carries unknown role '{0}'")]
    UnknownRole(String),
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of an access token, in minutes.
    pub access_token_expiry_mins: i64,
}

const DEFAULT_EXPIRY_MINS: i64 = 1440;

impl JwtConfig {
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `1440`  |
    ///
    /// Panics on a missing/empty secret or a non-numeric expiry.
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => panic!("JWT_SECRET must be set to a non-empty value"),
        };

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse()
                .unwrap_or_else(|_| panic!("JWT_ACCESS_EXPIRY_MINS is not a number: {raw}")),
            Err(_) => DEFAULT_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Sign a token for `user_id` acting as `role`.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, TokenError> {
    let claims = Claims::issue(user_id, role, config.access_token_expiry_mins);
    let key = EncodingKey::from_secret(config.secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

/// Check signature and expiry, then make sure the role is still a
/// marketplace role.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(config.secret.as_bytes());
    let claims = decode::<Claims>(token, &key, &Validation::default())?.claims;

    if validate_role(&claims.role).is_err() {
        return Err(TokenError::UnknownRole(claims.role));
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 60,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_seller_token_round_trips() {
        let cfg = config("marketplace-secret");
        let token = generate_access_token(42, "Seller", &cfg).unwrap();

        let claims = validate_token(&token, &cfg).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "Seller");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the 60 second leeway jsonwebtoken allows by default.
        let mut claims = Claims::issue(1, "Buyer", 60);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;

        let token = sign(&claims, "marketplace-secret");
        assert_matches!(
            validate_token(&token, &config("marketplace-secret")),
            Err(TokenError::Jwt(_))
        );
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let token = generate_access_token(1, "Buyer", &config("one")).unwrap();
        assert_matches!(
            validate_token(&token, &config("two")),
            Err(TokenError::Jwt(_))
        );
    }

    #[test]
    fn test_unknown_role_rejected() {
        let token = sign(&Claims::issue(1, "Admin", 60), "marketplace-secret");
        assert_matches!(
            validate_token(&token, &config("marketplace-secret")),
            Err(TokenError::UnknownRole(role)) if role == "Admin"
        );
    }
}
