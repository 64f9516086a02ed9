use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;

pub mod gate;

pub use gate::AuthGate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, name: String, role: Role, expiry_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            name,
            role,
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Verified identity attached to the request context after the gate
/// passes. Handlers see this, never the raw token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("verifier unavailable: {0}")]
    Unavailable(String),
}

/// Credential-verification capability injected into the Auth Gate. The
/// production implementation checks an HS256 signature locally; the seam
/// exists so the gate never depends on a concrete token scheme.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims, VerifyError>;
}

pub struct JwtVerifier {
    decoding_key: DecodingKey,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn from_config() -> Self {
        Self::new(&crate::config::config().security.jwt_secret)
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let validation = Validation::default();
        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => VerifyError::Expired,
                _ => VerifyError::Invalid(e.to_string()),
            }
        })?;
        Ok(data.claims)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token generation failed: {0}")]
    Generation(String),
    #[error("signing secret is empty")]
    EmptySecret,
}

/// Sign an access token for the given claims. Token issuance routes live
/// elsewhere; tests use this to mint valid and expired tokens.
pub fn generate_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::EmptySecret);
    }
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| TokenError::Generation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[tokio::test]
    async fn round_trips_valid_token() {
        let claims = Claims::new(Uuid::new_v4(), "alice".into(), Role::Admin, 1);
        let token = generate_token(&claims, SECRET).unwrap();
        let verified = JwtVerifier::new(SECRET).verify(&token).await.unwrap();
        assert_eq!(verified.sub, claims.sub);
        assert_eq!(verified.role, Role::Admin);
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let mut claims = Claims::new(Uuid::new_v4(), "alice".into(), Role::User, 1);
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = generate_token(&claims, SECRET).unwrap();
        let err = JwtVerifier::new(SECRET).verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::Expired));
    }

    #[tokio::test]
    async fn rejects_token_signed_with_other_secret() {
        let claims = Claims::new(Uuid::new_v4(), "alice".into(), Role::User, 1);
        let token = generate_token(&claims, "other-secret").unwrap();
        let err = JwtVerifier::new(SECRET).verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn refuses_to_sign_with_empty_secret() {
        let claims = Claims::new(Uuid::new_v4(), "alice".into(), Role::User, 1);
        assert!(matches!(
            generate_token(&claims, ""),
            Err(TokenError::EmptySecret)
        ));
    }
}
