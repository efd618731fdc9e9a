use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::internal::auth::Claims;

/// Access token issued at login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    /// Seconds until expiry
    pub expires_in: i64,
}

/// Provides JWT generation and validation
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    jwt_expiration_minutes: i64,
}

impl TokenProvider {
    /// Create a TokenProvider issuing 15-minute tokens
    ///
    /// # Arguments
    /// * `secret_manager` - Source of the signing secret
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self {
            secret_manager,
            jwt_expiration_minutes: 15,
        }
    }

    /// Issue an HS256 JWT carrying the user's effective permission keys
    ///
    /// # Arguments
    /// * `user_id` - Becomes the `sub` claim
    /// * `email` - Copied into the claims for display
    /// * `permisos` - Effective permission keys at login time
    ///
    /// # Returns
    /// * `Ok(IssuedToken)` - The encoded token, its `jti` and lifetime in seconds
    /// * `Err(InternalError)` - Crypto error if encoding fails
    pub fn generate_jwt(
        &self,
        user_id: &str,
        email: &str,
        permisos: Vec<String>,
    ) -> Result<IssuedToken, InternalError> {
        let now = Utc::now().timestamp();
        let expires_in = self.jwt_expiration_minutes * 60;
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + expires_in,
            iat: now,
            jti: jti.clone(),
            email: email.to_string(),
            permisos,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        Ok(IssuedToken {
            token,
            jti,
            expires_in,
        })
    }

    /// Validate a JWT and return its claims
    ///
    /// # Arguments
    /// * `token` - The bearer token, without the `Bearer ` prefix
    ///
    /// # Returns
    /// * `Ok(Claims)` - Signature and expiry are valid
    /// * `Err(InternalError)` - `CredentialError::ExpiredToken` past `exp`,
    ///   `CredentialError::InvalidToken` otherwise
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                CredentialError::ExpiredToken("jwt".to_string()).into()
            }
            _ => CredentialError::invalid_token("jwt", "invalid signature or malformed").into(),
        })
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .finish()
    }
}
