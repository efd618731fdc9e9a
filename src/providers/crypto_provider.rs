use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::Rng;
use std::fmt;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;

/// Password hashing and generation
///
/// Hashes are Argon2id with the application pepper as the secret parameter,
/// so a leaked database alone is not enough to brute-force passwords.
pub struct CryptoProvider {
    pepper: String,
}

impl CryptoProvider {
    /// Create a CryptoProvider
    ///
    /// # Arguments
    /// * `pepper` - The application pepper (from SecretManager)
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a password into a PHC string
    ///
    /// # Arguments
    /// * `password` - The plaintext password
    ///
    /// # Returns
    /// * `Ok(String)` - Argon2id PHC string with a fresh salt
    /// * `Err(InternalError)` - Crypto or hashing failure
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check `password` against a stored PHC string
    ///
    /// A malformed stored hash counts as a mismatch.
    ///
    /// # Arguments
    /// * `password` - The plaintext password to check
    /// * `stored_hash` - PHC string from `usuarios.password_hash`
    ///
    /// # Returns
    /// * `Ok(bool)` - Whether the password matches
    /// * `Err(InternalError)` - Argon2 could not be initialized
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, InternalError> {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                return Ok(false);
            }
        };

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate a 20-character random password for bootstrap accounts
    pub fn generate_secure_password(&self) -> String {
        const PASSWORD_LENGTH: usize = 20;
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                 abcdefghijklmnopqrstuvwxyz\
                                 0123456789\
                                 !@#$%^&*()_+-=[]{}|;:,.<>?";

        let mut rng = rand::rng();
        (0..PASSWORD_LENGTH)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect()
    }
}

impl fmt::Debug for CryptoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoProvider")
            .field("pepper", &"<redacted>")
            .finish()
    }
}
