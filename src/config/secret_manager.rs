use std::fmt;

use crate::config::errors::ConfigError;
use crate::config::{EnvironmentProvider, SystemEnvironment};

const JWT_SECRET: &str = "JWT_SECRET";
const PASSWORD_PEPPER: &str = "PASSWORD_PEPPER";

/// A required secret and its minimum length in bytes
struct SecretRule {
    env_var: &'static str,
    min_length: usize,
}

const JWT_RULE: SecretRule = SecretRule {
    env_var: JWT_SECRET,
    min_length: 32,
};

const PEPPER_RULE: SecretRule = SecretRule {
    env_var: PASSWORD_PEPPER,
    min_length: 16,
};

/// Centralized manager for application secrets
pub struct SecretManager {
    jwt_secret: String,
    pepper: String,
}

impl SecretManager {
    /// Load and validate all secrets from the process environment
    ///
    /// # Errors
    /// Returns `ConfigError` if any required secret is missing or too short
    pub fn init() -> Result<Self, ConfigError> {
        Self::init_with_env(&SystemEnvironment)
    }

    /// Load and validate all secrets from `env`
    pub fn init_with_env(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let jwt_secret = Self::load_secret(env, &JWT_RULE)?;
        let pepper = Self::load_secret(env, &PEPPER_RULE)?;

        Ok(Self { jwt_secret, pepper })
    }

    /// HS256 signing key
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Pepper mixed into every password hash
    pub fn pepper(&self) -> &str {
        &self.pepper
    }

    fn load_secret(env: &dyn EnvironmentProvider, rule: &SecretRule) -> Result<String, ConfigError> {
        let value = env
            .get_var(rule.env_var)
            .ok_or_else(|| ConfigError::missing(rule.env_var))?;

        if value.len() < rule.min_length {
            return Err(ConfigError::SecretTooShort {
                secret_name: rule.env_var.to_string(),
                expected: rule.min_length,
                actual: value.len(),
            });
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 2 }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    const VALID_JWT: &str = "this-is-a-valid-jwt-secret-with-32-characters";
    const VALID_PEPPER: &str = "valid-pepper-16ch";

    #[test]
    fn test_successful_initialization_with_valid_secrets() {
        let env = MockEnvironment::empty()
            .with_vars(&[(JWT_SECRET, VALID_JWT), (PASSWORD_PEPPER, VALID_PEPPER)]);

        let manager = SecretManager::init_with_env(&env).unwrap();
        assert_eq!(manager.jwt_secret(), VALID_JWT);
        assert_eq!(manager.pepper(), VALID_PEPPER);
    }

    #[test]
    fn test_error_when_jwt_secret_missing() {
        let env = MockEnvironment::empty().with_var(PASSWORD_PEPPER, VALID_PEPPER);

        match SecretManager::init_with_env(&env) {
            Err(ConfigError::Missing { setting_name }) => assert_eq!(setting_name, JWT_SECRET),
            other => panic!("Expected Missing error, got {:?}", other),
        }
    }

    #[test]
    fn test_error_when_pepper_too_short() {
        let env = MockEnvironment::empty()
            .with_vars(&[(JWT_SECRET, VALID_JWT), (PASSWORD_PEPPER, "short")]);

        match SecretManager::init_with_env(&env) {
            Err(ConfigError::SecretTooShort {
                secret_name,
                expected,
                actual,
            }) => {
                assert_eq!(secret_name, PASSWORD_PEPPER);
                assert_eq!(expected, 16);
                assert_eq!(actual, 5);
            }
            other => panic!("Expected SecretTooShort error, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_trait_does_not_expose_secrets() {
        let env = MockEnvironment::empty()
            .with_vars(&[(JWT_SECRET, VALID_JWT), (PASSWORD_PEPPER, VALID_PEPPER)]);
        let manager = SecretManager::init_with_env(&env).unwrap();

        let debug_output = format!("{:?}", manager);
        assert!(debug_output.contains("<redacted>"));
        assert!(!debug_output.contains(VALID_JWT));
        assert!(!debug_output.contains(VALID_PEPPER));
    }
}
