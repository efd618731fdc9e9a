use thiserror::Error;

/// Errors raised while loading settings and secrets at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required setting '{setting_name}' is missing")]
    Missing { setting_name: String },

    #[error("Setting '{setting_name}' has invalid format. Expected: {expected}, got: {actual}")]
    InvalidFormat {
        setting_name: String,
        expected: String,
        actual: String,
    },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    SecretTooShort {
        secret_name: String,
        expected: usize,
        actual: usize,
    },
}

impl ConfigError {
    pub fn missing(setting_name: &str) -> Self {
        Self::Missing {
            setting_name: setting_name.to_string(),
        }
    }

    pub fn invalid_format(setting_name: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidFormat {
            setting_name: setting_name.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
