use std::fmt;
use std::net::IpAddr;

use crate::config::errors::ConfigError;
use crate::config::{EnvironmentProvider, SystemEnvironment};

/// Infrastructure settings needed before anything else can start
pub struct BootstrapSettings {
    database_url: String,
    audit_database_url: String,
    server_host: String,
    server_port: u16,
}

impl BootstrapSettings {
    /// Load bootstrap settings through an environment provider
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let database_url = env.get_or("DATABASE_URL", "sqlite://procurement.db?mode=rwc");
        let audit_database_url = env.get_or("AUDIT_DATABASE_URL", "sqlite://audit.db?mode=rwc");

        let server_host = env.get_or("HOST", "0.0.0.0");
        Self::validate_host(&server_host)?;

        let port_value = env.get_or("PORT", "3000");
        let server_port = Self::parse_port(&port_value)?;

        Ok(Self {
            database_url,
            audit_database_url,
            server_host,
            server_port,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    /// IP literal or a plain hostname such as `localhost`
    fn validate_host(value: &str) -> Result<(), ConfigError> {
        let is_hostname = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');

        if value.parse::<IpAddr>().is_ok() || is_hostname {
            Ok(())
        } else {
            Err(ConfigError::invalid_format("HOST", "IP address or hostname", value))
        }
    }

    /// Port must be in 1-65535
    fn parse_port(value: &str) -> Result<u16, ConfigError> {
        match value.parse::<u16>() {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(ConfigError::invalid_format("PORT", "integer 1-65535", value)),
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Connection string for the separate audit database
    pub fn audit_database_url(&self) -> &str {
        &self.audit_database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    /// `host:port` string handed to the TCP listener
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("audit_database_url", &self.audit_database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}
