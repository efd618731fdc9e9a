mod bootstrap_settings;
mod database;
mod env_provider;
mod errors;
mod logging;
mod secret_manager;

pub use bootstrap_settings::BootstrapSettings;
pub use database::{
    DatabaseConnections, begin_transaction, commit_transaction, migrate_audit_database,
    migrate_main_database,
};
pub use env_provider::{EnvironmentProvider, MockEnvironment, SystemEnvironment};
pub use errors::ConfigError;
pub use logging::{LoggingConfig, LoggingError, init_logging, init_logging_with};
pub use secret_manager::SecretManager;
