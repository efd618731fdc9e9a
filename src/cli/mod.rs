// CLI module for administrative operations requiring server access

pub mod bootstrap;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Procurement backend CLI
#[derive(Parser)]
#[command(name = "procurement-backend")]
#[command(about = "Purchase order and budget control backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply pending migrations to the main and audit databases, then exit
    Migrate,

    /// Create the default roles and the first administrator account
    Bootstrap {
        /// Administrator e-mail address
        #[arg(long)]
        email: String,

        /// Administrator display name
        #[arg(long, default_value = "Administrador")]
        nombre: String,
    },
}

impl Cli {
    /// Subcommand to run, falling back to `serve`
    pub fn command(&self) -> Commands {
        match &self.command {
            Some(Commands::Bootstrap { email, nombre }) => Commands::Bootstrap {
                email: email.clone(),
                nombre: nombre.clone(),
            },
            Some(Commands::Migrate) => Commands::Migrate,
            Some(Commands::Serve) | None => Commands::Serve,
        }
    }
}

/// Execute a one-shot CLI command
///
/// `serve` is handled by the binary itself and is a no-op here.
pub async fn execute_command(
    command: Commands,
    app_data: &AppData,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Bootstrap { email, nombre } => {
            bootstrap::bootstrap_system(app_data, &email, &nombre).await?;
        }
        Commands::Migrate => {
            migrate::run_migrations(&app_data.connections).await?;
        }
        Commands::Serve => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["procurement-backend"]).unwrap();
        assert_eq!(cli.command(), Commands::Serve);
    }

    #[test]
    fn test_bootstrap_arguments() {
        let cli = Cli::try_parse_from([
            "procurement-backend",
            "bootstrap",
            "--email",
            "admin@example.mx",
        ])
        .unwrap();

        assert_eq!(
            cli.command(),
            Commands::Bootstrap {
                email: "admin@example.mx".to_string(),
                nombre: "Administrador".to_string(),
            }
        );
    }

    #[test]
    fn test_bootstrap_requires_email() {
        assert!(Cli::try_parse_from(["procurement-backend", "bootstrap"]).is_err());
    }
}
