use std::sync::Arc;

use clap::Parser;
use poem::{Server, listener::TcpListener};

use procurement_backend::AppData;
use procurement_backend::api;
use procurement_backend::cli::{self, Cli, Commands};
use procurement_backend::config::{BootstrapSettings, DatabaseConnections, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let command = Cli::parse().command();

    let settings = BootstrapSettings::from_env()?;
    tracing::debug!("Bootstrap settings: {:?}", settings);

    let connections = DatabaseConnections::connect(&settings).await?;

    if command == Commands::Migrate {
        cli::migrate::run_migrations(&connections).await?;
        return Ok(());
    }

    connections.migrate().await?;
    tracing::info!("Database migrations completed");

    let app_data = Arc::new(AppData::init(connections).await?);

    if command != Commands::Serve {
        return cli::execute_command(command, &app_data).await;
    }

    let address = settings.server_address();
    let public_url = format!("http://{}", address);
    let app = api::routes(app_data, &public_url);

    tracing::info!("Starting server on {}", public_url);
    println!("Swagger UI available at {}/swagger", public_url);
    println!("API endpoints available at {}/api", public_url);

    Server::new(TcpListener::bind(address)).run(app).await?;

    Ok(())
}
