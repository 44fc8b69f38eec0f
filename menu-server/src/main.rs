use menu_server::{Config, Server, init_logger_with_file};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );

    if config.jwt_secret_generated {
        tracing::warn!("JWT_SECRET not set, generating a temporary key for development");
    }

    tracing::info!(
        "Starting menu-server (env: {}, debug: {})",
        config.environment,
        config.debug
    );

    Server::new(config).run().await?;
    Ok(())
}
