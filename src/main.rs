use tracing::{error, info};

use mydrive::{Config, DriveClient};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = mydrive::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        mydrive::logging::init_console_only(&config.logging.level);
    }

    info!("My Personal Drive");
    info!("API endpoint: {}", config.api.base_url);

    let client = match DriveClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to start client: {}", e);
            std::process::exit(1);
        }
    };

    let navigator = client.navigator().await;
    match client.auth().user().await {
        Some(user) => info!("Signed in as {}", user.email),
        None => info!("Not signed in"),
    }
    info!("Start screen: {}", navigator.current());
}
