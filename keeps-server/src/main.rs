use keeps_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    setup_environment(&config)?;

    print_banner();
    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "Customkeeps server starting"
    );

    let state = ServerState::initialize(&config).await?;

    let server = Server::with_state(state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
