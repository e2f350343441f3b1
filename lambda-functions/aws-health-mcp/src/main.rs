use aws_health_mcp::{http, make_client, HealthMcpServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let config = ServerConfig::from_env()?;
    let client = make_client(config.health_region.as_deref()).await;

    http::serve(&config, HealthMcpServer::new(client)).await
}
