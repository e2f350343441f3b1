use aws_health_mcp::{make_client, Envelope, HealthMcpServer, McpRequest, ServerConfig};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

async fn function_handler(
    server: &HealthMcpServer,
    event: LambdaEvent<McpRequest>,
) -> Result<Envelope, Error> {
    Ok(server.handle_request(event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let config = ServerConfig::from_env()?;
    let server = HealthMcpServer::new(make_client(config.health_region.as_deref()).await);
    let server = &server;

    run(service_fn(move |event| async move {
        function_handler(server, event).await
    }))
    .await
}
