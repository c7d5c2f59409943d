use authorization_code_service::config::ServerConfig;
use authorization_code_service::handlers::create_router;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init_tracing();

    let config = ServerConfig::from_env()?;
    let app = create_router();

    let addr = config.socket_addr();
    tracing::info!("authorization-code-service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
