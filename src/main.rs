use ai_index_relay::{config, server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = config::Settings::load()?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let app = server::create_app(settings.relay);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Relay server running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
