use staffdir_api::ApiConfig;
use staffdir_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    staffdir_observability::init(LogFormat::parse(&log_format));

    let config = ApiConfig::from_env()?;
    let app = staffdir_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
