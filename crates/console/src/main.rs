use complaintdesk_console::{app, config::ConsoleConfig, permission_source};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    complaintdesk_observability::init();

    let config = ConsoleConfig::from_env()?;
    if config.jwt_secret == ConsoleConfig::DEV_JWT_SECRET {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }

    let source = permission_source::from_config(&config)?;
    let bind_addr = config.bind_addr;
    let app = app::build_app(config, source);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
