mod config;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::PortalConfig::from_env()?;
    let portal = services::portal::BuptPortal::new(&config)?;

    // Held for the life of the process; dropping it stops the responder.
    let _dns = if config.dns_enabled {
        let dns = services::dns::DnsServer::spawn(config.dns_bind, config.ap_ip).await?;
        tracing::info!(addr = %dns.local_addr(), ip = %config.ap_ip, "DNS responder started");
        Some(dns)
    } else {
        tracing::info!("DNS responder disabled");
        None
    };

    let addr = config.http_addr;
    let state = state::AppState::new(config, Arc::new(portal));
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "byr-pet listening");
    axum::serve(listener, app).await?;
    Ok(())
}
