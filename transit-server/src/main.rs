use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_server::config::ServerConfig;
use transit_server::mbta::MbtaClient;
use transit_server::planner::RoutePlanner;
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transit_server=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    if config.mbta_api_key.is_none() {
        tracing::warn!("MBTA_API_KEY not set; MBTA requests will be rate limited");
    }

    // Bad reference data is a broken deployment: fail before serving
    let planner = RoutePlanner::load(&config.data_dir)?;
    let graph = planner.graph();
    info!(
        stops = graph.stop_count(),
        edges = graph.edge_count(),
        data_dir = %config.data_dir.display(),
        "Network ready"
    );

    let mbta =
        MbtaClient::new(config.fetcher_config())?.with_aliases(planner.data().aliases.clone());

    let state = AppState::new(planner, mbta);
    let app = create_router(state, config.web_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Transit planner listening");
    info!("GET /healthz, /normalize, /plan, /route-between-stops, /plan-direct, /alerts");

    axum::serve(listener, app).await?;
    Ok(())
}
