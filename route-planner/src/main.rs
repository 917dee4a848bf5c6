use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use route_planner::config::AppConfig;
use route_planner::domain::Policy;
use route_planner::mbta::{MbtaClient, NetworkSource, StaticNetwork};
use route_planner::query::CoarseRouter;
use route_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let source = match &config.fixture {
        Some(path) => match StaticNetwork::load(path) {
            Ok(network) => {
                info!(path = %path.display(), lines = network.len(), "serving static network");
                NetworkSource::Static(network)
            }
            Err(e) => {
                error!(path = %path.display(), "failed to load static network: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => match MbtaClient::new(config.mbta.clone()) {
            Ok(client) => {
                if config.mbta.api_key.is_none() {
                    info!("MBTA_API_KEY not set; using anonymous API access");
                }
                NetworkSource::Live(client)
            }
            Err(e) => {
                error!("failed to create MBTA client: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let router = CoarseRouter::new(source, config.index.clone());

    // Build the default network up front so the first query is fast.
    // A failure here is not fatal; queries retry the build.
    match router.network(Policy::default()).await {
        Ok(network) => info!(stops = network.index.len(), "warmed {} network", network.policy),
        Err(e) => error!("initial network build failed: {e}"),
    }

    let app = create_router(AppState::new(router));

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.addr, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("route planner listening on http://{}", config.addr);
    info!("  GET /health");
    info!("  GET /route?from=..&to=..&policy=nominal|closure");
    info!("  GET /stops?policy=..");
    info!("  GET /lines?policy=..");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
