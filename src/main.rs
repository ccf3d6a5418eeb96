mod api;
mod config;
mod models;
mod render;
mod services;
mod sources;

use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use services::{BucketPolicy, Dashboard, DashboardLoader, QueryCache};
use sources::SubgraphClient;

fn arg_value(args: &[String], names: &[&str]) -> Option<String> {
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[tokio::main(worker_threads = 4)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,uniswap_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match arg_value(&args, &["--config", "-c"]) {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::info!("✓ Configuration loaded (endpoint: {})", config.subgraph.endpoint);

    // One client and one cache for the life of the process
    let client = Arc::new(SubgraphClient::new(&config.subgraph)?);
    let cache = Arc::new(QueryCache::new());
    let policy = BucketPolicy::from_config(&config.aggregation);
    let dashboard = Arc::new(Dashboard::new(policy));
    let loader = Arc::new(DashboardLoader::new(
        client,
        cache,
        dashboard.clone(),
        config.queries.clone(),
    ));
    tracing::info!("✓ Aggregation: {}", policy.describe());

    if let Some(path) = arg_value(&args, &["--snapshot", "-s"]) {
        loader.load_all().await;
        let html = render::render_page(&dashboard.snapshot(), config.queries.recent_swaps);
        std::fs::write(&path, html)?;
        tracing::info!("📦 Snapshot written to {}", path);
        return Ok(());
    }

    // Sections fetch on startup; the page shows them pending until they settle
    let startup = loader.clone();
    tokio::spawn(async move {
        startup.load_all().await;
    });

    let state = Arc::new(api::AppState { loader });
    let app = api::create_router(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("✓ Dashboard ready on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
