//! REST API server for the shipment delay dashboard
//!
//! Usage:
//!   ./target/release/api_server [options]
//!
//! Options:
//!   --port PORT            Port to listen on (default: 8080)
//!   --data PATH            Local shipment CSV (default: data/shipments.csv)
//!   --resource-id ID       Download the dataset with this identifier instead
//!   --url-template URL     Download URL, `{id}` is replaced by the identifier
//!   --cache-file PATH      Where the download is stored
//!
//! REST endpoints:
//!   GET  /api/v1/health             - Health check
//!   GET  /api/v1/date-range         - Default date-picker bounds
//!   GET  /api/v1/dashboard          - Full dashboard view (?start=&end=)
//!   GET  /api/v1/summary            - Markdown summary (?start=&end=)
//!   POST /api/v1/cache/invalidate   - Reload the dataset on next request

use anyhow::Result;
use clap::Parser;
use shipment_delay_dashboard::{
    api::{create_router, DashboardService},
    config::SourceArgs,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "api_server")]
#[command(about = "REST API for the shipment delay dashboard")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    #[command(flatten)]
    source: SourceArgs,
}

fn print_banner(port: u16, source: &str) {
    println!("============================================================");
    println!("         SHIPMENT DELAY DASHBOARD API SERVER");
    println!("============================================================");
    println!();
    println!("  Port:     {}", port);
    println!("  REST:     http://localhost:{}/api/v1/", port);
    println!("  Source:   {}", source);
    println!();
    println!("REST Endpoints:");
    println!("  GET  /api/v1/health            Health check");
    println!("  GET  /api/v1/date-range        Date-picker bounds");
    println!("  GET  /api/v1/dashboard         Dashboard view");
    println!("  GET  /api/v1/summary           Markdown summary");
    println!("  POST /api/v1/cache/invalidate  Reload dataset");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .init();

    let args = Args::parse();
    let source = args.source.source();
    print_banner(args.port, &source.to_string());

    let service = Arc::new(DashboardService::new(source, args.source.loader()));

    // Load eagerly; a failure here is reported again on each request
    if let Err(e) = service.table().await {
        tracing::warn!("Dataset not loaded yet: {}", e);
    }

    let addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    let app = create_router(service);
    tracing::info!("Starting REST server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
