//! API server binary

use std::{net::SocketAddr, time::Duration};

use api::ApiState;
use clap::Parser;
use config::Opts;
use driver::PointsTracker;
use dotenvy::dotenv;
use runtime::shutdown::ShutdownSignal;
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        dotenvy::from_filename(custom_env_file)?;
    } else {
        dotenv().ok();
    }
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let tracker = PointsTracker::connect(&opts).await?;
    let state = ApiState::new(
        tracker,
        opts.api.max_requests,
        Duration::from_secs(opts.api.rate_limit_period_secs),
    );

    let addr: SocketAddr = format!("{}:{}", opts.api.host, opts.api.port).parse()?;
    server::run(addr, state, opts.api.allowed_origins(), ShutdownSignal::new()?).await
}
