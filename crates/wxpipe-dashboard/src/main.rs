use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use wxpipe_core::{AppError, Config};
use wxpipe_dashboard::{routes, DashboardState};

/// Serve the weather dashboard
#[derive(Debug, Parser)]
#[command(name = "wxpipe-dashboard", version)]
struct Args {
    /// Path to the config file (defaults to <config dir>/wxpipe/config.toml)
    #[arg(long, env = "WXPIPE_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding dashboard.bind
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    wxpipe_core::init()?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_env();
    if let Some(bind) = args.bind {
        config.dashboard.bind = bind.to_string();
    }
    if let Err(e) = config.ensure_valid() {
        tracing::error!("{} ({})", e, e.user_message());
        return Err(AppError::from(e).into());
    }

    let addr = config.dashboard.socket_addr()?;
    let state = Arc::new(DashboardState::from_config(&config));

    let (addr, server) = warp::serve(routes(state))
        .try_bind_with_graceful_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .with_context(|| format!("Failed to bind dashboard to {}", addr))?;

    tracing::info!("Dashboard listening on http://{}", addr);
    server.await;
    tracing::info!("Dashboard stopped");

    Ok(())
}
