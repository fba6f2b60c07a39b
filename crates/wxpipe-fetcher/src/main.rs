use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use wxpipe_core::{AppError, Config};
use wxpipe_fetcher::fetch_current_weather;
use wxpipe_store::WeatherStore;

/// Fetch the current weather for one city and print it as a record row
#[derive(Debug, Parser)]
#[command(name = "wxpipe-fetch", version)]
struct Args {
    /// Path to the config file (defaults to <config dir>/wxpipe/config.toml)
    #[arg(long, env = "WXPIPE_CONFIG")]
    config: Option<PathBuf>,

    /// City to query instead of the configured one
    #[arg(long)]
    city: Option<String>,

    /// Also insert the record into the weather_data table
    #[arg(long)]
    store: bool,
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
    if let Err(e) = config.ensure_valid() {
        tracing::error!("{} ({})", e, e.user_message());
        return Err(AppError::from(e).into());
    }

    let city = args.city.unwrap_or_else(|| config.weather.city.clone());

    let record = match fetch_current_weather(&config.weather, &city).await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!("Fetching weather for {} failed: {} ({})", city, e, e.user_message());
            return Err(AppError::from(e).into());
        }
    };

    println!("{}", record.to_json_row()?);

    if args.store {
        let database = config.database.clone();
        let stored = record.clone();
        tokio::task::spawn_blocking(move || {
            let store = WeatherStore::open(&database)?;
            store.insert_record(&stored)
        })
        .await
        .context("Store task panicked")?
        .map_err(|e| {
            tracing::error!("Storing record failed: {} ({})", e, e.user_message());
            AppError::from(e)
        })?;

        tracing::info!("Stored record for {} at {}", record.city, record.timestamp);
    }

    Ok(())
}
