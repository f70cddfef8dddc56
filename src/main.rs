#![allow(non_snake_case)]

use std::env;

use calendarGrid::config::{AppConfig, RunMode, Settings};
use calendarGrid::{cli, runtime};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            error!("Ignoring config file {}: {}", path, err);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    };

    let settings = match Settings::from_config(&config) {
        Ok(settings) => settings,
        Err(err) => {
            error!("{}", err);
            std::process::exit(2);
        }
    };

    match settings.run_mode {
        RunMode::Api => {
            if let Err(err) = runtime::run_api(settings).await {
                error!("{}", err);
                std::process::exit(1);
            }
        }
        RunMode::Cli => {
            if let Err(err) = cli::cli(settings).await {
                error!("{}", err);
                std::process::exit(1);
            }
        }
    }
}
