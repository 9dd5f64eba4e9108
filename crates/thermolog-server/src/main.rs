// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use thermolog_server::config::ServerConfig;
use thermolog_server::{app_state, routes};

#[derive(Debug, Parser)]
#[command(name = "thermolog-server", about = "Collects sensor readings and serves a chart")]
struct Args {
    /// TOML config file. Defaults to ./thermolog.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding config and $PORT.
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep readings in an in-memory database that is lost on exit.
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("thermolog_server=info,thermolog_core=info,tower_http=info")
        }))
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::load(args.config.as_deref())?;
    config.apply_env_overrides()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.memory {
        ":memory:".clone_into(&mut config.database.path);
    }
    info!(
        offset_minutes = config.display.utc_offset_minutes,
        timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    let state = app_state(&config)?;
    info!(path = %config.database.path, "Database opened");

    let app = routes::router(state);

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Thermolog listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
