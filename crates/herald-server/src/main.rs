// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Herald news search server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use herald_server::{create_router, AppState};
use herald_server_search_service::SearchService;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// Herald server - news search over GNews, Google CSE and AI providers.
#[derive(Parser, Debug)]
#[command(name = "herald-server", about = "Herald news search server", version)]
struct Args {
	/// TOML configuration file (defaults to /etc/herald/server.toml)
	#[arg(long, env = "HERALD_SERVER_CONFIG")]
	config: Option<PathBuf>,

	/// Subcommands for herald-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => herald_server_config::load_config_with_file(path.clone())?,
		None => herald_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		strategy = %config.orchestration.strategy,
		"starting herald-server"
	);

	let service = SearchService::from_config(&config)?;
	let status = service.status();
	if !status.gnews && status.ai.is_empty() {
		tracing::warn!("No news or AI provider configured; POST /api/search will fail until keys are set");
	}
	tracing::info!(
		gnews = status.gnews,
		google_cse = status.google_cse,
		ai = ?status.ai,
		"Search providers initialized"
	);

	let app = create_router(AppState::new(service))
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
