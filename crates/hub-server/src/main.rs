// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Support Hub server binary.

use std::time::Duration;

use clap::{Parser, Subcommand};
use hub_server::{create_app_state, create_router};
use hub_server_config::{LogFormat, ServerConfig};
use hub_server_db::{SessionRepository, SqlitePool};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Support Hub - ticket tracking server.
#[derive(Parser, Debug)]
#[command(name = "hub-server", about = "Support Hub ticket server", version)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/supporthub/server.toml)
	#[arg(long, env = "HUB_SERVER_CONFIG")]
	config: Option<std::path::PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the HTTP server (default)
	Serve,
	/// Apply database migrations and exit
	Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => hub_server_config::load_config_with_file(path)?,
		None => hub_server_config::load_config()?,
	};

	init_tracing(&config);

	let pool = hub_server_db::create_pool(&config.database.url).await?;
	hub_server_db::run_migrations(&pool).await?;
	tracing::info!(database = %config.database.url, "migrations applied");

	match args.command.unwrap_or(Command::Serve) {
		Command::Migrate => Ok(()),
		Command::Serve => serve(pool, &config).await,
	}
}

fn init_tracing(config: &ServerConfig) {
	let json = config.logging.format == LogFormat::Json;
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with((!json).then(|| tracing_subscriber::fmt::layer()))
		.with(json.then(|| tracing_subscriber::fmt::layer().json()))
		.init();
}

async fn serve(pool: SqlitePool, config: &ServerConfig) -> anyhow::Result<()> {
	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		base_url = %config.http.base_url,
		"starting hub-server"
	);

	spawn_session_cleanup(SessionRepository::new(pool.clone()));

	let state = create_app_state(pool, config)?;
	let app = create_router(state).layer(TraceLayer::new_for_http());

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

/// Periodically drop expired sessions. They already resolve to no
/// principal; this only keeps the table small.
fn spawn_session_cleanup(sessions: SessionRepository) {
	tokio::spawn(async move {
		let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
		loop {
			interval.tick().await;
			match sessions.cleanup_expired_sessions(chrono::Utc::now()).await {
				Ok(0) => {}
				Ok(removed) => tracing::info!(removed, "expired sessions removed"),
				Err(e) => tracing::warn!(error = %e, "session cleanup failed"),
			}
		}
	});
}
