// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the Support Hub server.
//!
//! Sources are merged in precedence order: built-in defaults, then the TOML
//! file (`/etc/supporthub/server.toml` unless overridden), then
//! `HUB_SERVER_*` environment variables.
//!
//! ```ignore
//! use hub_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use hub_server_smtp::SmtpConfig;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, DEFAULT_CONFIG_PATH};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub attachments: AttachmentsConfig,
	pub notifications: NotificationsConfig,
	/// `None` disables email delivery.
	pub smtp: Option<SmtpConfig>,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load from defaults, the system config file and the environment.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

/// Like [`load_config`] but reading the given file instead of the system one.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

pub fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let auth = layer.auth.unwrap_or_default().finalize();
	let attachments = layer.attachments.unwrap_or_default().finalize();
	let notifications = layer.notifications.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let smtp = match layer.smtp {
		Some(smtp) => smtp.build(&notifications.from_name)?,
		None => None,
	};

	validate(&attachments, &notifications)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		attachments_dir = %attachments.dir.display(),
		smtp_configured = smtp.is_some(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		auth,
		attachments,
		notifications,
		smtp,
		logging,
	})
}

fn validate(
	attachments: &AttachmentsConfig,
	notifications: &NotificationsConfig,
) -> Result<(), ConfigError> {
	if attachments.max_bytes == 0 {
		return Err(ConfigError::Validation(
			"attachments.max_bytes must be greater than zero".to_string(),
		));
	}
	if notifications.timeout.is_zero() {
		return Err(ConfigError::Validation(
			"notifications.timeout_secs must be greater than zero".to_string(),
		));
	}
	Ok(())
}
