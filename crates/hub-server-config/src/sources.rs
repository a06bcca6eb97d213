// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, a TOML file, the environment.

use std::path::PathBuf;
use std::str::FromStr;

use hub_common_secret::SecretString;
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	AttachmentsConfigLayer, AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LogFormat,
	LoggingConfigLayer, NotificationsConfigLayer, SmtpConfigLayer,
};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/supporthub/server.toml";

/// Source precedence levels (higher overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		Ok(ServerConfigLayer::default())
	}
}

/// A TOML file. A missing file is an empty layer, not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(DEFAULT_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Process environment, `HUB_SERVER_*`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		layer_from_lookup(|name| std::env::var(name).ok())
	}
}

/// Build a layer from any variable lookup. Empty values count as unset.
pub(crate) fn layer_from_lookup<F>(lookup: F) -> Result<ServerConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let env = Env { lookup };

	Ok(ServerConfigLayer {
		http: Some(HttpConfigLayer {
			host: env.var("HUB_SERVER_HOST"),
			port: env.parse("HUB_SERVER_PORT")?,
			base_url: env.var("HUB_SERVER_BASE_URL"),
		}),
		database: Some(DatabaseConfigLayer {
			url: env.var("HUB_SERVER_DATABASE_URL"),
		}),
		auth: Some(AuthConfigLayer {
			session_cookie_name: env.var("HUB_SERVER_SESSION_COOKIE"),
			login_path: env.var("HUB_SERVER_LOGIN_PATH"),
		}),
		attachments: Some(AttachmentsConfigLayer {
			dir: env.var("HUB_SERVER_ATTACHMENTS_DIR").map(PathBuf::from),
			max_bytes: env.parse("HUB_SERVER_ATTACHMENTS_MAX_BYTES")?,
		}),
		notifications: Some(NotificationsConfigLayer {
			timeout_secs: env.parse("HUB_SERVER_NOTIFY_TIMEOUT_SECS")?,
			from_name: env.var("HUB_SERVER_SMTP_FROM_NAME"),
		}),
		smtp: Some(SmtpConfigLayer {
			host: env.var("HUB_SERVER_SMTP_HOST"),
			port: env.parse("HUB_SERVER_SMTP_PORT")?,
			username: env.var("HUB_SERVER_SMTP_USERNAME"),
			password: env.var("HUB_SERVER_SMTP_PASSWORD").map(SecretString::new),
			from_address: env.var("HUB_SERVER_SMTP_FROM_ADDRESS"),
			use_tls: env.bool("HUB_SERVER_SMTP_USE_TLS"),
		}),
		logging: Some(LoggingConfigLayer {
			level: env.var("HUB_SERVER_LOG_LEVEL"),
			format: env
				.var("HUB_SERVER_LOG_FORMAT")
				.map(|v| LogFormat::from_str(&v))
				.transpose()?,
		}),
	})
}

struct Env<F> {
	lookup: F,
}

impl<F> Env<F>
where
	F: Fn(&str) -> Option<String>,
{
	fn var(&self, name: &str) -> Option<String> {
		(self.lookup)(name).filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self
			.var(name)
			.map(|v| !(v.eq_ignore_ascii_case("false") || v == "0"))
	}

	fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, ConfigError> {
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid {} value '{v}'", std::any::type_name::<T>()),
			}),
			None => Ok(None),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| map.get(name).cloned()
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.database.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/server.toml").load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_parses_sections() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(
			&path,
			r#"
[http]
port = 9100

[attachments]
dir = "/var/lib/supporthub/attachments"

[logging]
format = "json"
"#,
		)
		.unwrap();

		let layer = TomlSource::new(&path).load().unwrap();
		assert_eq!(layer.http.unwrap().port, Some(9100));
		assert_eq!(
			layer.attachments.unwrap().dir,
			Some(PathBuf::from("/var/lib/supporthub/attachments"))
		);
		assert_eq!(layer.logging.unwrap().format, Some(LogFormat::Json));
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(&path, "[http\nport = ").unwrap();
		assert!(matches!(
			TomlSource::new(&path).load(),
			Err(ConfigError::TomlParse { .. })
		));
	}

	#[test]
	fn test_env_lookup_reads_variables() {
		let layer = layer_from_lookup(lookup(&[
			("HUB_SERVER_PORT", "9200"),
			("HUB_SERVER_DATABASE_URL", "sqlite::memory:"),
			("HUB_SERVER_SMTP_HOST", "smtp.example.com"),
			("HUB_SERVER_SMTP_USE_TLS", "false"),
			("HUB_SERVER_SMTP_PASSWORD", "hunter2"),
			("HUB_SERVER_LOG_FORMAT", "json"),
			("HUB_SERVER_HOST", ""),
		]))
		.unwrap();

		let http = layer.http.unwrap();
		assert_eq!(http.port, Some(9200));
		assert_eq!(http.host, None);
		assert_eq!(layer.database.unwrap().url.as_deref(), Some("sqlite::memory:"));
		let smtp = layer.smtp.unwrap();
		assert_eq!(smtp.use_tls, Some(false));
		assert!(!format!("{smtp:?}").contains("hunter2"));
		assert_eq!(layer.logging.unwrap().format, Some(LogFormat::Json));
	}

	#[test]
	fn test_env_invalid_number_is_invalid_value() {
		let err = layer_from_lookup(lookup(&[("HUB_SERVER_ATTACHMENTS_MAX_BYTES", "lots")])).unwrap_err();
		match err {
			ConfigError::InvalidValue { key, .. } => assert_eq!(key, "HUB_SERVER_ATTACHMENTS_MAX_BYTES"),
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn test_env_invalid_log_format_is_invalid_value() {
		assert!(matches!(
			layer_from_lookup(lookup(&[("HUB_SERVER_LOG_FORMAT", "xml")])),
			Err(ConfigError::InvalidValue { .. })
		));
	}

	proptest::proptest! {
		#[test]
		fn test_env_port_accepts_any_u16(port in proptest::num::u16::ANY) {
			let value = port.to_string();
			let layer = layer_from_lookup(lookup(&[("HUB_SERVER_PORT", value.as_str())])).unwrap();
			proptest::prop_assert_eq!(layer.http.unwrap().port, Some(port));
		}
	}
}
