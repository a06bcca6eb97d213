// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outbound relay for notifications. Optional: absent means delivery is
//! disabled.

use hub_common_secret::SecretString;
use hub_server_smtp::{SmtpConfig, DEFAULT_SMTP_PORT};
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmtpConfigLayer {
	pub host: Option<String>,
	pub port: Option<u16>,
	pub username: Option<String>,
	pub password: Option<SecretString>,
	pub from_address: Option<String>,
	pub use_tls: Option<bool>,
}

impl SmtpConfigLayer {
	pub fn merge(&mut self, other: SmtpConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.username.is_some() {
			self.username = other.username;
		}
		if other.password.is_some() {
			self.password = other.password;
		}
		if other.from_address.is_some() {
			self.from_address = other.from_address;
		}
		if other.use_tls.is_some() {
			self.use_tls = other.use_tls;
		}
	}

	pub fn is_configured(&self) -> bool {
		self.host.as_ref().is_some_and(|h| !h.is_empty())
	}

	/// `Ok(None)` when no host is set.
	///
	/// # Errors
	/// `ConfigError::Validation` if a host is set without a from address.
	pub fn build(self, from_name: &str) -> Result<Option<SmtpConfig>, ConfigError> {
		let Some(host) = self.host.filter(|h| !h.is_empty()) else {
			return Ok(None);
		};

		let from_address = self
			.from_address
			.filter(|a| !a.is_empty())
			.ok_or_else(|| {
				ConfigError::Validation(
					"SMTP from_address is required when host is configured".to_string(),
				)
			})?;

		Ok(Some(SmtpConfig {
			host,
			port: self.port.unwrap_or(DEFAULT_SMTP_PORT),
			username: self.username,
			password: self.password,
			from_address,
			from_name: from_name.to_string(),
			use_tls: self.use_tls.unwrap_or(true),
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn returns_none_when_host_not_set() {
		let layer = SmtpConfigLayer::default();
		assert!(!layer.is_configured());
		assert!(layer.build("Support Hub").unwrap().is_none());
	}

	#[test]
	fn returns_none_when_host_is_empty() {
		let layer = SmtpConfigLayer {
			host: Some(String::new()),
			..Default::default()
		};
		assert!(layer.build("Support Hub").unwrap().is_none());
	}

	#[test]
	fn requires_from_address_when_host_set() {
		let layer = SmtpConfigLayer {
			host: Some("smtp.example.com".to_string()),
			..Default::default()
		};
		assert!(matches!(
			layer.build("Support Hub"),
			Err(ConfigError::Validation(_))
		));
	}

	#[test]
	fn builds_with_defaults() {
		let layer = SmtpConfigLayer {
			host: Some("smtp.example.com".to_string()),
			from_address: Some("support@example.com".to_string()),
			password: Some(SecretString::new("pw".to_string())),
			username: Some("hub".to_string()),
			..Default::default()
		};
		let config = layer.build("Helpdesk").unwrap().unwrap();
		assert_eq!(config.port, 587);
		assert!(config.use_tls);
		assert_eq!(config.from_name, "Helpdesk");
		assert_eq!(config.password.as_ref().map(|p| p.expose().as_str()), Some("pw"));
	}
}
