// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use hub_common_secret::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::SmtpError;

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_FROM_NAME: &str = "Support Hub";

/// Connection settings for the outbound relay.
///
/// Usually built by the server configuration layer rather than by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
	pub host: String,

	#[serde(default = "default_port")]
	pub port: u16,

	/// Authentication is only attempted when both username and password are set.
	pub username: Option<String>,
	pub password: Option<SecretString>,

	pub from_address: String,

	#[serde(default = "default_from_name")]
	pub from_name: String,

	/// STARTTLS. Plain connections are only meant for local relays.
	#[serde(default = "default_use_tls")]
	pub use_tls: bool,
}

fn default_port() -> u16 {
	DEFAULT_SMTP_PORT
}

fn default_from_name() -> String {
	DEFAULT_FROM_NAME.to_string()
}

fn default_use_tls() -> bool {
	true
}

impl SmtpConfig {
	/// Reject settings that could never deliver anything.
	pub fn validate(&self) -> Result<(), SmtpError> {
		if self.host.trim().is_empty() {
			return Err(SmtpError::Config("host must not be empty".into()));
		}
		if self.port == 0 {
			return Err(SmtpError::Config("port must be non-zero".into()));
		}
		if self.from_address.trim().is_empty() {
			return Err(SmtpError::Config("from_address must not be empty".into()));
		}
		if self.username.is_some() != self.password.is_some() {
			return Err(SmtpError::Config(
				"username and password must be set together".into(),
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn config() -> SmtpConfig {
		SmtpConfig {
			host: "smtp.example.com".to_string(),
			port: 587,
			username: Some("hub".to_string()),
			password: Some(SecretString::new("super-secret-password".to_string())),
			from_address: "support@example.com".to_string(),
			from_name: "Support Hub".to_string(),
			use_tls: true,
		}
	}

	#[test]
	fn debug_does_not_leak_password() {
		let debug = format!("{:?}", config());
		assert!(!debug.contains("super-secret-password"));
		assert!(debug.contains("[REDACTED]"));
	}

	#[test]
	fn deserialize_applies_defaults() {
		let parsed: SmtpConfig = serde_json::from_str(
			r#"{"host":"relay.local","from_address":"hub@example.com","username":null,"password":null}"#,
		)
		.unwrap();
		assert_eq!(parsed.port, DEFAULT_SMTP_PORT);
		assert_eq!(parsed.from_name, DEFAULT_FROM_NAME);
		assert!(parsed.use_tls);
		assert!(parsed.validate().is_ok());
	}

	#[test]
	fn validate_rejects_half_credentials() {
		let mut c = config();
		c.password = None;
		assert!(matches!(c.validate(), Err(SmtpError::Config(_))));
	}

	#[test]
	fn validate_rejects_blank_host() {
		let mut c = config();
		c.host = "  ".to_string();
		assert!(c.validate().is_err());
	}

	proptest! {
		#[test]
		fn password_never_in_debug(password in "[a-zA-Z0-9!@#$%^&*]{8,32}") {
			prop_assume!(!password.contains("REDACTED"));
			prop_assume!(!password.contains("Secret"));
			let mut c = config();
			c.password = Some(SecretString::new(password.clone()));
			let debug = format!("{:?}", c);
			prop_assert!(!debug.contains(&password));
		}
	}
}
