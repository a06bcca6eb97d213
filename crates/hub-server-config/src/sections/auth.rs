// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

/// Where sessions come from and where anonymous users are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
	pub session_cookie_name: String,
	pub login_path: String,
}

impl Default for AuthConfig {
	fn default() -> Self {
		AuthConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub session_cookie_name: Option<String>,
	#[serde(default)]
	pub login_path: Option<String>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.session_cookie_name.is_some() {
			self.session_cookie_name = other.session_cookie_name;
		}
		if other.login_path.is_some() {
			self.login_path = other.login_path;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			session_cookie_name: self
				.session_cookie_name
				.unwrap_or_else(|| "supporthub_session".to_string()),
			login_path: self
				.login_path
				.unwrap_or_else(|| "/accounts/login/".to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = AuthConfig::default();
		assert_eq!(config.session_cookie_name, "supporthub_session");
		assert_eq!(config.login_path, "/accounts/login/");
	}
}
