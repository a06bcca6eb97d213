// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationsConfig {
	/// Upper bound on a single delivery attempt.
	pub timeout: Duration,
	pub from_name: String,
}

impl Default for NotificationsConfig {
	fn default() -> Self {
		NotificationsConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationsConfigLayer {
	#[serde(default)]
	pub timeout_secs: Option<u64>,
	#[serde(default)]
	pub from_name: Option<String>,
}

impl NotificationsConfigLayer {
	pub fn merge(&mut self, other: NotificationsConfigLayer) {
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.from_name.is_some() {
			self.from_name = other.from_name;
		}
	}

	pub fn finalize(self) -> NotificationsConfig {
		NotificationsConfig {
			timeout: Duration::from_secs(self.timeout_secs.unwrap_or(10)),
			from_name: self
				.from_name
				.unwrap_or_else(|| hub_server_smtp::DEFAULT_FROM_NAME.to_string()),
		}
	}
}
