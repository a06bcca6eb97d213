// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_ATTACHMENT_MAX_BYTES: u64 = 3 * 1024 * 1024;

/// Ticket image storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentsConfig {
	pub dir: PathBuf,
	pub max_bytes: u64,
}

impl Default for AttachmentsConfig {
	fn default() -> Self {
		AttachmentsConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentsConfigLayer {
	#[serde(default)]
	pub dir: Option<PathBuf>,
	#[serde(default)]
	pub max_bytes: Option<u64>,
}

impl AttachmentsConfigLayer {
	pub fn merge(&mut self, other: AttachmentsConfigLayer) {
		if other.dir.is_some() {
			self.dir = other.dir;
		}
		if other.max_bytes.is_some() {
			self.max_bytes = other.max_bytes;
		}
	}

	pub fn finalize(self) -> AttachmentsConfig {
		AttachmentsConfig {
			dir: self.dir.unwrap_or_else(|| PathBuf::from("./attachments")),
			max_bytes: self.max_bytes.unwrap_or(DEFAULT_ATTACHMENT_MAX_BYTES),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_to_three_megabytes() {
		let config = AttachmentsConfig::default();
		assert_eq!(config.max_bytes, 3_145_728);
		assert_eq!(config.dir, PathBuf::from("./attachments"));
	}
}
