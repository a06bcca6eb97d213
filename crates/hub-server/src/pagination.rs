// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared pagination utilities for listings.

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
pub struct PaginationParams {
	pub limit: Option<i64>,
	pub offset: Option<i64>,
}

impl PaginationParams {
	pub fn new(limit: i64, offset: i64) -> Self {
		Self {
			limit: Some(limit),
			offset: Some(offset),
		}
	}

	pub fn limit_clamped(&self) -> i64 {
		self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
	}

	pub fn offset_or_default(&self) -> i64 {
		self.offset.unwrap_or(0).max(0)
	}
}
