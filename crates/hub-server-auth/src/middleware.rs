// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session token extraction and hashing.
//!
//! Tokens arrive either as a session cookie or as an `Authorization: Bearer`
//! header. Only their SHA-256 hash is ever looked up or stored.

use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;

/// Default session cookie name.
pub const SESSION_COOKIE_NAME: &str = "supporthub_session";

/// Extract the session cookie named `cookie_name`.
pub fn extract_session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			if name == cookie_name && !value.is_empty() {
				Some(value.to_string())
			} else {
				None
			}
		})
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	headers
		.get(AUTHORIZATION)?
		.to_str()
		.ok()?
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(str::to_string)
}

/// SHA-256 of the token, hex-encoded. Safe to log and store.
pub fn hash_token(token: &str) -> String {
	use sha2::{Digest, Sha256};
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}
