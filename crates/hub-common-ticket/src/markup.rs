// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rich-text helpers.
//!
//! Descriptions and comment bodies arrive as editor HTML. Validation and the
//! plain notification variant both work on the stripped text.

/// Remove tags and turn `&nbsp;` into a plain space.
///
/// Other entities are left as written.
pub fn strip_markup(html: &str) -> String {
	let mut result = String::with_capacity(html.len());
	let mut in_tag = false;

	for c in html.chars() {
		match c {
			'<' => in_tag = true,
			'>' if in_tag => in_tag = false,
			_ if !in_tag => result.push(c),
			_ => {}
		}
	}

	result.replace("&nbsp;", " ")
}

/// Escape text for inclusion in an HTML body.
pub fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}
	escaped
}
