// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrapper for credentials.
//!
//! Support Hub only holds one kind of credential in memory: the SMTP password
//! used by the notification transport. It lives in a [`SecretString`] so that
//! configuration dumps, `Debug` output and structured log fields print
//! `[REDACTED]` instead of the value.
//!
//! ```
//! use hub_common_secret::SecretString;
//!
//! let password = SecretString::new("hunter2".to_string());
//! assert_eq!(format!("{password}"), "[REDACTED]");
//! assert_eq!(password.expose(), "hunter2");
//! ```

use std::fmt;
use zeroize::Zeroize;

/// Placeholder printed wherever a secret would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

/// A value that is never printed and is zeroed when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the wrapped value. Every call site is a deliberate disclosure.
	pub fn expose(&self) -> &T {
		&self.inner
	}

	/// Hand out an owned copy, leaving the original to be zeroed on drop.
	pub fn into_inner(self) -> T
	where
		T: Clone,
	{
		self.inner.clone()
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self::new(self.inner.clone())
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Zeroize,
	{
		fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn formatting_hides_smtp_password() {
		let password = SecretString::new("smtp-pass-123".to_string());
		assert_eq!(format!("{password}"), REDACTED);
		assert_eq!(format!("{password:?}"), "Secret(\"[REDACTED]\")");
	}

	#[test]
	fn optional_password_in_config_debug_is_hidden() {
		let password: Option<SecretString> = Some(SecretString::new("smtp-pass-123".to_string()));
		let debug = format!("{password:?}");
		assert!(!debug.contains("smtp-pass-123"));
	}

	#[test]
	fn expose_and_into_inner_return_value() {
		let password = SecretString::new("smtp-pass-123".to_string());
		assert_eq!(password.expose(), "smtp-pass-123");
		assert_eq!(password.clone().into_inner(), "smtp-pass-123");
	}

	#[cfg(feature = "serde")]
	#[test]
	fn serde_redacts_on_write_and_reads_plain_value() {
		let password: SecretString = serde_json::from_str(r#""smtp-pass-123""#).unwrap();
		assert_eq!(password.expose(), "smtp-pass-123");
		assert_eq!(serde_json::to_string(&password).unwrap(), r#""[REDACTED]""#);
	}

	proptest! {
		#[test]
		fn display_never_leaks(inner in "[a-z0-9]{12,40}") {
			let secret = SecretString::new(inner.clone());
			let display = format!("{secret}");
			let debug = format!("{secret:?}");
			prop_assert!(!display.contains(&inner));
			prop_assert!(!debug.contains(&inner));
		}
	}
}
