// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integer id newtypes.
//!
//! Every Support Hub entity is keyed by a store-assigned positive integer.
//! Path segments are parsed through [`std::str::FromStr`]; a segment that is
//! not a positive integer yields [`IdParseError`], which the action layer
//! turns into a redirect rather than an internal error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {raw:?}")]
pub struct IdParseError {
	pub kind: &'static str,
	pub raw: String,
}

macro_rules! define_id_type {
	($name:ident, $kind:literal, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(i64);

		impl $name {
			pub const fn new(id: i64) -> Self {
				Self(id)
			}

			pub fn into_inner(self) -> i64 {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<i64> for $name {
			fn from(id: i64) -> Self {
				Self(id)
			}
		}

		impl From<$name> for i64 {
			fn from(id: $name) -> Self {
				id.0
			}
		}

		impl FromStr for $name {
			type Err = IdParseError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s.parse::<i64>() {
					Ok(id) if id > 0 => Ok(Self(id)),
					_ => Err(IdParseError {
						kind: $kind,
						raw: s.to_string(),
					}),
				}
			}
		}
	};
}

define_id_type!(TicketId, "ticket id", "Unique identifier for a ticket.");
define_id_type!(CommentId, "comment id", "Unique identifier for a comment.");
define_id_type!(UserId, "user id", "Unique identifier for a user profile.");
define_id_type!(TeamId, "team id", "Unique identifier for a support team.");
define_id_type!(CategoryId, "category id", "Unique identifier for a ticket category.");
