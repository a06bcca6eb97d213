// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP handlers. Each one parses the request, calls into
//! [`HubActions`](crate::actions::HubActions) and renders the result.

pub mod health;
pub mod profiles;
pub mod tickets;

use std::str::FromStr;

use hub_common_ticket::IdParseError;

use crate::error::ActionError;

/// Parse a path identifier. Anything that is not a positive integer becomes
/// [`ActionError::MalformedIdentifier`], which redirects instead of failing.
pub(crate) fn parse_id<T>(raw: &str) -> Result<T, ActionError>
where
	T: FromStr<Err = IdParseError>,
{
	raw.parse::<T>().map_err(ActionError::from)
}
