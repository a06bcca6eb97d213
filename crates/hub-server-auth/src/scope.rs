// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Query scope builder.
//!
//! The scope is the widest set of tickets a principal can ever see in a
//! listing. It is applied before any user filter, so filters can only narrow
//! it.

use hub_common_ticket::{Ticket, UserId};
use serde::{Deserialize, Serialize};

use crate::types::Principal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "user_id")]
pub enum TicketScope {
	/// Every ticket. Technicians and administrators.
	All,
	/// Tickets authored by one user. Customers.
	AuthoredBy(UserId),
}

impl TicketScope {
	pub fn permits(&self, ticket: &Ticket) -> bool {
		match self {
			TicketScope::All => true,
			TicketScope::AuthoredBy(author) => ticket.author == *author,
		}
	}
}

/// Team membership does not narrow what elevated roles see.
pub fn scope_for(principal: &Principal) -> TicketScope {
	if principal.is_elevated() {
		TicketScope::All
	} else {
		TicketScope::AuthoredBy(principal.id)
	}
}
