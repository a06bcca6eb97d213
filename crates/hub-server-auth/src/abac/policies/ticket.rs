// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket access policies.
//!
//! Viewing and editing follow authorship or an elevated role. Deletion is
//! role-gated only; authorship never grants it.

use crate::abac::{Action, ResourceAttrs};
use crate::types::Principal;

pub fn evaluate(principal: &Principal, action: Action, resource: &ResourceAttrs) -> bool {
	let is_author = resource.is_owned_by(principal.id);

	match action {
		Action::ViewTicket | Action::EditTicket => is_author || principal.is_elevated(),
		Action::DeleteTicket => principal.is_elevated(),
		_ => false,
	}
}
