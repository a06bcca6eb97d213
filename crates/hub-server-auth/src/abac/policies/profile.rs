// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile access policies.

use crate::abac::{Action, ResourceAttrs};
use crate::types::Principal;

/// A profile is visible and editable by its owner and by administrators.
pub fn evaluate_profile(principal: &Principal, action: Action, resource: &ResourceAttrs) -> bool {
	match action {
		Action::ViewProfile | Action::EditProfile => {
			resource.is_owned_by(principal.id) || principal.is_administrator()
		}
		_ => false,
	}
}

/// Only administrators may list every profile. Everyone else is denied
/// outright rather than shown an empty page.
pub fn evaluate_directory(principal: &Principal, action: Action) -> bool {
	matches!(action, Action::ListAllProfiles) && principal.is_administrator()
}
