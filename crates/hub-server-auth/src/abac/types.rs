// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Actions, resource attributes and decisions.

use hub_common_ticket::{Ticket, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::Profile;

/// Operations checked by the policy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	ViewTicket,
	EditTicket,
	DeleteTicket,
	ViewProfile,
	EditProfile,
	ListAllProfiles,
}

impl Action {
	pub fn all() -> &'static [Action] {
		&[
			Action::ViewTicket,
			Action::EditTicket,
			Action::DeleteTicket,
			Action::ViewProfile,
			Action::EditProfile,
			Action::ListAllProfiles,
		]
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Action::ViewTicket => "view_ticket",
			Action::EditTicket => "edit_ticket",
			Action::DeleteTicket => "delete_ticket",
			Action::ViewProfile => "view_profile",
			Action::EditProfile => "edit_profile",
			Action::ListAllProfiles => "list_all_profiles",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
	Ticket,
	Profile,
	/// The collection of all profiles, checked by listings.
	ProfileDirectory,
}

/// What the engine knows about the resource being accessed.
///
/// For tickets `owner_user_id` is the author; for profiles it is the
/// profile's own id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAttrs {
	pub resource_type: ResourceType,
	pub owner_user_id: Option<UserId>,
}

impl ResourceAttrs {
	pub fn ticket(author: UserId) -> Self {
		Self {
			resource_type: ResourceType::Ticket,
			owner_user_id: Some(author),
		}
	}

	/// A ticket whose author is not known yet. Only role-gated actions
	/// (deletion) can be allowed against it.
	pub fn any_ticket() -> Self {
		Self {
			resource_type: ResourceType::Ticket,
			owner_user_id: None,
		}
	}

	pub fn profile(profile_id: UserId) -> Self {
		Self {
			resource_type: ResourceType::Profile,
			owner_user_id: Some(profile_id),
		}
	}

	pub fn profile_directory() -> Self {
		Self {
			resource_type: ResourceType::ProfileDirectory,
			owner_user_id: None,
		}
	}

	pub fn is_owned_by(&self, user_id: UserId) -> bool {
		self.owner_user_id == Some(user_id)
	}
}

impl From<&Ticket> for ResourceAttrs {
	fn from(ticket: &Ticket) -> Self {
		Self::ticket(ticket.author)
	}
}

impl From<&Profile> for ResourceAttrs {
	fn from(profile: &Profile) -> Self {
		Self::profile(profile.id)
	}
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
	Allow,
	Deny,
}

impl Decision {
	pub fn is_allowed(self) -> bool {
		self == Decision::Allow
	}
}

impl From<bool> for Decision {
	fn from(allowed: bool) -> Self {
		if allowed {
			Decision::Allow
		} else {
			Decision::Deny
		}
	}
}
