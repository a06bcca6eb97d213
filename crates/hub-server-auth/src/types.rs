// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Roles and the resolved request principal.

use hub_common_ticket::{ParseEnumError, TeamId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Roles
// =============================================================================

/// Support Hub roles. Technician and Administrator are the elevated roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	Administrator,
	Technician,
	#[default]
	Customer,
}

impl Role {
	pub fn all() -> &'static [Role] {
		&[Role::Administrator, Role::Technician, Role::Customer]
	}

	/// Technicians and administrators see and edit every ticket.
	pub fn is_elevated(&self) -> bool {
		matches!(self, Role::Administrator | Role::Technician)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Role::Administrator => "administrator",
			Role::Technician => "technician",
			Role::Customer => "customer",
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Role {
	type Err = ParseEnumError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"administrator" => Ok(Role::Administrator),
			"technician" => Ok(Role::Technician),
			"customer" => Ok(Role::Customer),
			_ => Err(ParseEnumError {
				kind: "role",
				raw: s.to_string(),
			}),
		}
	}
}

// =============================================================================
// Principal
// =============================================================================

/// The authenticated actor behind a request, resolved once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	pub id: UserId,
	pub username: String,
	pub role: Role,
	pub team: Option<TeamId>,
}

impl Principal {
	pub fn new(id: UserId, username: impl Into<String>, role: Role) -> Self {
		Self {
			id,
			username: username.into(),
			role,
			team: None,
		}
	}

	pub fn with_team(mut self, team: TeamId) -> Self {
		self.team = Some(team);
		self
	}

	pub fn is_elevated(&self) -> bool {
		self.role.is_elevated()
	}

	pub fn is_administrator(&self) -> bool {
		self.role == Role::Administrator
	}
}
