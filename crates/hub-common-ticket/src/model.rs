// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tickets, comments and the reference entities they point at.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::{CategoryId, CommentId, TeamId, TicketId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {raw:?}")]
pub struct ParseEnumError {
	pub kind: &'static str,
	pub raw: String,
}

// =============================================================================
// Ticket enums
// =============================================================================

/// Lifecycle state of a ticket. Any value may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
	#[default]
	Open,
	InProgress,
	OnHold,
	Closed,
}

impl TicketStatus {
	pub fn all() -> &'static [TicketStatus] {
		&[
			TicketStatus::Open,
			TicketStatus::InProgress,
			TicketStatus::OnHold,
			TicketStatus::Closed,
		]
	}

	/// Storage and wire form.
	pub fn as_str(&self) -> &'static str {
		match self {
			TicketStatus::Open => "open",
			TicketStatus::InProgress => "inprogress",
			TicketStatus::OnHold => "onhold",
			TicketStatus::Closed => "closed",
		}
	}

	/// Human-readable label used in notifications.
	pub fn label(&self) -> &'static str {
		match self {
			TicketStatus::Open => "Open",
			TicketStatus::InProgress => "In Progress",
			TicketStatus::OnHold => "On Hold",
			TicketStatus::Closed => "Closed",
		}
	}
}

impl fmt::Display for TicketStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TicketStatus {
	type Err = ParseEnumError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		TicketStatus::all()
			.iter()
			.copied()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| ParseEnumError {
				kind: "ticket status",
				raw: s.to_string(),
			})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
	#[default]
	Request,
	Incident,
}

impl TicketType {
	pub fn as_str(&self) -> &'static str {
		match self {
			TicketType::Request => "request",
			TicketType::Incident => "incident",
		}
	}
}

impl fmt::Display for TicketType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TicketType {
	type Err = ParseEnumError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"request" => Ok(TicketType::Request),
			"incident" => Ok(TicketType::Incident),
			_ => Err(ParseEnumError {
				kind: "ticket type",
				raw: s.to_string(),
			}),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
	#[default]
	Low,
	Medium,
	High,
}

impl TicketPriority {
	pub fn as_str(&self) -> &'static str {
		match self {
			TicketPriority::Low => "low",
			TicketPriority::Medium => "medium",
			TicketPriority::High => "high",
		}
	}
}

impl fmt::Display for TicketPriority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TicketPriority {
	type Err = ParseEnumError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"low" => Ok(TicketPriority::Low),
			"medium" => Ok(TicketPriority::Medium),
			"high" => Ok(TicketPriority::High),
			_ => Err(ParseEnumError {
				kind: "ticket priority",
				raw: s.to_string(),
			}),
		}
	}
}

// =============================================================================
// Entities
// =============================================================================

/// Opaque reference returned by the attachment store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentRef(String);

impl AttachmentRef {
	pub fn new(reference: impl Into<String>) -> Self {
		Self(reference.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for AttachmentRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
	pub id: TeamId,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
	pub id: CategoryId,
	pub name: String,
}

/// A support ticket.
///
/// `author` is fixed once the ticket exists. `updated_at` never moves
/// backwards and is never earlier than `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
	pub id: TicketId,
	pub author: UserId,
	pub title: String,
	pub description: String,
	pub status: TicketStatus,
	#[serde(rename = "type")]
	pub ticket_type: TicketType,
	pub priority: TicketPriority,
	pub category: Option<CategoryId>,
	pub assigned_team: Option<TeamId>,
	pub assigned_technician: Option<UserId>,
	pub attachment: Option<AttachmentRef>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Ticket {
	/// `Request #: {id} - {title}`, the name tickets are referred to by in
	/// notifications.
	pub fn display_name(&self) -> String {
		format!("Request #: {} - {}", self.id, self.title)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
	pub id: CommentId,
	pub ticket_id: TicketId,
	pub author: UserId,
	pub body: String,
	pub created_at: DateTime<Utc>,
}
