// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client-submitted ticket payloads.
//!
//! A [`TicketPayload`] carries only the fields a client sent. Which of those
//! survive is decided elsewhere (see the field-set resolver in
//! `hub-server-auth`); this module only knows how to enumerate and drop them.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::ids::{CategoryId, TeamId, UserId};
use crate::model::{TicketPriority, TicketStatus, TicketType};

/// Mutable ticket fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketField {
	Author,
	Status,
	Priority,
	AssignedTeam,
	AssignedTechnician,
	Type,
	Category,
	Title,
	Description,
	Attachment,
}

impl TicketField {
	pub fn all() -> &'static [TicketField] {
		&[
			TicketField::Author,
			TicketField::Status,
			TicketField::Priority,
			TicketField::AssignedTeam,
			TicketField::AssignedTechnician,
			TicketField::Type,
			TicketField::Category,
			TicketField::Title,
			TicketField::Description,
			TicketField::Attachment,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			TicketField::Author => "author",
			TicketField::Status => "status",
			TicketField::Priority => "priority",
			TicketField::AssignedTeam => "assigned_team",
			TicketField::AssignedTechnician => "assigned_technician",
			TicketField::Type => "type",
			TicketField::Category => "category",
			TicketField::Title => "title",
			TicketField::Description => "description",
			TicketField::Attachment => "attachment",
		}
	}
}

impl fmt::Display for TicketField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An uploaded image, base64-encoded on the wire.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentUpload {
	pub filename: String,
	pub content_type: String,
	#[serde(with = "base64_bytes")]
	pub data: Vec<u8>,
}

impl fmt::Debug for AttachmentUpload {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AttachmentUpload")
			.field("filename", &self.filename)
			.field("content_type", &self.content_type)
			.field("len", &self.data.len())
			.finish()
	}
}

mod base64_bytes {
	use base64::engine::general_purpose::STANDARD;
	use base64::Engine;
	use serde::{Deserialize, Deserializer, Serializer};

	pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&STANDARD.encode(data))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
		let encoded = String::deserialize(deserializer)?;
		STANDARD
			.decode(encoded.as_bytes())
			.map_err(serde::de::Error::custom)
	}
}

/// Distinguishes an explicit `null` (clear the reference) from an absent key.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	T::deserialize(deserializer).map(Some)
}

/// Partial ticket as submitted for create or update.
///
/// For the nullable references, `None` means "not sent" and `Some(None)`
/// means "clear it".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketPayload {
	pub author: Option<UserId>,
	pub title: Option<String>,
	pub description: Option<String>,
	pub status: Option<TicketStatus>,
	#[serde(rename = "type")]
	pub ticket_type: Option<TicketType>,
	pub priority: Option<TicketPriority>,
	#[serde(deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
	pub category: Option<Option<CategoryId>>,
	#[serde(deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
	pub assigned_team: Option<Option<TeamId>>,
	#[serde(deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
	pub assigned_technician: Option<Option<UserId>>,
	pub attachment: Option<AttachmentUpload>,
}

impl TicketPayload {
	pub fn has(&self, field: TicketField) -> bool {
		match field {
			TicketField::Author => self.author.is_some(),
			TicketField::Title => self.title.is_some(),
			TicketField::Description => self.description.is_some(),
			TicketField::Status => self.status.is_some(),
			TicketField::Type => self.ticket_type.is_some(),
			TicketField::Priority => self.priority.is_some(),
			TicketField::Category => self.category.is_some(),
			TicketField::AssignedTeam => self.assigned_team.is_some(),
			TicketField::AssignedTechnician => self.assigned_technician.is_some(),
			TicketField::Attachment => self.attachment.is_some(),
		}
	}

	pub fn present_fields(&self) -> Vec<TicketField> {
		TicketField::all()
			.iter()
			.copied()
			.filter(|field| self.has(*field))
			.collect()
	}

	pub fn clear(&mut self, field: TicketField) {
		match field {
			TicketField::Author => self.author = None,
			TicketField::Title => self.title = None,
			TicketField::Description => self.description = None,
			TicketField::Status => self.status = None,
			TicketField::Type => self.ticket_type = None,
			TicketField::Priority => self.priority = None,
			TicketField::Category => self.category = None,
			TicketField::AssignedTeam => self.assigned_team = None,
			TicketField::AssignedTechnician => self.assigned_technician = None,
			TicketField::Attachment => self.attachment = None,
		}
	}

	/// Drop every present field not in `allowed`, returning what was dropped.
	pub fn retain_fields(&mut self, allowed: &[TicketField]) -> Vec<TicketField> {
		let dropped: Vec<TicketField> = self
			.present_fields()
			.into_iter()
			.filter(|field| !allowed.contains(field))
			.collect();
		for field in &dropped {
			self.clear(*field);
		}
		dropped
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn absent_null_and_value_are_distinct() {
		let absent: TicketPayload = serde_json::from_str("{}").unwrap();
		assert_eq!(absent.category, None);

		let cleared: TicketPayload = serde_json::from_str(r#"{"category": null}"#).unwrap();
		assert_eq!(cleared.category, Some(None));

		let set: TicketPayload = serde_json::from_str(r#"{"category": 4}"#).unwrap();
		assert_eq!(set.category, Some(Some(CategoryId::new(4))));
	}

	#[test]
	fn type_key_maps_to_ticket_type() {
		let payload: TicketPayload = serde_json::from_str(r#"{"type": "incident"}"#).unwrap();
		assert_eq!(payload.ticket_type, Some(TicketType::Incident));
	}

	#[test]
	fn attachment_data_is_base64() {
		let payload: TicketPayload = serde_json::from_str(
			r#"{"attachment": {"filename": "a.png", "content_type": "image/png", "data": "AAEC"}}"#,
		)
		.unwrap();
		assert_eq!(payload.attachment.unwrap().data, vec![0, 1, 2]);
	}

	#[test]
	fn invalid_base64_is_a_deserialization_error() {
		let result: Result<TicketPayload, _> = serde_json::from_str(
			r#"{"attachment": {"filename": "a.png", "content_type": "image/png", "data": "!!"}}"#,
		);
		assert!(result.is_err());
	}

	#[test]
	fn retain_fields_drops_and_reports() {
		let mut payload = TicketPayload {
			title: Some("A long enough title".to_string()),
			status: Some(TicketStatus::Closed),
			author: Some(UserId::new(9)),
			..Default::default()
		};
		let dropped = payload.retain_fields(&[TicketField::Title]);
		assert_eq!(dropped, vec![TicketField::Author, TicketField::Status]);
		assert_eq!(payload.present_fields(), vec![TicketField::Title]);
	}

	#[test]
	fn debug_does_not_dump_attachment_bytes() {
		let upload = AttachmentUpload {
			filename: "a.png".to_string(),
			content_type: "image/png".to_string(),
			data: vec![0xAB; 64],
		};
		let debug = format!("{upload:?}");
		assert!(debug.contains("len: 64"));
		assert!(!debug.contains("171"));
	}
}
