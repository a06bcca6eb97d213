// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User profiles and profile edit payloads.

use chrono::{DateTime, Utc};
use hub_common_ticket::{TeamId, UserId, ValidationCode, ValidationError, ValidationErrors};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::types::{Principal, Role};

pub const NAME_MAX_CHARS: usize = 30;
pub const USERNAME_MAX_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	pub id: UserId,
	pub username: String,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub role: Role,
	pub team: Option<TeamId>,
	pub created_at: DateTime<Utc>,
}

impl Profile {
	pub fn full_name(&self) -> String {
		format!("{} {}", self.first_name, self.last_name)
	}

	pub fn to_principal(&self) -> Principal {
		Principal {
			id: self.id,
			username: self.username.clone(),
			role: self.role,
			team: self.team,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
	FirstName,
	LastName,
	Username,
	Role,
	Team,
}

impl ProfileField {
	pub fn all() -> &'static [ProfileField] {
		&[
			ProfileField::FirstName,
			ProfileField::LastName,
			ProfileField::Username,
			ProfileField::Role,
			ProfileField::Team,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ProfileField::FirstName => "first_name",
			ProfileField::LastName => "last_name",
			ProfileField::Username => "username",
			ProfileField::Role => "role",
			ProfileField::Team => "team",
		}
	}
}

impl fmt::Display for ProfileField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
	T: Deserialize<'de>,
	D: Deserializer<'de>,
{
	T::deserialize(deserializer).map(Some)
}

/// Partial profile edit. `team: Some(None)` removes the team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilePayload {
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub username: Option<String>,
	pub role: Option<Role>,
	#[serde(deserialize_with = "deserialize_some", skip_serializing_if = "Option::is_none")]
	pub team: Option<Option<TeamId>>,
}

impl ProfilePayload {
	pub fn has(&self, field: ProfileField) -> bool {
		match field {
			ProfileField::FirstName => self.first_name.is_some(),
			ProfileField::LastName => self.last_name.is_some(),
			ProfileField::Username => self.username.is_some(),
			ProfileField::Role => self.role.is_some(),
			ProfileField::Team => self.team.is_some(),
		}
	}

	pub fn clear(&mut self, field: ProfileField) {
		match field {
			ProfileField::FirstName => self.first_name = None,
			ProfileField::LastName => self.last_name = None,
			ProfileField::Username => self.username = None,
			ProfileField::Role => self.role = None,
			ProfileField::Team => self.team = None,
		}
	}

	pub fn present_fields(&self) -> Vec<ProfileField> {
		ProfileField::all()
			.iter()
			.copied()
			.filter(|field| self.has(*field))
			.collect()
	}

	pub fn is_empty(&self) -> bool {
		self.present_fields().is_empty()
	}

	/// Length rules for whichever fields survived restriction.
	pub fn validate(&self) -> Result<(), ValidationErrors> {
		let mut errors = ValidationErrors::new();
		for (field, value) in [
			(ProfileField::FirstName, &self.first_name),
			(ProfileField::LastName, &self.last_name),
		] {
			if let Some(value) = value {
				errors.extend(check_length(field, value, NAME_MAX_CHARS));
			}
		}
		if let Some(username) = &self.username {
			errors.extend(check_length(ProfileField::Username, username, USERNAME_MAX_CHARS));
		}
		errors.into_result()
	}
}

fn check_length(field: ProfileField, value: &str, max: usize) -> Option<ValidationError> {
	let len = value.chars().count();
	if value.trim().is_empty() {
		Some(ValidationError::required(field.as_str()))
	} else if len > max {
		Some(ValidationError::new(
			field.as_str(),
			ValidationCode::TooLong,
			format!("Ensure this value has at most {max} characters (it has {len})."),
		))
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn team_null_clears_and_absent_leaves_alone() {
		let absent: ProfilePayload = serde_json::from_str("{}").unwrap();
		assert_eq!(absent.team, None);
		let cleared: ProfilePayload = serde_json::from_str(r#"{"team": null}"#).unwrap();
		assert_eq!(cleared.team, Some(None));
	}

	#[test]
	fn names_are_required_when_edited() {
		let payload = ProfilePayload {
			first_name: Some("  ".to_string()),
			last_name: Some("Smith".to_string()),
			..Default::default()
		};
		let errors = payload.validate().unwrap_err();
		assert!(errors.has_code("first_name", ValidationCode::Required));
		assert_eq!(errors.errors().len(), 1);
	}

	#[test]
	fn overlong_last_name_is_rejected() {
		let payload = ProfilePayload {
			last_name: Some("x".repeat(31)),
			..Default::default()
		};
		assert!(payload.validate().unwrap_err().has_code("last_name", ValidationCode::TooLong));
	}

	#[test]
	fn role_and_team_changes_need_no_validation() {
		let payload = ProfilePayload {
			role: Some(Role::Technician),
			team: Some(Some(TeamId::new(2))),
			..Default::default()
		};
		assert!(payload.validate().is_ok());
	}

	#[test]
	fn full_name_and_principal() {
		let profile = Profile {
			id: UserId::new(3),
			username: "carol".to_string(),
			first_name: "Carol".to_string(),
			last_name: "Jones".to_string(),
			email: "carol@example.com".to_string(),
			role: Role::Customer,
			team: Some(TeamId::new(1)),
			created_at: Utc::now(),
		};
		assert_eq!(profile.full_name(), "Carol Jones");
		let principal = profile.to_principal();
		assert_eq!(principal.id, profile.id);
		assert_eq!(principal.team, Some(TeamId::new(1)));
	}
}
