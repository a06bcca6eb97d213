// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use hub_common_ticket::{ValidationCode, ValidationError};
use hub_server_auth::{
	restrict_profile_payload, Action, Principal, Profile, ProfileField, ProfileFilter,
	ProfilePayload, ResourceAttrs, UserId,
};
use hub_server_db::DbError;

use super::{ensure_allowed, HubActions, MSG_UNKNOWN_REFERENCE, MSG_USERNAME_TAKEN};
use crate::error::{ActionError, ActionResult};
use crate::pagination::PaginationParams;

impl HubActions {
	/// The profile directory. Administrators only; everyone else is
	/// refused rather than shown an empty page.
	#[tracing::instrument(skip(self, principal, filter), fields(user_id = %principal.id, role = %principal.role))]
	pub async fn list_profiles(
		&self,
		principal: &Principal,
		filter: ProfileFilter,
		page: PaginationParams,
	) -> ActionResult<Vec<Profile>> {
		ensure_allowed(principal, Action::ListAllProfiles, &ResourceAttrs::profile_directory())?;
		Ok(self
			.profiles
			.list_profiles(
				filter.username_contains(),
				page.limit_clamped(),
				page.offset_or_default(),
			)
			.await?)
	}

	#[tracing::instrument(skip(self, principal), fields(user_id = %principal.id, profile_id = %id))]
	pub async fn view_profile(&self, principal: &Principal, id: UserId) -> ActionResult<Profile> {
		ensure_allowed(principal, Action::ViewProfile, &ResourceAttrs::profile(id))?;
		self.load_profile(id).await
	}

	#[tracing::instrument(skip(self, principal, payload), fields(user_id = %principal.id, profile_id = %id))]
	pub async fn update_profile(
		&self,
		principal: &Principal,
		id: UserId,
		mut payload: ProfilePayload,
	) -> ActionResult<Profile> {
		ensure_allowed(principal, Action::EditProfile, &ResourceAttrs::profile(id))?;
		self.load_profile(id).await?;

		restrict_profile_payload(principal.role, &mut payload);
		payload.validate()?;
		if let Some(Some(team)) = payload.team {
			if !self.references.team_exists(team).await? {
				return Err(ActionError::invalid(ValidationError::new(
					ProfileField::Team.as_str(),
					ValidationCode::UnknownReference,
					MSG_UNKNOWN_REFERENCE,
				)));
			}
		}

		match self.profiles.update_profile(id, &payload).await {
			Ok(profile) => {
				tracing::info!(profile_id = %id, "profile updated");
				Ok(profile)
			}
			Err(DbError::Conflict(_)) => Err(ActionError::invalid(ValidationError::new(
				ProfileField::Username.as_str(),
				ValidationCode::UsernameTaken,
				MSG_USERNAME_TAKEN,
			))),
			Err(e) => Err(e.into()),
		}
	}

	async fn load_profile(&self, id: UserId) -> ActionResult<Profile> {
		self.profiles
			.get_profile(id)
			.await?
			.ok_or_else(|| ActionError::not_found(format!("profile {id}")))
	}
}
