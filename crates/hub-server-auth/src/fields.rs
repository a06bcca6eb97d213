// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field-set resolver.
//!
//! A fixed role × action table decides which payload fields are honoured.
//! Anything else a client sends is dropped without an error.
//!
//! | tier            | fields                                                            |
//! |-----------------|-------------------------------------------------------------------|
//! | customer update | category, description, attachment                                 |
//! | customer create | customer update + type, title                                     |
//! | elevated update | customer update + author, status, priority, assigned_team, assigned_technician |
//! | elevated create | customer create + author, status, priority, assigned_team, assigned_technician |
//!
//! Customers never set `author`: on create it is forced to the submitter.

use hub_common_ticket::{PayloadMode, TicketField, TicketPayload, UserId};

use crate::profile::{ProfileField, ProfilePayload};
use crate::types::{Principal, Role};

/// Create or update, as seen by the resolver.
pub type TicketAction = PayloadMode;

const CUSTOMER_UPDATE: &[TicketField] = &[
	TicketField::Category,
	TicketField::Description,
	TicketField::Attachment,
];

const CUSTOMER_CREATE: &[TicketField] = &[
	TicketField::Type,
	TicketField::Category,
	TicketField::Title,
	TicketField::Description,
	TicketField::Attachment,
];

const ELEVATED_UPDATE: &[TicketField] = &[
	TicketField::Author,
	TicketField::Status,
	TicketField::Priority,
	TicketField::AssignedTeam,
	TicketField::AssignedTechnician,
	TicketField::Category,
	TicketField::Description,
	TicketField::Attachment,
];

const ELEVATED_CREATE: &[TicketField] = &[
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
];

const NAME_FIELDS: &[ProfileField] = &[
	ProfileField::FirstName,
	ProfileField::LastName,
	ProfileField::Username,
];

const ADMINISTRATOR_PROFILE_FIELDS: &[ProfileField] = &[ProfileField::Role, ProfileField::Team];

/// Ordered set of ticket fields `role` may set for `action`.
pub fn allowed_ticket_fields(role: Role, action: TicketAction) -> &'static [TicketField] {
	match (role.is_elevated(), action) {
		(false, TicketAction::Create) => CUSTOMER_CREATE,
		(false, TicketAction::Update) => CUSTOMER_UPDATE,
		(true, TicketAction::Create) => ELEVATED_CREATE,
		(true, TicketAction::Update) => ELEVATED_UPDATE,
	}
}

/// Strip fields outside the resolved set. Returns the dropped fields.
pub fn restrict_ticket_payload(
	role: Role,
	action: TicketAction,
	payload: &mut TicketPayload,
) -> Vec<TicketField> {
	let dropped = payload.retain_fields(allowed_ticket_fields(role, action));
	for field in &dropped {
		tracing::debug!(role = %role, action = ?action, field = %field, "dropping disallowed ticket field");
	}
	dropped
}

/// Author of a ticket being created.
///
/// Customers always author their own tickets, whatever the payload says.
/// Elevated roles may name any author and default to themselves.
pub fn creation_author(principal: &Principal, payload: &TicketPayload) -> UserId {
	if principal.is_elevated() {
		payload.author.unwrap_or(principal.id)
	} else {
		principal.id
	}
}

/// Profile fields an editor with `role` may change.
///
/// Administrators manage role and team; the name fields are locked on their
/// form. Everyone else edits only their names.
pub fn allowed_profile_fields(role: Role) -> &'static [ProfileField] {
	match role {
		Role::Administrator => ADMINISTRATOR_PROFILE_FIELDS,
		Role::Technician | Role::Customer => NAME_FIELDS,
	}
}

pub fn restrict_profile_payload(role: Role, payload: &mut ProfilePayload) -> Vec<ProfileField> {
	let allowed = allowed_profile_fields(role);
	let dropped: Vec<ProfileField> = payload
		.present_fields()
		.into_iter()
		.filter(|field| !allowed.contains(field))
		.collect();
	for field in &dropped {
		payload.clear(*field);
		tracing::debug!(role = %role, field = %field, "dropping disallowed profile field");
	}
	dropped
}
