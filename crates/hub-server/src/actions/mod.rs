// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The action surface of Support Hub.
//!
//! Every action takes the principal resolved for the request and runs the
//! same sequence: policy or scope first, then field-set restriction and
//! validation, then the store write, then any best-effort side effect.
//! Nothing is written before every check has passed.
//!
//! ```text
//! principal ─┬─ single resource ─→ authorize() ──┐
//!            └─ listing ─→ scope_for() + filter ─┤
//!                                                ▼
//!                 restrict + validate payload ─→ store write ─→ notify / purge
//! ```

mod profiles;
mod tickets;

use std::sync::Arc;

use hub_common_ticket::validation::DEFAULT_ATTACHMENT_MAX_BYTES;
use hub_server_auth::{authorize, Action, Decision, Principal, ResourceAttrs};
use hub_server_db::{ProfileStore, ReferenceStore, TicketStore};
use hub_server_email::NotificationDispatcher;

use crate::attachments::AttachmentStore;
use crate::error::{ActionError, ActionResult};

pub use tickets::{CommentCreated, CommentPayload, TicketDetail};

/// Message for a reference to a row that does not exist.
pub const MSG_UNKNOWN_REFERENCE: &str =
	"Select a valid choice. That choice is not one of the available choices.";
pub const MSG_INVALID_ASSIGNEE: &str =
	"Assigned technician must be a technician or an administrator.";
pub const MSG_USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Collaborators every action needs.
#[derive(Clone)]
pub struct HubActions {
	tickets: Arc<dyn TicketStore>,
	profiles: Arc<dyn ProfileStore>,
	references: Arc<dyn ReferenceStore>,
	attachments: Arc<dyn AttachmentStore>,
	dispatcher: NotificationDispatcher,
	max_attachment_bytes: usize,
}

impl HubActions {
	pub fn new(
		tickets: Arc<dyn TicketStore>,
		profiles: Arc<dyn ProfileStore>,
		references: Arc<dyn ReferenceStore>,
		attachments: Arc<dyn AttachmentStore>,
		dispatcher: NotificationDispatcher,
	) -> Self {
		Self {
			tickets,
			profiles,
			references,
			attachments,
			dispatcher,
			max_attachment_bytes: DEFAULT_ATTACHMENT_MAX_BYTES,
		}
	}

	pub fn with_max_attachment_bytes(mut self, max_bytes: usize) -> Self {
		self.max_attachment_bytes = max_bytes;
		self
	}
}

/// Policy check that fails closed with [`ActionError::Forbidden`].
fn ensure_allowed(
	principal: &Principal,
	action: Action,
	resource: &ResourceAttrs,
) -> ActionResult<()> {
	match authorize(principal, action, resource) {
		Decision::Allow => Ok(()),
		Decision::Deny => Err(ActionError::Forbidden),
	}
}
