// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use hub_common_ticket::validation::{validate_comment_body, validate_ticket_payload};
use hub_common_ticket::{
	AttachmentRef, Comment, PayloadMode, Ticket, TicketField, TicketId, TicketPayload,
	ValidationCode, ValidationError, ValidationErrors,
};
use hub_server_auth::{
	creation_author, restrict_ticket_payload, Action, Principal, ResourceAttrs, TicketAction,
	TicketFilter, TicketListing, TicketQuery, UserId,
};
use hub_server_db::{NewTicket, TicketChanges};
use hub_server_email::{CommentNotice, DeliveryOutcome};
use serde::{Deserialize, Serialize};

use super::{ensure_allowed, HubActions, MSG_INVALID_ASSIGNEE, MSG_UNKNOWN_REFERENCE};
use crate::error::{ActionError, ActionResult};
use crate::pagination::PaginationParams;

/// A ticket with its comments, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketDetail {
	pub ticket: Ticket,
	pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentPayload {
	pub body: String,
}

/// A committed comment and what happened to the notification it triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentCreated {
	pub comment: Comment,
	pub delivery: DeliveryOutcome,
}

impl HubActions {
	/// Tickets visible to `principal`, narrowed by `filter` and paged.
	#[tracing::instrument(skip(self, principal, filter), fields(user_id = %principal.id, role = %principal.role))]
	pub async fn list_tickets(
		&self,
		principal: &Principal,
		filter: TicketFilter,
		page: PaginationParams,
	) -> ActionResult<Vec<TicketListing>> {
		let query = TicketQuery::compose(principal, filter);
		let listings = self
			.tickets
			.list_tickets(&query, page.limit_clamped(), page.offset_or_default())
			.await?;
		tracing::debug!(count = listings.len(), "tickets listed");
		Ok(listings)
	}

	#[tracing::instrument(skip(self, principal, payload), fields(user_id = %principal.id, role = %principal.role))]
	pub async fn create_ticket(
		&self,
		principal: &Principal,
		mut payload: TicketPayload,
	) -> ActionResult<Ticket> {
		restrict_ticket_payload(principal.role, TicketAction::Create, &mut payload);
		let author = creation_author(principal, &payload);
		self.validate_payload(&payload, PayloadMode::Create).await?;

		let attachment = self.store_attachment(&payload).await?;
		let new_ticket = NewTicket {
			author,
			title: payload.title.unwrap_or_default(),
			description: payload.description.unwrap_or_default(),
			status: payload.status.unwrap_or_default(),
			ticket_type: payload.ticket_type.unwrap_or_default(),
			priority: payload.priority.unwrap_or_default(),
			category: payload.category.flatten(),
			assigned_team: payload.assigned_team.flatten(),
			assigned_technician: payload.assigned_technician.flatten(),
			attachment: attachment.clone(),
		};

		match self.tickets.create_ticket(&new_ticket).await {
			Ok(ticket) => {
				tracing::info!(ticket_id = %ticket.id, author_id = %ticket.author, "ticket created");
				Ok(ticket)
			}
			Err(e) => {
				self.discard_attachment(attachment.as_ref()).await;
				Err(e.into())
			}
		}
	}

	#[tracing::instrument(skip(self, principal), fields(user_id = %principal.id, ticket_id = %id))]
	pub async fn view_ticket(&self, principal: &Principal, id: TicketId) -> ActionResult<TicketDetail> {
		let ticket = self.load_ticket(id).await?;
		ensure_allowed(principal, Action::ViewTicket, &ResourceAttrs::from(&ticket))?;
		let comments = self.tickets.list_comments(id).await?;
		Ok(TicketDetail { ticket, comments })
	}

	/// Apply the permitted subset of `payload`. A replaced attachment is
	/// purged once the new row is committed.
	#[tracing::instrument(skip(self, principal, payload), fields(user_id = %principal.id, ticket_id = %id))]
	pub async fn update_ticket(
		&self,
		principal: &Principal,
		id: TicketId,
		mut payload: TicketPayload,
	) -> ActionResult<Ticket> {
		let existing = self.load_ticket(id).await?;
		ensure_allowed(principal, Action::EditTicket, &ResourceAttrs::from(&existing))?;

		restrict_ticket_payload(principal.role, TicketAction::Update, &mut payload);
		self.validate_payload(&payload, PayloadMode::Update).await?;

		let attachment = self.store_attachment(&payload).await?;
		let changes = TicketChanges {
			author: payload.author,
			title: payload.title,
			description: payload.description,
			status: payload.status,
			ticket_type: payload.ticket_type,
			priority: payload.priority,
			category: payload.category,
			assigned_team: payload.assigned_team,
			assigned_technician: payload.assigned_technician,
			attachment: attachment.clone(),
		};

		let updated = match self.tickets.update_ticket(id, &changes).await {
			Ok(ticket) => ticket,
			Err(e) => {
				self.discard_attachment(attachment.as_ref()).await;
				return Err(e.into());
			}
		};

		if attachment.is_some() {
			if let Some(previous) = existing.attachment.as_ref() {
				self.discard_attachment(Some(previous)).await;
			}
		}
		tracing::info!(ticket_id = %id, status = %updated.status, "ticket updated");
		Ok(updated)
	}

	/// Remove a ticket, then purge its attachment.
	///
	/// Role-gated only, so the decision is made before the ticket is read:
	/// a customer is refused whether or not the id exists.
	#[tracing::instrument(skip(self, principal), fields(user_id = %principal.id, ticket_id = %id))]
	pub async fn delete_ticket(&self, principal: &Principal, id: TicketId) -> ActionResult<()> {
		ensure_allowed(principal, Action::DeleteTicket, &ResourceAttrs::any_ticket())?;
		let ticket = self.load_ticket(id).await?;

		if !self.tickets.delete_ticket(id).await? {
			return Err(ActionError::not_found(format!("ticket {id}")));
		}
		tracing::info!(ticket_id = %id, "ticket deleted");
		self.discard_attachment(ticket.attachment.as_ref()).await;
		Ok(())
	}

	/// Persist a comment, bump the ticket, then tell the ticket's author.
	///
	/// The comment and the `updated_at` bump are committed before any
	/// delivery is attempted; a delivery failure only produces a warning.
	#[tracing::instrument(skip(self, principal, payload), fields(user_id = %principal.id, ticket_id = %ticket_id))]
	pub async fn add_comment(
		&self,
		principal: &Principal,
		ticket_id: TicketId,
		payload: CommentPayload,
	) -> ActionResult<CommentCreated> {
		let ticket = self.load_ticket(ticket_id).await?;
		ensure_allowed(principal, Action::ViewTicket, &ResourceAttrs::from(&ticket))?;
		ValidationErrors(validate_comment_body(&payload.body)).into_result()?;

		let (comment, ticket) = self
			.tickets
			.add_comment(ticket_id, principal.id, &payload.body)
			.await?;
		tracing::info!(comment_id = %comment.id, "comment added");

		let delivery = self.notify_author(&ticket, &comment, principal).await;
		Ok(CommentCreated { comment, delivery })
	}

	async fn notify_author(
		&self,
		ticket: &Ticket,
		comment: &Comment,
		updater: &Principal,
	) -> DeliveryOutcome {
		if comment.author == ticket.author {
			return DeliveryOutcome::NotRequired;
		}

		let author = match self.profiles.get_profile(ticket.author).await {
			Ok(Some(author)) => author,
			Ok(None) => {
				tracing::warn!(ticket_id = %ticket.id, recipient_id = %ticket.author, "ticket author has no profile");
				return DeliveryOutcome::Failed {
					warning: format!("Error sending email update to ticket owner: user {} not found", ticket.author),
				};
			}
			Err(e) => {
				tracing::warn!(ticket_id = %ticket.id, recipient_id = %ticket.author, error = %e, "failed to load ticket author");
				return DeliveryOutcome::Failed {
					warning: format!("Error sending email update to ticket owner: {e}"),
				};
			}
		};

		self.dispatcher
			.notify_comment(CommentNotice {
				ticket,
				comment,
				updater: &updater.username,
				author_username: &author.username,
				author_email: &author.email,
			})
			.await
	}

	async fn load_ticket(&self, id: TicketId) -> ActionResult<Ticket> {
		self.tickets
			.get_ticket(id)
			.await?
			.ok_or_else(|| ActionError::not_found(format!("ticket {id}")))
	}

	/// Field rules plus the reference checks that need the store.
	async fn validate_payload(&self, payload: &TicketPayload, mode: PayloadMode) -> ActionResult<()> {
		let mut errors = match validate_ticket_payload(payload, mode, self.max_attachment_bytes) {
			Ok(()) => ValidationErrors::new(),
			Err(errors) => errors,
		};
		errors.extend(self.check_references(payload).await?);
		errors.into_result().map_err(ActionError::from)
	}

	async fn check_references(&self, payload: &TicketPayload) -> ActionResult<Vec<ValidationError>> {
		let mut errors = Vec::new();
		let unknown = |field: TicketField| {
			ValidationError::new(field.as_str(), ValidationCode::UnknownReference, MSG_UNKNOWN_REFERENCE)
		};

		if let Some(Some(category)) = payload.category {
			if !self.references.category_exists(category).await? {
				errors.push(unknown(TicketField::Category));
			}
		}
		if let Some(Some(team)) = payload.assigned_team {
			if !self.references.team_exists(team).await? {
				errors.push(unknown(TicketField::AssignedTeam));
			}
		}
		if let Some(author) = payload.author {
			if !self.profile_exists(author).await? {
				errors.push(unknown(TicketField::Author));
			}
		}
		if let Some(Some(technician)) = payload.assigned_technician {
			let eligible = self
				.profiles
				.get_profile(technician)
				.await?
				.is_some_and(|profile| profile.role.is_elevated());
			if !eligible {
				errors.push(ValidationError::new(
					TicketField::AssignedTechnician.as_str(),
					ValidationCode::InvalidAssignee,
					MSG_INVALID_ASSIGNEE,
				));
			}
		}
		Ok(errors)
	}

	async fn profile_exists(&self, id: UserId) -> ActionResult<bool> {
		Ok(self.profiles.get_profile(id).await?.is_some())
	}

	async fn store_attachment(&self, payload: &TicketPayload) -> ActionResult<Option<AttachmentRef>> {
		match &payload.attachment {
			Some(upload) => Ok(Some(self.attachments.store(upload).await?)),
			None => Ok(None),
		}
	}

	/// Best-effort purge of an attachment nothing references any more.
	async fn discard_attachment(&self, reference: Option<&AttachmentRef>) {
		if let Some(reference) = reference {
			if let Err(e) = self.attachments.purge(reference).await {
				tracing::warn!(reference = %reference.as_str(), error = %e, "failed to purge attachment");
			}
		}
	}
}
