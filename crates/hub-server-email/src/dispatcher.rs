// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;
use std::time::Duration;

use hub_common_ticket::{Comment, Ticket};
use serde::{Deserialize, Serialize};

use crate::gateway::{TransportError, TransportGateway};
use crate::template::render_comment_notification;

pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// What happened to the notification attached to a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
	/// The commenter is the ticket author; nobody to notify.
	NotRequired,
	Delivered,
	Failed { warning: String },
}

impl DeliveryOutcome {
	pub fn warning(&self) -> Option<&str> {
		match self {
			DeliveryOutcome::Failed { warning } => Some(warning),
			_ => None,
		}
	}
}

/// A committed comment and the context needed to tell the ticket's author.
#[derive(Debug, Clone, Copy)]
pub struct CommentNotice<'a> {
	pub ticket: &'a Ticket,
	pub comment: &'a Comment,
	/// Username of the commenter.
	pub updater: &'a str,
	/// Username and email of the ticket's author.
	pub author_username: &'a str,
	pub author_email: &'a str,
}

#[derive(Clone)]
pub struct NotificationDispatcher {
	transport: Arc<dyn TransportGateway>,
	base_url: String,
	timeout: Duration,
}

impl NotificationDispatcher {
	pub fn new(transport: Arc<dyn TransportGateway>, base_url: impl Into<String>) -> Self {
		Self {
			transport,
			base_url: base_url.into(),
			timeout: DEFAULT_DISPATCH_TIMEOUT,
		}
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Notify the ticket's author of a comment someone else left.
	///
	/// Must only be called once the comment and the ticket's `updated_at`
	/// bump have committed. Never fails: transport errors and timeouts are
	/// returned as [`DeliveryOutcome::Failed`].
	#[tracing::instrument(
		name = "notify_comment",
		skip(self, notice),
		fields(ticket_id = %notice.ticket.id, comment_id = %notice.comment.id)
	)]
	pub async fn notify_comment(&self, notice: CommentNotice<'_>) -> DeliveryOutcome {
		if notice.comment.author == notice.ticket.author {
			return DeliveryOutcome::NotRequired;
		}

		let message = render_comment_notification(
			notice.ticket,
			notice.comment,
			notice.updater,
			notice.author_email,
			&self.base_url,
		);

		let result = match tokio::time::timeout(self.timeout, self.transport.send(&message)).await {
			Ok(result) => result,
			Err(_) => Err(TransportError::Timeout(self.timeout)),
		};

		match result {
			Ok(()) => {
				tracing::debug!(recipient_id = %notice.ticket.author, "notification delivered");
				DeliveryOutcome::Delivered
			}
			Err(e) => {
				tracing::warn!(
					ticket_id = %notice.ticket.id,
					recipient_id = %notice.ticket.author,
					error = %e,
					"notification delivery failed"
				);
				DeliveryOutcome::Failed {
					warning: format!(
						"Error sending email update to ticket owner - '{}': {e}",
						notice.author_username
					),
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gateway::{DisabledTransport, OutboundMessage};
	use async_trait::async_trait;
	use chrono::Utc;
	use hub_common_ticket::{
		CommentId, TicketId, TicketPriority, TicketStatus, TicketType, UserId,
	};
	use std::sync::Mutex;

	#[derive(Default)]
	struct RecordingTransport {
		sent: Mutex<Vec<OutboundMessage>>,
	}

	#[async_trait]
	impl TransportGateway for RecordingTransport {
		async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
			self.sent.lock().unwrap().push(message.clone());
			Ok(())
		}
	}

	struct SlowTransport;

	#[async_trait]
	impl TransportGateway for SlowTransport {
		async fn send(&self, _message: &OutboundMessage) -> Result<(), TransportError> {
			tokio::time::sleep(Duration::from_secs(60)).await;
			Ok(())
		}
	}

	const ALICE: UserId = UserId::new(1);
	const BOB: UserId = UserId::new(2);

	fn ticket() -> Ticket {
		let now = Utc::now();
		Ticket {
			id: TicketId::new(1),
			author: ALICE,
			title: "Laptop will not boot".to_string(),
			description: "Black screen after the vendor logo".to_string(),
			status: TicketStatus::Open,
			ticket_type: TicketType::Request,
			priority: TicketPriority::Low,
			category: None,
			assigned_team: None,
			assigned_technician: None,
			attachment: None,
			created_at: now,
			updated_at: now,
		}
	}

	fn comment(author: UserId) -> Comment {
		Comment {
			id: CommentId::new(10),
			ticket_id: TicketId::new(1),
			author,
			body: "<p>Looking into it</p>".to_string(),
			created_at: Utc::now(),
		}
	}

	fn notice<'a>(ticket: &'a Ticket, comment: &'a Comment) -> CommentNotice<'a> {
		CommentNotice {
			ticket,
			comment,
			updater: "bob",
			author_username: "alice",
			author_email: "alice@example.com",
		}
	}

	#[tokio::test]
	async fn author_commenting_on_own_ticket_sends_nothing() {
		let transport = Arc::new(RecordingTransport::default());
		let dispatcher = NotificationDispatcher::new(transport.clone(), "http://hub");
		let (t, c) = (ticket(), comment(ALICE));

		assert_eq!(dispatcher.notify_comment(notice(&t, &c)).await, DeliveryOutcome::NotRequired);
		assert!(transport.sent.lock().unwrap().is_empty());
	}

	#[tokio::test]
	async fn other_commenter_notifies_author() {
		let transport = Arc::new(RecordingTransport::default());
		let dispatcher = NotificationDispatcher::new(transport.clone(), "http://hub");
		let (t, c) = (ticket(), comment(BOB));

		assert_eq!(dispatcher.notify_comment(notice(&t, &c)).await, DeliveryOutcome::Delivered);
		let sent = transport.sent.lock().unwrap();
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].recipient, "alice@example.com");
		assert!(sent[0].plain_body.contains("Looking into it"));
		assert!(sent[0].plain_body.contains("http://hub/tickets/1/"));
	}

	#[tokio::test]
	async fn transport_failure_becomes_warning() {
		let dispatcher = NotificationDispatcher::new(Arc::new(DisabledTransport), "http://hub");
		let (t, c) = (ticket(), comment(BOB));

		let outcome = dispatcher.notify_comment(notice(&t, &c)).await;
		let warning = outcome.warning().unwrap();
		assert!(warning.contains("'alice'"));
		assert!(warning.contains("not configured"));
	}

	#[tokio::test]
	async fn slow_transport_times_out() {
		let dispatcher = NotificationDispatcher::new(Arc::new(SlowTransport), "http://hub")
			.with_timeout(Duration::from_millis(50));
		let (t, c) = (ticket(), comment(BOB));

		let outcome = dispatcher.notify_comment(notice(&t, &c)).await;
		assert!(matches!(outcome, DeliveryOutcome::Failed { .. }));
		assert!(outcome.warning().unwrap().contains("timed out"));
	}

	#[test]
	fn outcome_serializes_with_status_tag() {
		let json = serde_json::to_value(DeliveryOutcome::Failed {
			warning: "boom".to_string(),
		})
		.unwrap();
		assert_eq!(json["status"], "failed");
		assert_eq!(json["warning"], "boom");
		let json = serde_json::to_value(DeliveryOutcome::Delivered).unwrap();
		assert_eq!(json["status"], "delivered");
	}
}
