// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use hub_common_ticket::markup::{escape_html, strip_markup};
use hub_common_ticket::{Comment, Ticket, TicketId};

use crate::gateway::OutboundMessage;

pub const SUBJECT_PREFIX: &str = "Support Hub";

/// Deep link to a ticket's detail page.
pub fn ticket_link(base_url: &str, id: TicketId) -> String {
	format!("{}/tickets/{id}/", base_url.trim_end_matches('/'))
}

/// Render the "ticket has an update" message sent to a ticket's author.
pub fn render_comment_notification(
	ticket: &Ticket,
	comment: &Comment,
	updater: &str,
	recipient: &str,
	base_url: &str,
) -> OutboundMessage {
	let body = strip_markup(&comment.body);
	let status = ticket.status.label();
	let link = ticket_link(base_url, ticket.id);

	let plain_body = format!(
		"Your Ticket has an update!\n\n\
		 Update posted by '{updater}':\n\
		 '{body}'\n\n\
		 Current ticket status is '{status}'\n\
		 Use this link to view this ticket in Support Hub '{link}'"
	);

	let rich_body = format!(
		"<h2>Your Ticket has an update!</h2>\
		 <p>Update posted by '{updater}':</p>\
		 <p>'{body}'</p>\
		 <br>\
		 <p>Current ticket status is '{status}'</p>\
		 <p>Click the link to view this ticket in Support Hub \
		 <a href=\"{link}\">Ticket Link</a></p>",
		updater = escape_html(updater),
		body = escape_html(&body),
		link = escape_html(&link),
	);

	OutboundMessage {
		recipient: recipient.to_string(),
		subject: format!("{SUBJECT_PREFIX} - {}", ticket.display_name()),
		plain_body,
		rich_body,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Utc;
	use hub_common_ticket::{
		CommentId, TicketPriority, TicketStatus, TicketType, UserId,
	};

	fn ticket() -> Ticket {
		let now = Utc::now();
		Ticket {
			id: TicketId::new(7),
			author: UserId::new(1),
			title: "Printer on fire".to_string(),
			description: "The printer on floor two is on fire".to_string(),
			status: TicketStatus::InProgress,
			ticket_type: TicketType::Incident,
			priority: TicketPriority::High,
			category: None,
			assigned_team: None,
			assigned_technician: Some(UserId::new(2)),
			attachment: None,
			created_at: now,
			updated_at: now,
		}
	}

	fn comment(body: &str) -> Comment {
		Comment {
			id: CommentId::new(3),
			ticket_id: TicketId::new(7),
			author: UserId::new(2),
			body: body.to_string(),
			created_at: Utc::now(),
		}
	}

	#[test]
	fn subject_uses_display_name() {
		let msg = render_comment_notification(
			&ticket(),
			&comment("On it"),
			"bob",
			"alice@example.com",
			"https://hub.example.com",
		);
		assert_eq!(msg.subject, "Support Hub - Request #: 7 - Printer on fire");
		assert_eq!(msg.recipient, "alice@example.com");
	}

	#[test]
	fn plain_body_carries_updater_status_and_link() {
		let msg = render_comment_notification(
			&ticket(),
			&comment("<p>Extinguisher&nbsp;deployed</p>"),
			"bob",
			"alice@example.com",
			"https://hub.example.com/",
		);
		assert!(msg.plain_body.starts_with("Your Ticket has an update!"));
		assert!(msg.plain_body.contains("Update posted by 'bob'"));
		assert!(msg.plain_body.contains("'Extinguisher deployed'"));
		assert!(msg.plain_body.contains("Current ticket status is 'In Progress'"));
		assert!(msg.plain_body.contains("https://hub.example.com/tickets/7/"));
		assert!(!msg.plain_body.contains("<p>"));
	}

	#[test]
	fn rich_body_escapes_user_text() {
		let msg = render_comment_notification(
			&ticket(),
			&comment("a &lt;script&gt; tag"),
			"<b>bob</b>",
			"alice@example.com",
			"https://hub.example.com",
		);
		assert!(msg.rich_body.contains("&lt;b&gt;bob&lt;/b&gt;"));
		assert!(!msg.rich_body.contains("<b>bob</b>"));
		assert!(msg.rich_body.contains("<a href=\"https://hub.example.com/tickets/7/\">Ticket Link</a>"));
	}

	#[test]
	fn ticket_link_trims_trailing_slash() {
		assert_eq!(ticket_link("http://localhost:8080/", TicketId::new(4)), "http://localhost:8080/tickets/4/");
		assert_eq!(ticket_link("http://localhost:8080", TicketId::new(4)), "http://localhost:8080/tickets/4/");
	}

	proptest::proptest! {
		#[test]
		fn ticket_link_never_doubles_slashes(slashes in 0usize..5, id in 1i64..100_000) {
			let base = format!("https://hub.example.com{}", "/".repeat(slashes));
			let link = ticket_link(&base, TicketId::new(id));
			proptest::prop_assert_eq!(link, format!("https://hub.example.com/tickets/{id}/"));
		}
	}
}
