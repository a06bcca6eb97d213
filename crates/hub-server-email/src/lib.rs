// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket activity notifications.
//!
//! The [`NotificationDispatcher`] is handed a [`TransportGateway`] at
//! construction and is only ever invoked after the triggering write has
//! committed. Delivery is best-effort: failures and timeouts come back as a
//! [`DeliveryOutcome::Failed`] warning, never as an error.

mod dispatcher;
mod gateway;
mod template;

pub use dispatcher::{
	CommentNotice, DeliveryOutcome, NotificationDispatcher, DEFAULT_DISPATCH_TIMEOUT,
};
pub use gateway::{DisabledTransport, OutboundMessage, SmtpGateway, TransportError, TransportGateway};
pub use template::{render_comment_notification, ticket_link, SUBJECT_PREFIX};
