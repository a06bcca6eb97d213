// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use hub_server_smtp::{MailMessage, SmtpClient, SmtpError};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
	#[error(transparent)]
	Smtp(#[from] SmtpError),

	#[error("email delivery is not configured")]
	Disabled,

	#[error("delivery timed out after {0:?}")]
	Timeout(std::time::Duration),
}

/// A rendered message ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
	pub recipient: String,
	pub subject: String,
	pub plain_body: String,
	pub rich_body: String,
}

/// Anything that can deliver an [`OutboundMessage`].
#[async_trait]
pub trait TransportGateway: Send + Sync {
	async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}

/// Delivers through an SMTP relay.
pub struct SmtpGateway {
	client: SmtpClient,
}

impl SmtpGateway {
	pub fn new(client: SmtpClient) -> Self {
		Self { client }
	}
}

#[async_trait]
impl TransportGateway for SmtpGateway {
	async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
		self
			.client
			.send(&MailMessage {
				to: message.recipient.clone(),
				subject: message.subject.clone(),
				text_body: message.plain_body.clone(),
				html_body: message.rich_body.clone(),
			})
			.await?;
		Ok(())
	}
}

/// Used when no relay is configured. Every send fails with
/// [`TransportError::Disabled`] so callers still see a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTransport;

#[async_trait]
impl TransportGateway for DisabledTransport {
	async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
		tracing::debug!(subject = %message.subject, "email delivery disabled, dropping message");
		Err(TransportError::Disabled)
	}
}
