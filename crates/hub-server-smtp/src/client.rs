// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use lettre::{
	message::{header::ContentType, Mailbox, MultiPart, SinglePart},
	transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;
use crate::error::SmtpError;

/// One outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
	pub to: String,
	pub subject: String,
	pub text_body: String,
	pub html_body: String,
}

impl MailMessage {
	fn build(&self, from: Mailbox) -> Result<Message, SmtpError> {
		let to: Mailbox = self
			.to
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))?;

		Message::builder()
			.from(from)
			.to(to)
			.subject(self.subject.as_str())
			.multipart(
				MultiPart::alternative()
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_PLAIN)
							.body(self.text_body.clone()),
					)
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_HTML)
							.body(self.html_body.clone()),
					),
			)
			.map_err(|e| SmtpError::Send(format!("failed to build message: {e}")))
	}
}

/// Async SMTP client. The connection is opened lazily on first send.
#[derive(Clone)]
pub struct SmtpClient {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	from_mailbox: Mailbox,
}

impl SmtpClient {
	#[tracing::instrument(
		name = "smtp_client_new",
		skip(config),
		fields(host = %config.host, port = %config.port, use_tls = %config.use_tls)
	)]
	pub fn new(config: SmtpConfig) -> Result<Self, SmtpError> {
		config.validate()?;

		let from_mailbox: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))?;

		let builder = if config.use_tls {
			AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?
		} else {
			AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
		};

		let mut builder = builder.port(config.port);
		if let (Some(username), Some(password)) = (config.username, config.password) {
			builder = builder.credentials(Credentials::new(username, password.into_inner()));
		}

		tracing::debug!("SMTP client initialized");
		Ok(Self {
			transport: builder.build(),
			from_mailbox,
		})
	}

	/// Open a connection to the relay without sending anything.
	#[tracing::instrument(name = "smtp_check_health", skip(self))]
	pub async fn check_health(&self) -> Result<(), SmtpError> {
		self
			.transport
			.test_connection()
			.await
			.map_err(|e| SmtpError::Connection(format!("{e}")))?;
		tracing::debug!("SMTP relay is reachable");
		Ok(())
	}

	#[tracing::instrument(
		name = "smtp_send",
		skip(self, message),
		fields(to = %message.to, subject = %message.subject)
	)]
	pub async fn send(&self, message: &MailMessage) -> Result<(), SmtpError> {
		let email = message.build(self.from_mailbox.clone())?;
		self
			.transport
			.send(email)
			.await
			.map_err(|e| SmtpError::Send(format!("{e}")))?;
		tracing::info!("email sent");
		Ok(())
	}
}

/// Syntactic check only; says nothing about deliverability.
pub fn is_valid_email(email: &str) -> bool {
	email.parse::<Mailbox>().is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use hub_common_secret::SecretString;
	use proptest::prelude::*;

	fn message(to: &str) -> MailMessage {
		MailMessage {
			to: to.to_string(),
			subject: "Support Hub - Request #: 3 - Printer jam".to_string(),
			text_body: "Your Ticket has an update!".to_string(),
			html_body: "<p>Your Ticket has an update!</p>".to_string(),
		}
	}

	fn from() -> Mailbox {
		"Support Hub <support@example.com>".parse().unwrap()
	}

	#[test]
	fn builds_multipart_message() {
		let built = message("alice@example.com").build(from()).unwrap();
		let raw = String::from_utf8(built.formatted()).unwrap();
		assert!(raw.contains("multipart/alternative"));
		assert!(raw.contains("Subject: Support Hub - Request #: 3 - Printer jam"));
		assert!(raw.contains("text/plain"));
		assert!(raw.contains("text/html"));
	}

	#[test]
	fn invalid_recipient_is_address_error() {
		let err = message("not-an-email").build(from()).unwrap_err();
		assert!(matches!(err, SmtpError::Address(_)));
	}

	#[test]
	fn new_rejects_invalid_sender() {
		let config = SmtpConfig {
			host: "localhost".to_string(),
			port: 2525,
			username: None,
			password: None,
			from_address: "nope".to_string(),
			from_name: "Support Hub".to_string(),
			use_tls: false,
		};
		assert!(matches!(SmtpClient::new(config), Err(SmtpError::Address(_))));
	}

	#[test]
	fn new_rejects_half_credentials() {
		let config = SmtpConfig {
			host: "localhost".to_string(),
			port: 2525,
			username: None,
			password: Some(SecretString::new("pw".to_string())),
			from_address: "support@example.com".to_string(),
			from_name: "Support Hub".to_string(),
			use_tls: false,
		};
		assert!(matches!(SmtpClient::new(config), Err(SmtpError::Config(_))));
	}

	mod email_validation {
		use super::*;

		#[test]
		fn accepts_plain_and_named_addresses() {
			assert!(is_valid_email("user@example.com"));
			assert!(is_valid_email("User Name <user@example.com>"));
			assert!(is_valid_email("user+tag@mail.example.com"));
		}

		#[test]
		fn rejects_malformed_addresses() {
			for bad in ["", "userexample.com", "user@", "@example.com", "user@@example.com"] {
				assert!(!is_valid_email(bad), "{bad}");
			}
		}

		proptest! {
			#[test]
			fn generated_addresses_are_valid(
				local in "[a-zA-Z][a-zA-Z0-9]{0,30}",
				domain in "[a-zA-Z][a-zA-Z0-9]{0,20}",
				tld in "(com|org|net|io|dev)"
			) {
				let email = format!("{local}@{domain}.{tld}");
				prop_assert!(is_valid_email(&email), "Expected valid: {}", email);
			}

			#[test]
			fn no_at_symbol_is_invalid(s in "[a-zA-Z0-9._%+-]{1,50}") {
				prop_assume!(!s.contains('@'));
				prop_assert!(!is_valid_email(&s));
			}
		}
	}
}
