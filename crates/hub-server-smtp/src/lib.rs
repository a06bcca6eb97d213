// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SMTP client used to deliver ticket notifications.
//!
//! Messages are always multipart/alternative with a plain body and a rich
//! (HTML) body. The SMTP password is held in a [`SecretString`] and never
//! appears in logs.
//!
//! ```no_run
//! use hub_common_secret::SecretString;
//! use hub_server_smtp::{MailMessage, SmtpClient, SmtpConfig};
//!
//! # async fn example() -> Result<(), hub_server_smtp::SmtpError> {
//! let config = SmtpConfig {
//!     host: "smtp.example.com".to_string(),
//!     port: 587,
//!     username: Some("hub".to_string()),
//!     password: Some(SecretString::new("password".to_string())),
//!     from_address: "support@example.com".to_string(),
//!     from_name: "Support Hub".to_string(),
//!     use_tls: true,
//! };
//!
//! let client = SmtpClient::new(config)?;
//! client
//!     .send(&MailMessage {
//!         to: "alice@example.com".to_string(),
//!         subject: "Support Hub - Request #: 1 - Printer".to_string(),
//!         text_body: "Your Ticket has an update!".to_string(),
//!         html_body: "<p>Your Ticket has an update!</p>".to_string(),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;

pub use client::{is_valid_email, MailMessage, SmtpClient};
pub use config::{SmtpConfig, DEFAULT_FROM_NAME, DEFAULT_SMTP_PORT};
pub use error::SmtpError;
