// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod attachments;
mod auth;
mod database;
mod http;
mod logging;
mod notifications;
mod smtp;

pub use attachments::{AttachmentsConfig, AttachmentsConfigLayer, DEFAULT_ATTACHMENT_MAX_BYTES};
pub use auth::{AuthConfig, AuthConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use notifications::{NotificationsConfig, NotificationsConfigLayer};
pub use smtp::SmtpConfigLayer;
