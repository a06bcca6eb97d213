// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Entity model shared by every Support Hub crate.
//!
//! - [`ids`]: integer-keyed id newtypes that parse from path segments
//! - [`model`]: [`Ticket`], [`Comment`], [`Team`], [`Category`] and the ticket enums
//! - [`payload`]: partial ticket payloads as submitted by clients
//! - [`markup`]: rich-text stripping used by validation and notifications
//! - [`validation`]: role-independent field validation

pub mod ids;
pub mod markup;
pub mod model;
pub mod payload;
pub mod validation;

pub use ids::{CategoryId, CommentId, IdParseError, TeamId, TicketId, UserId};
pub use model::{
	AttachmentRef, Category, Comment, ParseEnumError, Team, Ticket, TicketPriority, TicketStatus,
	TicketType,
};
pub use payload::{AttachmentUpload, TicketField, TicketPayload};
pub use validation::{PayloadMode, ValidationCode, ValidationError, ValidationErrors};
