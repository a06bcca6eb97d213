// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Support Hub ticket server.
//!
//! This crate wires the authorization core, the SQLite stores, attachment
//! storage and the notification dispatcher into an action layer, and serves
//! that layer over HTTP.

pub mod actions;
pub mod api;
pub mod attachments;
pub mod auth_middleware;
pub mod error;
pub mod pagination;
pub mod routes;

pub use actions::{CommentCreated, CommentPayload, HubActions, TicketDetail};
pub use api::{create_app_state, create_router, AppState, AuthSettings};
pub use attachments::{AttachmentError, AttachmentStore, LocalAttachmentStore, MemoryAttachmentStore};
pub use error::{ActionError, ActionResult};
pub use pagination::PaginationParams;
