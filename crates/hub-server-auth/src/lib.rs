// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization core for Support Hub.
//!
//! This crate decides who may see or touch which ticket and profile. Nothing
//! here performs I/O; every function is safe to call concurrently.
//!
//! - [`abac`]: the policy engine, a pure allow/deny decision per resource
//! - [`fields`]: which payload fields a role may set on create and update
//! - [`scope`]: the visibility predicate bounding every ticket listing
//! - [`filter`]: user-chosen narrowing filters and ordering, applied after scope
//! - [`middleware`]: session token extraction and hashing
//!
//! Action handlers resolve a [`Principal`] once per request and then consult
//! these modules before touching the store.

pub mod abac;
pub mod fields;
pub mod filter;
pub mod middleware;
pub mod profile;
pub mod scope;
pub mod types;

pub use abac::{authorize, is_allowed, Action, Decision, ResourceAttrs, ResourceType};
pub use fields::{
	allowed_profile_fields, allowed_ticket_fields, creation_author, restrict_profile_payload,
	restrict_ticket_payload, TicketAction,
};
pub use filter::{
	AssigneeFilter, ProfileFilter, StatusFilter, TicketFilter, TicketListing, TicketOrdering,
	TicketQuery,
};
pub use hub_common_ticket::{CategoryId, TeamId, TicketId, UserId};
pub use middleware::{
	extract_bearer_token, extract_session_cookie, hash_token, SESSION_COOKIE_NAME,
};
pub use profile::{Profile, ProfileField, ProfilePayload};
pub use scope::{scope_for, TicketScope};
pub use types::{Principal, Role};
