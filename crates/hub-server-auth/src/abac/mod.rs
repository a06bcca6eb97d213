// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy engine.
//!
//! Every single-resource check in Support Hub goes through [`authorize`].
//! Subject attributes come from the [`Principal`](crate::Principal), resource
//! attributes from [`ResourceAttrs`]; no store access happens during
//! evaluation.
//!
//! ```text
//! authorize(principal, action, resource)
//!     │
//!     └── Route on resource type:
//!         ├── Ticket           → ticket::evaluate()
//!         ├── Profile          → profile::evaluate_profile()
//!         └── ProfileDirectory → profile::evaluate_directory()
//! ```
//!
//! # Example
//!
//! ```
//! use hub_server_auth::abac::{is_allowed, Action, ResourceAttrs};
//! use hub_server_auth::{Principal, Role, UserId};
//!
//! let alice = Principal::new(UserId::new(1), "alice", Role::Customer);
//! let own_ticket = ResourceAttrs::ticket(alice.id);
//!
//! assert!(is_allowed(&alice, Action::ViewTicket, &own_ticket));
//! assert!(!is_allowed(&alice, Action::DeleteTicket, &own_ticket));
//! ```

pub mod engine;
pub mod policies;
pub mod types;

pub use engine::*;
pub use types::*;
