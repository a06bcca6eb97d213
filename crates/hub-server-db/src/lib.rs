// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # hub-server-db
//!
//! Persistence for Support Hub using SQLite via sqlx.
//!
//! Each domain has a `*Store` trait describing the interface and a
//! `*Repository` struct holding a `SqlitePool` that implements it by
//! delegating to inherent methods. Handlers depend on the traits so that
//! tests can swap in fakes.
//!
//! | Variant | When |
//! |---------|------|
//! | `NotFound` | Update or delete of an id that should exist |
//! | `Conflict` | Unique constraint violation (usernames, team names) |
//! | `Sqlx` | Unexpected database errors, propagated with `?` |
//! | `Internal` | Stored data that no longer parses |
//!
//! Lookups where absence is normal return `Result<Option<T>>`.
//!
//! Timestamps are stored as fixed-width RFC 3339 text with microsecond
//! precision so that SQL ordering on the text column is time ordering.

mod error;
pub mod migrations;
pub mod pool;
pub mod profile;
pub mod reference;
mod row;
pub mod session;
pub mod ticket;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::{create_pool, ping};
pub use sqlx::sqlite::SqlitePool;
pub use profile::{NewProfile, ProfileRepository, ProfileStore};
pub use reference::{ReferenceRepository, ReferenceStore};
pub use session::{SessionRepository, SessionStore};
pub use ticket::{NewTicket, TicketChanges, TicketRepository, TicketStore};
