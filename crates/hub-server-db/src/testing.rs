// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory database fixtures for tests in this and dependent crates.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use hub_server_auth::{Profile, Role};

use crate::migrations::run_migrations;
use crate::profile::{NewProfile, ProfileRepository};

/// Single-connection in-memory pool with the full schema applied.
///
/// One connection, because every new `:memory:` connection is a fresh
/// database.
pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str(":memory:")
		.unwrap()
		.foreign_keys(true)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await
		.expect("Failed to create test pool");

	run_migrations(&pool).await.expect("Failed to run migrations");
	pool
}

/// Insert a profile with the given username and role.
pub async fn seed_profile(pool: &SqlitePool, username: &str, role: Role) -> Profile {
	ProfileRepository::new(pool.clone())
		.create_profile(&NewProfile {
			username: username.to_string(),
			first_name: username.to_string(),
			last_name: "Tester".to_string(),
			email: format!("{username}@example.com"),
			role,
			team: None,
		})
		.await
		.expect("Failed to seed profile")
}
