// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session storage and principal resolution.
//!
//! Only token hashes are stored. A session resolves to the principal of the
//! profile it belongs to, with the role and team as they are *now*, so a
//! role change takes effect on the next request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hub_common_ticket::{TeamId, UserId};
use hub_server_auth::Principal;
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{conflict_on_unique, DbError};
use crate::row::{format_timestamp, parse_enum};

#[async_trait]
pub trait SessionStore: Send + Sync {
	async fn create_session(
		&self,
		user_id: UserId,
		token_hash: &str,
		expires_at: DateTime<Utc>,
	) -> Result<(), DbError>;
	async fn resolve_principal(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<Principal>, DbError>;
	async fn delete_session(&self, token_hash: &str) -> Result<bool, DbError>;
	async fn cleanup_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DbError>;
}

#[async_trait]
impl SessionStore for SessionRepository {
	async fn create_session(
		&self,
		user_id: UserId,
		token_hash: &str,
		expires_at: DateTime<Utc>,
	) -> Result<(), DbError> {
		self.create_session(user_id, token_hash, expires_at).await
	}

	async fn resolve_principal(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<Principal>, DbError> {
		self.resolve_principal(token_hash, now).await
	}

	async fn delete_session(&self, token_hash: &str) -> Result<bool, DbError> {
		self.delete_session(token_hash).await
	}

	async fn cleanup_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DbError> {
		self.cleanup_expired_sessions(now).await
	}
}

#[derive(Clone)]
pub struct SessionRepository {
	pool: SqlitePool,
}

impl SessionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, token_hash), fields(user_id = %user_id))]
	pub async fn create_session(
		&self,
		user_id: UserId,
		token_hash: &str,
		expires_at: DateTime<Utc>,
	) -> Result<(), DbError> {
		sqlx::query(
			"INSERT INTO sessions (user_id, token_hash, created_at, expires_at) VALUES (?, ?, ?, ?)",
		)
		.bind(user_id.into_inner())
		.bind(token_hash)
		.bind(format_timestamp(Utc::now()))
		.bind(format_timestamp(expires_at))
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_on_unique(e, "session token"))?;

		tracing::debug!(user_id = %user_id, "session created");
		Ok(())
	}

	/// The principal behind an unexpired session, if any.
	#[tracing::instrument(skip(self, token_hash))]
	pub async fn resolve_principal(
		&self,
		token_hash: &str,
		now: DateTime<Utc>,
	) -> Result<Option<Principal>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT p.id, p.username, p.role, p.team_id
			FROM sessions s
			JOIN profiles p ON p.id = s.user_id
			WHERE s.token_hash = ? AND s.expires_at > ?
			"#,
		)
		.bind(token_hash)
		.bind(format_timestamp(now))
		.fetch_optional(&self.pool)
		.await?;

		let Some(row) = row else {
			return Ok(None);
		};

		let role: String = row.get("role");
		let team_id: Option<i64> = row.get("team_id");
		let mut principal = Principal::new(
			UserId::new(row.get("id")),
			row.get::<String, _>("username"),
			parse_enum(&role, "role")?,
		);
		if let Some(team) = team_id {
			principal = principal.with_team(TeamId::new(team));
		}
		Ok(Some(principal))
	}

	#[tracing::instrument(skip(self, token_hash))]
	pub async fn delete_session(&self, token_hash: &str) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
			.bind(token_hash)
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self))]
	pub async fn cleanup_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
			.bind(format_timestamp(now))
			.execute(&self.pool)
			.await?;

		let count = result.rows_affected();
		if count > 0 {
			tracing::debug!(count, "cleaned up expired sessions");
		}
		Ok(count)
	}
}
