// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::Utc;
use hub_common_ticket::{TeamId, UserId};
use hub_server_auth::{Profile, ProfilePayload, Role};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use crate::error::{conflict_on_unique, DbError};
use crate::row::{format_timestamp, parse_enum, parse_timestamp};

/// Fields for a new profile. Account creation itself lives outside the hub;
/// this exists for provisioning and tests.
#[derive(Debug, Clone)]
pub struct NewProfile {
	pub username: String,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub role: Role,
	pub team: Option<TeamId>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
	async fn create_profile(&self, profile: &NewProfile) -> Result<Profile, DbError>;
	async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, DbError>;
	async fn list_profiles(
		&self,
		username_contains: Option<&str>,
		limit: i64,
		offset: i64,
	) -> Result<Vec<Profile>, DbError>;
	async fn update_profile(&self, id: UserId, changes: &ProfilePayload) -> Result<Profile, DbError>;
}

#[async_trait]
impl ProfileStore for ProfileRepository {
	async fn create_profile(&self, profile: &NewProfile) -> Result<Profile, DbError> {
		self.create_profile(profile).await
	}

	async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, DbError> {
		self.get_profile(id).await
	}

	async fn list_profiles(
		&self,
		username_contains: Option<&str>,
		limit: i64,
		offset: i64,
	) -> Result<Vec<Profile>, DbError> {
		self.list_profiles(username_contains, limit, offset).await
	}

	async fn update_profile(&self, id: UserId, changes: &ProfilePayload) -> Result<Profile, DbError> {
		self.update_profile(id, changes).await
	}
}

/// Repository for user profiles.
#[derive(Clone)]
pub struct ProfileRepository {
	pool: SqlitePool,
}

const PROFILE_COLUMNS: &str =
	"id, username, first_name, last_name, email, role, team_id, created_at";

impl ProfileRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// # Errors
	/// `DbError::Conflict` if the username is taken.
	#[tracing::instrument(skip(self, profile), fields(username = %profile.username, role = %profile.role))]
	pub async fn create_profile(&self, profile: &NewProfile) -> Result<Profile, DbError> {
		let now = Utc::now();
		let result = sqlx::query(
			r#"
			INSERT INTO profiles (username, first_name, last_name, email, role, team_id, created_at)
			VALUES (?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(&profile.username)
		.bind(&profile.first_name)
		.bind(&profile.last_name)
		.bind(&profile.email)
		.bind(profile.role.as_str())
		.bind(profile.team.map(TeamId::into_inner))
		.bind(format_timestamp(now))
		.execute(&self.pool)
		.await
		.map_err(|e| conflict_on_unique(e, "username"))?;

		let id = UserId::new(result.last_insert_rowid());
		tracing::debug!(user_id = %id, "profile created");
		self
			.get_profile(id)
			.await?
			.ok_or_else(|| DbError::Internal(format!("profile {id} vanished after insert")))
	}

	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, DbError> {
		let row = sqlx::query(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?"))
			.bind(id.into_inner())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_profile_row).transpose()
	}

	/// Profiles ordered by username, optionally narrowed by a
	/// case-insensitive username substring.
	#[tracing::instrument(skip(self))]
	pub async fn list_profiles(
		&self,
		username_contains: Option<&str>,
		limit: i64,
		offset: i64,
	) -> Result<Vec<Profile>, DbError> {
		let mut qb: QueryBuilder<Sqlite> =
			QueryBuilder::new(format!("SELECT {PROFILE_COLUMNS} FROM profiles"));
		if let Some(needle) = username_contains {
			qb.push(" WHERE instr(lower(username), lower(")
				.push_bind(needle.to_string())
				.push(")) > 0");
		}
		qb.push(" ORDER BY username ASC, id ASC LIMIT ")
			.push_bind(limit)
			.push(" OFFSET ")
			.push_bind(offset);

		let rows = qb.build().fetch_all(&self.pool).await?;
		rows.iter().map(parse_profile_row).collect()
	}

	/// Apply whichever fields `changes` carries.
	///
	/// # Errors
	/// - `DbError::NotFound` if the profile does not exist
	/// - `DbError::Conflict` if the new username is taken
	#[tracing::instrument(skip(self, changes), fields(user_id = %id))]
	pub async fn update_profile(&self, id: UserId, changes: &ProfilePayload) -> Result<Profile, DbError> {
		if !changes.is_empty() {
			let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE profiles SET ");
			let mut set = qb.separated(", ");
			if let Some(first_name) = &changes.first_name {
				set.push("first_name = ").push_bind_unseparated(first_name.clone());
			}
			if let Some(last_name) = &changes.last_name {
				set.push("last_name = ").push_bind_unseparated(last_name.clone());
			}
			if let Some(username) = &changes.username {
				set.push("username = ").push_bind_unseparated(username.clone());
			}
			if let Some(role) = changes.role {
				set.push("role = ").push_bind_unseparated(role.as_str());
			}
			if let Some(team) = changes.team {
				set.push("team_id = ").push_bind_unseparated(team.map(TeamId::into_inner));
			}
			qb.push(" WHERE id = ").push_bind(id.into_inner());

			let result = qb
				.build()
				.execute(&self.pool)
				.await
				.map_err(|e| conflict_on_unique(e, "username"))?;
			if result.rows_affected() == 0 {
				return Err(DbError::NotFound(format!("profile {id}")));
			}
			tracing::debug!(user_id = %id, "profile updated");
		}

		self
			.get_profile(id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("profile {id}")))
	}
}

pub(crate) fn parse_profile_row(row: &sqlx::sqlite::SqliteRow) -> Result<Profile, DbError> {
	let role: String = row.get("role");
	let created_at: String = row.get("created_at");
	let team_id: Option<i64> = row.get("team_id");

	Ok(Profile {
		id: UserId::new(row.get("id")),
		username: row.get("username"),
		first_name: row.get("first_name"),
		last_name: row.get("last_name"),
		email: row.get("email"),
		role: parse_enum(&role, "role")?,
		team: team_id.map(TeamId::new),
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}
