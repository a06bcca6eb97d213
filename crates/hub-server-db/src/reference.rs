// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Teams and ticket categories.

use async_trait::async_trait;
use hub_common_ticket::{Category, CategoryId, Team, TeamId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::{conflict_on_unique, DbError};

#[async_trait]
pub trait ReferenceStore: Send + Sync {
	async fn create_team(&self, name: &str) -> Result<Team, DbError>;
	async fn create_category(&self, name: &str) -> Result<Category, DbError>;
	async fn team_exists(&self, id: TeamId) -> Result<bool, DbError>;
	async fn category_exists(&self, id: CategoryId) -> Result<bool, DbError>;
	async fn list_teams(&self) -> Result<Vec<Team>, DbError>;
	async fn list_categories(&self) -> Result<Vec<Category>, DbError>;
}

#[async_trait]
impl ReferenceStore for ReferenceRepository {
	async fn create_team(&self, name: &str) -> Result<Team, DbError> {
		self.create_team(name).await
	}

	async fn create_category(&self, name: &str) -> Result<Category, DbError> {
		self.create_category(name).await
	}

	async fn team_exists(&self, id: TeamId) -> Result<bool, DbError> {
		self.team_exists(id).await
	}

	async fn category_exists(&self, id: CategoryId) -> Result<bool, DbError> {
		self.category_exists(id).await
	}

	async fn list_teams(&self) -> Result<Vec<Team>, DbError> {
		self.list_teams().await
	}

	async fn list_categories(&self) -> Result<Vec<Category>, DbError> {
		self.list_categories().await
	}
}

#[derive(Clone)]
pub struct ReferenceRepository {
	pool: SqlitePool,
}

impl ReferenceRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn create_team(&self, name: &str) -> Result<Team, DbError> {
		let result = sqlx::query("INSERT INTO teams (name) VALUES (?)")
			.bind(name)
			.execute(&self.pool)
			.await
			.map_err(|e| conflict_on_unique(e, "team name"))?;

		Ok(Team {
			id: TeamId::new(result.last_insert_rowid()),
			name: name.to_string(),
		})
	}

	#[tracing::instrument(skip(self))]
	pub async fn create_category(&self, name: &str) -> Result<Category, DbError> {
		let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
			.bind(name)
			.execute(&self.pool)
			.await
			.map_err(|e| conflict_on_unique(e, "category name"))?;

		Ok(Category {
			id: CategoryId::new(result.last_insert_rowid()),
			name: name.to_string(),
		})
	}

	#[tracing::instrument(skip(self), fields(team_id = %id))]
	pub async fn team_exists(&self, id: TeamId) -> Result<bool, DbError> {
		let row = sqlx::query("SELECT 1 FROM teams WHERE id = ?")
			.bind(id.into_inner())
			.fetch_optional(&self.pool)
			.await?;
		Ok(row.is_some())
	}

	#[tracing::instrument(skip(self), fields(category_id = %id))]
	pub async fn category_exists(&self, id: CategoryId) -> Result<bool, DbError> {
		let row = sqlx::query("SELECT 1 FROM categories WHERE id = ?")
			.bind(id.into_inner())
			.fetch_optional(&self.pool)
			.await?;
		Ok(row.is_some())
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_teams(&self) -> Result<Vec<Team>, DbError> {
		let rows = sqlx::query("SELECT id, name FROM teams ORDER BY name")
			.fetch_all(&self.pool)
			.await?;

		Ok(rows
			.iter()
			.map(|row| Team {
				id: TeamId::new(row.get("id")),
				name: row.get("name"),
			})
			.collect())
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_categories(&self) -> Result<Vec<Category>, DbError> {
		let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name")
			.fetch_all(&self.pool)
			.await?;

		Ok(rows
			.iter()
			.map(|row| Category {
				id: CategoryId::new(row.get("id")),
				name: row.get("name"),
			})
			.collect())
	}
}
