// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket and comment persistence.
//!
//! Listings render a [`TicketQuery`] to SQL: the scope predicate first, then
//! the optional filter clauses, then ordering with an id tie-break and
//! pagination. `updated_at` is only ever written as
//! `MAX(updated_at, now)` so concurrent writers cannot move it backwards.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hub_common_ticket::{
	AttachmentRef, CategoryId, Comment, CommentId, TeamId, Ticket, TicketId, TicketPriority,
	TicketStatus, TicketType, UserId,
};
use hub_server_auth::{StatusFilter, TicketListing, TicketOrdering, TicketQuery, TicketScope};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use crate::error::DbError;
use crate::row::{format_timestamp, parse_enum, parse_timestamp};

/// A ticket ready to insert. Defaults and author have already been resolved.
#[derive(Debug, Clone)]
pub struct NewTicket {
	pub author: UserId,
	pub title: String,
	pub description: String,
	pub status: TicketStatus,
	pub ticket_type: TicketType,
	pub priority: TicketPriority,
	pub category: Option<CategoryId>,
	pub assigned_team: Option<TeamId>,
	pub assigned_technician: Option<UserId>,
	pub attachment: Option<AttachmentRef>,
}

/// Column changes for an update. `None` leaves a column alone.
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
	pub author: Option<UserId>,
	pub title: Option<String>,
	pub description: Option<String>,
	pub status: Option<TicketStatus>,
	pub ticket_type: Option<TicketType>,
	pub priority: Option<TicketPriority>,
	pub category: Option<Option<CategoryId>>,
	pub assigned_team: Option<Option<TeamId>>,
	pub assigned_technician: Option<Option<UserId>>,
	pub attachment: Option<AttachmentRef>,
}

#[async_trait]
pub trait TicketStore: Send + Sync {
	async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, DbError>;
	async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, DbError>;
	async fn update_ticket(&self, id: TicketId, changes: &TicketChanges) -> Result<Ticket, DbError>;
	async fn delete_ticket(&self, id: TicketId) -> Result<bool, DbError>;
	async fn list_tickets(
		&self,
		query: &TicketQuery,
		limit: i64,
		offset: i64,
	) -> Result<Vec<TicketListing>, DbError>;
	async fn count_tickets(&self) -> Result<i64, DbError>;
	async fn add_comment(
		&self,
		ticket_id: TicketId,
		author: UserId,
		body: &str,
	) -> Result<(Comment, Ticket), DbError>;
	async fn list_comments(&self, ticket_id: TicketId) -> Result<Vec<Comment>, DbError>;
}

#[async_trait]
impl TicketStore for TicketRepository {
	async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, DbError> {
		self.create_ticket(ticket).await
	}

	async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, DbError> {
		self.get_ticket(id).await
	}

	async fn update_ticket(&self, id: TicketId, changes: &TicketChanges) -> Result<Ticket, DbError> {
		self.update_ticket(id, changes).await
	}

	async fn delete_ticket(&self, id: TicketId) -> Result<bool, DbError> {
		self.delete_ticket(id).await
	}

	async fn list_tickets(
		&self,
		query: &TicketQuery,
		limit: i64,
		offset: i64,
	) -> Result<Vec<TicketListing>, DbError> {
		self.list_tickets(query, limit, offset).await
	}

	async fn count_tickets(&self) -> Result<i64, DbError> {
		self.count_tickets().await
	}

	async fn add_comment(
		&self,
		ticket_id: TicketId,
		author: UserId,
		body: &str,
	) -> Result<(Comment, Ticket), DbError> {
		self.add_comment(ticket_id, author, body).await
	}

	async fn list_comments(&self, ticket_id: TicketId) -> Result<Vec<Comment>, DbError> {
		self.list_comments(ticket_id).await
	}
}

/// Repository for tickets and their comments.
#[derive(Clone)]
pub struct TicketRepository {
	pool: SqlitePool,
}

const TICKET_COLUMNS: &str = "t.id, t.author_id, t.title, t.description, t.status, t.ticket_type, \
	t.priority, t.category_id, t.assigned_team_id, t.assigned_technician_id, t.attachment, \
	t.created_at, t.updated_at";

impl TicketRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, ticket), fields(author_id = %ticket.author))]
	pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, DbError> {
		let now = format_timestamp(Utc::now());
		let result = sqlx::query(
			r#"
			INSERT INTO tickets (
				author_id, title, description, status, ticket_type, priority,
				category_id, assigned_team_id, assigned_technician_id, attachment,
				created_at, updated_at
			) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(ticket.author.into_inner())
		.bind(&ticket.title)
		.bind(&ticket.description)
		.bind(ticket.status.as_str())
		.bind(ticket.ticket_type.as_str())
		.bind(ticket.priority.as_str())
		.bind(ticket.category.map(CategoryId::into_inner))
		.bind(ticket.assigned_team.map(TeamId::into_inner))
		.bind(ticket.assigned_technician.map(UserId::into_inner))
		.bind(ticket.attachment.as_ref().map(|a| a.as_str().to_string()))
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await?;

		let id = TicketId::new(result.last_insert_rowid());
		tracing::debug!(ticket_id = %id, "ticket created");
		self
			.get_ticket(id)
			.await?
			.ok_or_else(|| DbError::Internal(format!("ticket {id} vanished after insert")))
	}

	#[tracing::instrument(skip(self), fields(ticket_id = %id))]
	pub async fn get_ticket(&self, id: TicketId) -> Result<Option<Ticket>, DbError> {
		let row = sqlx::query(&format!("SELECT {TICKET_COLUMNS} FROM tickets t WHERE t.id = ?"))
			.bind(id.into_inner())
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_ticket_row).transpose()
	}

	/// Apply `changes` in one statement and bump `updated_at`.
	///
	/// # Errors
	/// `DbError::NotFound` if the ticket does not exist.
	#[tracing::instrument(skip(self, changes), fields(ticket_id = %id))]
	pub async fn update_ticket(&self, id: TicketId, changes: &TicketChanges) -> Result<Ticket, DbError> {
		let now = format_timestamp(Utc::now());
		let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tickets SET updated_at = MAX(updated_at, ");
		qb.push_bind(now).push(")");

		if let Some(author) = changes.author {
			qb.push(", author_id = ").push_bind(author.into_inner());
		}
		if let Some(title) = &changes.title {
			qb.push(", title = ").push_bind(title.clone());
		}
		if let Some(description) = &changes.description {
			qb.push(", description = ").push_bind(description.clone());
		}
		if let Some(status) = changes.status {
			qb.push(", status = ").push_bind(status.as_str());
		}
		if let Some(ticket_type) = changes.ticket_type {
			qb.push(", ticket_type = ").push_bind(ticket_type.as_str());
		}
		if let Some(priority) = changes.priority {
			qb.push(", priority = ").push_bind(priority.as_str());
		}
		if let Some(category) = changes.category {
			qb.push(", category_id = ").push_bind(category.map(CategoryId::into_inner));
		}
		if let Some(team) = changes.assigned_team {
			qb.push(", assigned_team_id = ").push_bind(team.map(TeamId::into_inner));
		}
		if let Some(technician) = changes.assigned_technician {
			qb.push(", assigned_technician_id = ").push_bind(technician.map(UserId::into_inner));
		}
		if let Some(attachment) = &changes.attachment {
			qb.push(", attachment = ").push_bind(attachment.as_str().to_string());
		}
		qb.push(" WHERE id = ").push_bind(id.into_inner());

		let result = qb.build().execute(&self.pool).await?;
		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("ticket {id}")));
		}

		tracing::debug!(ticket_id = %id, "ticket updated");
		self
			.get_ticket(id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("ticket {id}")))
	}

	/// Returns `false` if there was nothing to delete. Comments cascade.
	#[tracing::instrument(skip(self), fields(ticket_id = %id))]
	pub async fn delete_ticket(&self, id: TicketId) -> Result<bool, DbError> {
		let mut tx = self.pool.begin().await?;
		sqlx::query("DELETE FROM comments WHERE ticket_id = ?")
			.bind(id.into_inner())
			.execute(&mut *tx)
			.await?;
		let result = sqlx::query("DELETE FROM tickets WHERE id = ?")
			.bind(id.into_inner())
			.execute(&mut *tx)
			.await?;
		tx.commit().await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::debug!(ticket_id = %id, "ticket deleted");
		}
		Ok(deleted)
	}

	/// Scoped, filtered, ordered page of tickets.
	#[tracing::instrument(skip(self, query), fields(scope = ?query.scope, ordering = ?query.ordering))]
	pub async fn list_tickets(
		&self,
		query: &TicketQuery,
		limit: i64,
		offset: i64,
	) -> Result<Vec<TicketListing>, DbError> {
		let mut qb = build_listing_query(query);
		qb.push(" LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);

		let rows = qb.build().fetch_all(&self.pool).await?;
		rows
			.iter()
			.map(|row| {
				Ok(TicketListing {
					ticket: parse_ticket_row(row)?,
					author_username: row.get("author_username"),
					technician_username: row.get("technician_username"),
				})
			})
			.collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn count_tickets(&self) -> Result<i64, DbError> {
		let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tickets")
			.fetch_one(&self.pool)
			.await?;
		Ok(count)
	}

	/// Insert a comment and bump the ticket's `updated_at` in one transaction.
	///
	/// Returns the comment and the ticket as committed.
	///
	/// # Errors
	/// `DbError::NotFound` if the ticket does not exist.
	#[tracing::instrument(skip(self, body), fields(ticket_id = %ticket_id, author_id = %author))]
	pub async fn add_comment(
		&self,
		ticket_id: TicketId,
		author: UserId,
		body: &str,
	) -> Result<(Comment, Ticket), DbError> {
		let now = Utc::now();
		let now_str = format_timestamp(now);

		let mut tx = self.pool.begin().await?;
		let bumped = sqlx::query("UPDATE tickets SET updated_at = MAX(updated_at, ?) WHERE id = ?")
			.bind(&now_str)
			.bind(ticket_id.into_inner())
			.execute(&mut *tx)
			.await?;
		if bumped.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("ticket {ticket_id}")));
		}

		let inserted = sqlx::query(
			"INSERT INTO comments (ticket_id, author_id, body, created_at) VALUES (?, ?, ?, ?)",
		)
		.bind(ticket_id.into_inner())
		.bind(author.into_inner())
		.bind(body)
		.bind(&now_str)
		.execute(&mut *tx)
		.await?;
		tx.commit().await?;

		let comment = Comment {
			id: CommentId::new(inserted.last_insert_rowid()),
			ticket_id,
			author,
			body: body.to_string(),
			created_at: parse_timestamp(&now_str, "created_at")?,
		};
		tracing::debug!(comment_id = %comment.id, ticket_id = %ticket_id, "comment created");

		let ticket = self
			.get_ticket(ticket_id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("ticket {ticket_id}")))?;
		Ok((comment, ticket))
	}

	/// Comments oldest first.
	#[tracing::instrument(skip(self), fields(ticket_id = %ticket_id))]
	pub async fn list_comments(&self, ticket_id: TicketId) -> Result<Vec<Comment>, DbError> {
		let rows = sqlx::query(
			"SELECT id, ticket_id, author_id, body, created_at FROM comments WHERE ticket_id = ? ORDER BY created_at ASC, id ASC",
		)
		.bind(ticket_id.into_inner())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_comment_row).collect()
	}
}

/// SELECT with joins, WHERE and ORDER BY for a listing, without pagination.
fn build_listing_query(query: &TicketQuery) -> QueryBuilder<'static, Sqlite> {
	let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
		"SELECT {TICKET_COLUMNS}, a.username AS author_username, tech.username AS technician_username \
		 FROM tickets t \
		 JOIN profiles a ON a.id = t.author_id \
		 LEFT JOIN profiles tech ON tech.id = t.assigned_technician_id \
		 WHERE 1 = 1"
	));

	if let TicketScope::AuthoredBy(author) = query.scope {
		qb.push(" AND t.author_id = ").push_bind(author.into_inner());
	}

	match query.status {
		Some(StatusFilter::Open) => {
			qb.push(" AND t.status != ").push_bind(TicketStatus::Closed.as_str());
		}
		Some(StatusFilter::Closed) => {
			qb.push(" AND t.status = ").push_bind(TicketStatus::Closed.as_str());
		}
		None => {}
	}

	for (column, needle) in [
		("a.username", &query.author_contains),
		("tech.username", &query.technician_contains),
		("t.title", &query.title_contains),
		("t.description", &query.description_contains),
	] {
		if let Some(needle) = needle {
			qb.push(format!(" AND instr(lower({column}), lower("))
				.push_bind(needle.clone())
				.push(")) > 0");
		}
	}

	if let Some(priority) = query.priority {
		qb.push(" AND t.priority = ").push_bind(priority.as_str());
	}
	if let Some(team) = query.team {
		qb.push(" AND t.assigned_team_id = ").push_bind(team.into_inner());
	}
	if let Some(category) = query.category {
		qb.push(" AND t.category_id = ").push_bind(category.into_inner());
	}
	if let Some(ticket_type) = query.ticket_type {
		qb.push(" AND t.ticket_type = ").push_bind(ticket_type.as_str());
	}
	if let Some(technician) = query.assigned_to {
		qb.push(" AND t.assigned_technician_id = ").push_bind(technician.into_inner());
	}

	qb.push(match query.ordering {
		TicketOrdering::CreatedAsc => " ORDER BY t.created_at ASC, t.id ASC",
		TicketOrdering::CreatedDesc => " ORDER BY t.created_at DESC, t.id DESC",
		TicketOrdering::UpdatedAsc => " ORDER BY t.updated_at ASC, t.id ASC",
		TicketOrdering::UpdatedDesc => " ORDER BY t.updated_at DESC, t.id DESC",
	});
	qb
}

fn parse_ticket_row(row: &sqlx::sqlite::SqliteRow) -> Result<Ticket, DbError> {
	let status: String = row.get("status");
	let ticket_type: String = row.get("ticket_type");
	let priority: String = row.get("priority");
	let category_id: Option<i64> = row.get("category_id");
	let assigned_team_id: Option<i64> = row.get("assigned_team_id");
	let assigned_technician_id: Option<i64> = row.get("assigned_technician_id");
	let attachment: Option<String> = row.get("attachment");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	let created_at: DateTime<Utc> = parse_timestamp(&created_at, "created_at")?;
	let updated_at: DateTime<Utc> = parse_timestamp(&updated_at, "updated_at")?;

	Ok(Ticket {
		id: TicketId::new(row.get("id")),
		author: UserId::new(row.get("author_id")),
		title: row.get("title"),
		description: row.get("description"),
		status: parse_enum(&status, "status")?,
		ticket_type: parse_enum(&ticket_type, "ticket_type")?,
		priority: parse_enum(&priority, "priority")?,
		category: category_id.map(CategoryId::new),
		assigned_team: assigned_team_id.map(TeamId::new),
		assigned_technician: assigned_technician_id.map(UserId::new),
		attachment: attachment.map(AttachmentRef::new),
		created_at,
		updated_at,
	})
}

fn parse_comment_row(row: &sqlx::sqlite::SqliteRow) -> Result<Comment, DbError> {
	let created_at: String = row.get("created_at");
	Ok(Comment {
		id: CommentId::new(row.get("id")),
		ticket_id: TicketId::new(row.get("ticket_id")),
		author: UserId::new(row.get("author_id")),
		body: row.get("body"),
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}
