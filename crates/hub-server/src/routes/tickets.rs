// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ticket HTTP handlers.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use hub_common_ticket::{TicketId, TicketPayload};
use hub_server_auth::TicketFilter;

use super::parse_id;
use crate::actions::CommentPayload;
use crate::api::AppState;
use crate::auth_middleware::RequireAuth;
use crate::error::ActionError;
use crate::pagination::PaginationParams;

/// GET /tickets/
pub async fn list_tickets(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Query(filter): Query<TicketFilter>,
	Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ActionError> {
	let listings = state.actions.list_tickets(&principal, filter, page).await?;
	Ok(Json(listings))
}

/// POST /tickets/
pub async fn create_ticket(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Json(payload): Json<TicketPayload>,
) -> Result<impl IntoResponse, ActionError> {
	let ticket = state.actions.create_ticket(&principal, payload).await?;
	Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /tickets/{id}/
pub async fn view_ticket(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ActionError> {
	let id: TicketId = parse_id(&id)?;
	let detail = state.actions.view_ticket(&principal, id).await?;
	Ok(Json(detail))
}

/// PATCH|PUT /tickets/{id}/
pub async fn update_ticket(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Path(id): Path<String>,
	Json(payload): Json<TicketPayload>,
) -> Result<impl IntoResponse, ActionError> {
	let id: TicketId = parse_id(&id)?;
	let ticket = state.actions.update_ticket(&principal, id, payload).await?;
	Ok(Json(ticket))
}

/// DELETE /tickets/{id}/
pub async fn delete_ticket(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ActionError> {
	let id: TicketId = parse_id(&id)?;
	state.actions.delete_ticket(&principal, id).await?;
	Ok(StatusCode::NO_CONTENT)
}

/// POST /tickets/{id}/comments/
pub async fn add_comment(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Path(id): Path<String>,
	Json(payload): Json<CommentPayload>,
) -> Result<impl IntoResponse, ActionError> {
	let id: TicketId = parse_id(&id)?;
	let created = state.actions.add_comment(&principal, id, payload).await?;
	Ok((StatusCode::CREATED, Json(created)))
}
