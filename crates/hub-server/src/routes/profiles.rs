// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile HTTP handlers.

use axum::{
	extract::{Path, Query, State},
	response::IntoResponse,
	Json,
};
use hub_server_auth::{ProfileFilter, ProfilePayload, UserId};

use super::parse_id;
use crate::api::AppState;
use crate::auth_middleware::RequireAuth;
use crate::error::ActionError;
use crate::pagination::PaginationParams;

/// GET /profiles/
pub async fn list_profiles(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Query(filter): Query<ProfileFilter>,
	Query(page): Query<PaginationParams>,
) -> Result<impl IntoResponse, ActionError> {
	let profiles = state.actions.list_profiles(&principal, filter, page).await?;
	Ok(Json(profiles))
}

/// GET /profiles/{id}/
pub async fn view_profile(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Path(id): Path<String>,
) -> Result<impl IntoResponse, ActionError> {
	let id: UserId = parse_id(&id)?;
	Ok(Json(state.actions.view_profile(&principal, id).await?))
}

/// PATCH|PUT /profiles/{id}/
pub async fn update_profile(
	State(state): State<AppState>,
	RequireAuth(principal): RequireAuth,
	Path(id): Path<String>,
	Json(payload): Json<ProfilePayload>,
) -> Result<impl IntoResponse, ActionError> {
	let id: UserId = parse_id(&id)?;
	Ok(Json(state.actions.update_profile(&principal, id, payload).await?))
}
