// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Degraded,
	Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub database: HealthStatus,
	/// Comments still succeed with a warning when the relay is missing or
	/// unreachable, so this never goes beyond degraded.
	pub notifications: HealthStatus,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database = match &state.pool {
		Some(pool) => match hub_server_db::ping(pool).await {
			Ok(()) => HealthStatus::Healthy,
			Err(e) => {
				tracing::warn!(error = %e, "database health check failed");
				HealthStatus::Unhealthy
			}
		},
		None => HealthStatus::Healthy,
	};
	let notifications = match &state.smtp {
		Some(client) => match client.check_health().await {
			Ok(()) => HealthStatus::Healthy,
			Err(e) => {
				tracing::warn!(error = %e, "SMTP health check failed");
				HealthStatus::Degraded
			}
		},
		None => HealthStatus::Degraded,
	};

	let status = match (database, notifications) {
		(HealthStatus::Unhealthy, _) => HealthStatus::Unhealthy,
		(_, HealthStatus::Healthy) => HealthStatus::Healthy,
		_ => HealthStatus::Degraded,
	};
	let code = if status == HealthStatus::Unhealthy {
		StatusCode::SERVICE_UNAVAILABLE
	} else {
		StatusCode::OK
	};

	(
		code,
		Json(HealthResponse {
			status,
			database,
			notifications,
		}),
	)
}
