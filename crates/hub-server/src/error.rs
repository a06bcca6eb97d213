// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Action errors and their HTTP responses.
//!
//! | Variant                  | Status | Notes                                 |
//! |--------------------------|--------|---------------------------------------|
//! | `AuthenticationRequired` | 303    | to the login page with `?next=`       |
//! | `MalformedIdentifier`    | 303    | to `/` with an explanatory message    |
//! | `Forbidden`              | 403    |                                       |
//! | `NotFound`               | 404    |                                       |
//! | `ValidationFailed`       | 422    | structured `[{field, code, message}]` |
//! | `Internal`               | 500    | logged, generic message to the caller |
//!
//! Notification failures are never errors; they ride along on a successful
//! response as a `DeliveryOutcome`.

use axum::{
	http::{header::LOCATION, StatusCode},
	response::{IntoResponse, Response},
	Json,
};
use hub_common_ticket::{IdParseError, ValidationError, ValidationErrors};
use hub_server_db::DbError;
use serde::Serialize;

use crate::attachments::AttachmentError;

/// Login page used when no configured path is at hand.
pub const DEFAULT_LOGIN_PATH: &str = "/accounts/login/";

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
	#[error("authentication required")]
	AuthenticationRequired { return_to: String },

	#[error("you do not have permission to perform this action")]
	Forbidden,

	#[error("not found: {0}")]
	NotFound(String),

	#[error("validation failed: {0}")]
	ValidationFailed(ValidationErrors),

	#[error("malformed identifier: {raw}")]
	MalformedIdentifier { raw: String },

	#[error("internal error: {0}")]
	Internal(String),
}

pub type ActionResult<T> = Result<T, ActionError>;

impl ActionError {
	pub fn not_found(what: impl Into<String>) -> Self {
		ActionError::NotFound(what.into())
	}

	pub fn invalid(error: ValidationError) -> Self {
		ActionError::ValidationFailed(ValidationErrors::single(error))
	}

	/// Render with an explicit login page. Only `AuthenticationRequired`
	/// depends on it.
	pub fn into_response_with_login(self, login_path: &str) -> Response {
		match self {
			ActionError::AuthenticationRequired { return_to } => {
				redirect(&login_redirect(login_path, &return_to), "Please log in to continue.")
			}
			other => other.into_response(),
		}
	}
}

impl From<DbError> for ActionError {
	fn from(e: DbError) -> Self {
		match e {
			DbError::NotFound(what) => ActionError::NotFound(what),
			other => ActionError::Internal(other.to_string()),
		}
	}
}

impl From<AttachmentError> for ActionError {
	fn from(e: AttachmentError) -> Self {
		ActionError::Internal(e.to_string())
	}
}

impl From<ValidationErrors> for ActionError {
	fn from(errors: ValidationErrors) -> Self {
		ActionError::ValidationFailed(errors)
	}
}

impl From<IdParseError> for ActionError {
	fn from(e: IdParseError) -> Self {
		ActionError::MalformedIdentifier { raw: e.raw }
	}
}

/// `{login_path}?next={return_to}`, with the return path URL-encoded.
pub fn login_redirect(login_path: &str, return_to: &str) -> String {
	format!("{login_path}?next={}", urlencoding::encode(return_to))
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub errors: Option<Vec<ValidationError>>,
}

impl ErrorResponse {
	fn new(error: &str, message: impl Into<String>) -> Self {
		Self {
			error: error.to_string(),
			message: message.into(),
			errors: None,
		}
	}
}

fn redirect(location: &str, message: &str) -> Response {
	(
		StatusCode::SEE_OTHER,
		[(LOCATION, location.to_string())],
		Json(ErrorResponse::new("redirect", message)),
	)
		.into_response()
}

impl IntoResponse for ActionError {
	fn into_response(self) -> Response {
		let (status, body) = match self {
			ActionError::AuthenticationRequired { return_to } => {
				return redirect(
					&login_redirect(DEFAULT_LOGIN_PATH, &return_to),
					"Please log in to continue.",
				);
			}
			ActionError::MalformedIdentifier { raw } => {
				tracing::debug!(raw = %raw, "malformed identifier in path");
				return redirect("/", &format!("\"{raw}\" is not a valid identifier."));
			}
			ActionError::Forbidden => (
				StatusCode::FORBIDDEN,
				ErrorResponse::new(
					"forbidden",
					"You do not have permission to perform this action.",
				),
			),
			ActionError::NotFound(what) => (
				StatusCode::NOT_FOUND,
				ErrorResponse::new("not_found", format!("Not found: {what}")),
			),
			ActionError::ValidationFailed(errors) => (
				StatusCode::UNPROCESSABLE_ENTITY,
				ErrorResponse {
					error: "validation_failed".to_string(),
					message: "The submitted data is invalid.".to_string(),
					errors: Some(errors.0),
				},
			),
			ActionError::Internal(e) => {
				tracing::error!(error = %e, "internal error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "An internal error occurred"),
				)
			}
		};

		(status, Json(body)).into_response()
	}
}
