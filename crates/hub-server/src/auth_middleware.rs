// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session-resolving middleware and the principal extractor.
//!
//! [`auth_layer`] runs on every request. It looks for the session cookie
//! first, then an `Authorization: Bearer` token, hashes whatever it finds
//! and asks the session store for the principal. The outcome is stored as an
//! [`AuthContext`] extension; requests without a valid session continue
//! unauthenticated.
//!
//! Handlers that need a principal take [`RequireAuth`]:
//!
//! ```ignore
//! async fn handler(RequireAuth(principal): RequireAuth) -> impl IntoResponse {
//!     format!("Hello, {}!", principal.username)
//! }
//! ```

use std::sync::Arc;

use axum::{
	body::Body,
	extract::{FromRequestParts, State},
	http::{request::Parts, Request},
	middleware::Next,
	response::Response,
};
use chrono::Utc;
use hub_server_auth::{extract_bearer_token, extract_session_cookie, hash_token, Principal};
use hub_server_db::SessionStore;

use crate::api::AppState;
use crate::error::{ActionError, DEFAULT_LOGIN_PATH};

/// Per-request authentication outcome.
#[derive(Debug, Clone)]
pub struct AuthContext {
	pub principal: Option<Principal>,
	pub login_path: Arc<str>,
}

impl AuthContext {
	pub fn unauthenticated() -> Self {
		Self {
			principal: None,
			login_path: Arc::from(DEFAULT_LOGIN_PATH),
		}
	}
}

pub async fn auth_layer(
	State(state): State<AppState>,
	mut request: Request<Body>,
	next: Next,
) -> Response {
	let headers = request.headers();
	let token = extract_session_cookie(headers, &state.auth.session_cookie_name)
		.or_else(|| extract_bearer_token(headers));

	let principal = match token {
		Some(token) => resolve_session(state.sessions.as_ref(), &token).await,
		None => None,
	};

	request.extensions_mut().insert(AuthContext {
		principal,
		login_path: state.auth.login_path.clone(),
	});
	next.run(request).await
}

/// Look up the principal behind a raw session token. Store failures are
/// logged and treated as "no session".
async fn resolve_session(sessions: &dyn SessionStore, token: &str) -> Option<Principal> {
	let token_hash = hash_token(token);
	match sessions.resolve_principal(&token_hash, Utc::now()).await {
		Ok(Some(principal)) => {
			tracing::debug!(user_id = %principal.id, role = %principal.role, "session resolved");
			Some(principal)
		}
		Ok(None) => {
			tracing::debug!("unknown or expired session");
			None
		}
		Err(e) => {
			tracing::warn!(error = %e, "failed to resolve session");
			None
		}
	}
}

/// Extractor for handlers that need an authenticated principal.
///
/// Rejects with a redirect to the login page that carries the original
/// path and query as `next`.
pub struct RequireAuth(pub Principal);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = Response;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let ctx = parts
			.extensions
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_else(AuthContext::unauthenticated);

		match ctx.principal {
			Some(principal) => Ok(RequireAuth(principal)),
			None => {
				let return_to = parts
					.uri
					.path_and_query()
					.map(|pq| pq.as_str().to_string())
					.unwrap_or_else(|| "/".to_string());
				tracing::debug!(return_to = %return_to, "authentication required");
				Err(ActionError::AuthenticationRequired { return_to }
					.into_response_with_login(&ctx.login_path))
			}
		}
	}
}
