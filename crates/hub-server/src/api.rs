// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router.

use std::sync::Arc;

use axum::{
	middleware,
	routing::{get, post},
	Router,
};
use hub_server_config::ServerConfig;
use hub_server_db::{
	ProfileRepository, ReferenceRepository, SessionRepository, SessionStore, SqlitePool,
	TicketRepository,
};
use hub_server_email::{DisabledTransport, NotificationDispatcher, SmtpGateway, TransportGateway};
use hub_server_smtp::SmtpClient;

use crate::actions::HubActions;
use crate::attachments::{AttachmentStore, LocalAttachmentStore};
use crate::auth_middleware::auth_layer;
use crate::routes;

/// Session settings the middleware needs.
#[derive(Debug, Clone)]
pub struct AuthSettings {
	pub session_cookie_name: String,
	pub login_path: Arc<str>,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub actions: HubActions,
	pub sessions: Arc<dyn SessionStore>,
	pub auth: AuthSettings,
	/// Checked by `/health` when present.
	pub pool: Option<SqlitePool>,
	/// Relay probed by `/health`; `None` when SMTP is not configured.
	pub smtp: Option<SmtpClient>,
}

/// Wire repositories, attachment storage and the notification transport
/// from configuration.
///
/// # Errors
/// Fails if SMTP is configured but the client cannot be built.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> anyhow::Result<AppState> {
	let smtp = match &config.smtp {
		Some(smtp) => {
			tracing::info!(host = %smtp.host, port = smtp.port, "SMTP notifications enabled");
			Some(SmtpClient::new(smtp.clone())?)
		}
		None => {
			tracing::info!("SMTP not configured, comment notifications will report a warning");
			None
		}
	};
	let transport: Arc<dyn TransportGateway> = match &smtp {
		Some(client) => Arc::new(SmtpGateway::new(client.clone())),
		None => Arc::new(DisabledTransport),
	};

	let dispatcher = NotificationDispatcher::new(transport, config.http.base_url.clone())
		.with_timeout(config.notifications.timeout);
	let attachments: Arc<dyn AttachmentStore> =
		Arc::new(LocalAttachmentStore::new(config.attachments.dir.clone()));
	let max_attachment_bytes = usize::try_from(config.attachments.max_bytes).unwrap_or(usize::MAX);

	let actions = HubActions::new(
		Arc::new(TicketRepository::new(pool.clone())),
		Arc::new(ProfileRepository::new(pool.clone())),
		Arc::new(ReferenceRepository::new(pool.clone())),
		attachments,
		dispatcher,
	)
	.with_max_attachment_bytes(max_attachment_bytes);

	Ok(AppState {
		actions,
		sessions: Arc::new(SessionRepository::new(pool.clone())),
		auth: AuthSettings {
			session_cookie_name: config.auth.session_cookie_name.clone(),
			login_path: Arc::from(config.auth.login_path.as_str()),
		},
		pool: Some(pool),
		smtp,
	})
}

pub fn create_router(state: AppState) -> Router {
	let api = Router::new()
		.route(
			"/tickets/",
			get(routes::tickets::list_tickets).post(routes::tickets::create_ticket),
		)
		.route(
			"/tickets/{id}/",
			get(routes::tickets::view_ticket)
				.patch(routes::tickets::update_ticket)
				.put(routes::tickets::update_ticket)
				.delete(routes::tickets::delete_ticket),
		)
		.route("/tickets/{id}/comments/", post(routes::tickets::add_comment))
		.route("/profiles/", get(routes::profiles::list_profiles))
		.route(
			"/profiles/{id}/",
			get(routes::profiles::view_profile)
				.patch(routes::profiles::update_profile)
				.put(routes::profiles::update_profile),
		)
		.route_layer(middleware::from_fn_with_state(state.clone(), auth_layer));

	Router::new()
		.route("/health", get(routes::health::health_check))
		.merge(api)
		.with_state(state)
}
