// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hub_common_ticket::{AttachmentUpload, TicketPayload};
use hub_server::{HubActions, MemoryAttachmentStore};
use hub_server_auth::{Principal, Role};
use hub_server_db::testing::{create_test_pool, seed_profile};
use hub_server_db::{
	ProfileRepository, ReferenceRepository, SqlitePool, TicketRepository,
};
use hub_server_email::{
	NotificationDispatcher, OutboundMessage, TransportError, TransportGateway,
};

pub const BASE_URL: &str = "https://hub.example.com";
pub const VALID_DESCRIPTION: &str = "The printer on floor two is jammed again.";

#[derive(Default)]
pub struct RecordingTransport {
	pub sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingTransport {
	pub fn sent(&self) -> Vec<OutboundMessage> {
		self.sent.lock().unwrap().clone()
	}
}

#[async_trait]
impl TransportGateway for RecordingTransport {
	async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
		self.sent.lock().unwrap().push(message.clone());
		Ok(())
	}
}

/// Records the attempt, then fails.
#[derive(Default)]
pub struct FailingTransport {
	pub attempts: Mutex<Vec<String>>,
}

#[async_trait]
impl TransportGateway for FailingTransport {
	async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
		self.attempts.lock().unwrap().push(message.recipient.clone());
		Err(TransportError::Disabled)
	}
}

pub struct Harness {
	pub pool: SqlitePool,
	pub actions: HubActions,
	pub attachments: Arc<MemoryAttachmentStore>,
	pub alice: Principal,
	pub bob: Principal,
	pub carol: Principal,
	pub dan: Principal,
}

impl Harness {
	pub async fn new(transport: Arc<dyn TransportGateway>) -> Self {
		let pool = create_test_pool().await;
		let alice = seed_profile(&pool, "alice", Role::Customer).await.to_principal();
		let bob = seed_profile(&pool, "bob", Role::Technician).await.to_principal();
		let carol = seed_profile(&pool, "carol", Role::Customer).await.to_principal();
		let dan = seed_profile(&pool, "dan", Role::Administrator).await.to_principal();

		let attachments = Arc::new(MemoryAttachmentStore::new());
		let dispatcher = NotificationDispatcher::new(transport, BASE_URL)
			.with_timeout(Duration::from_secs(2));
		let actions = HubActions::new(
			Arc::new(TicketRepository::new(pool.clone())),
			Arc::new(ProfileRepository::new(pool.clone())),
			Arc::new(ReferenceRepository::new(pool.clone())),
			attachments.clone(),
			dispatcher,
		);

		Self {
			pool,
			actions,
			attachments,
			alice,
			bob,
			carol,
			dan,
		}
	}

	pub async fn with_recording() -> (Self, Arc<RecordingTransport>) {
		let transport = Arc::new(RecordingTransport::default());
		(Self::new(transport.clone()).await, transport)
	}
}

pub fn ticket_payload(title: &str) -> TicketPayload {
	TicketPayload {
		title: Some(title.to_string()),
		description: Some(VALID_DESCRIPTION.to_string()),
		..Default::default()
	}
}

pub fn png_upload() -> AttachmentUpload {
	let img = image::RgbImage::from_pixel(2, 2, image::Rgb([0, 128, 255]));
	let mut buf = Cursor::new(Vec::new());
	img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
	AttachmentUpload {
		filename: "screenshot.png".to_string(),
		content_type: "image/png".to_string(),
		data: buf.into_inner(),
	}
}
