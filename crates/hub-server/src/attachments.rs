// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attachment storage.
//!
//! Uploads are validated before they reach a store. A store hands back an
//! opaque [`AttachmentRef`] that the ticket row keeps; purging a reference
//! that no longer exists is not an error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use hub_common_ticket::validation::attachment_extension;
use hub_common_ticket::{AttachmentRef, AttachmentUpload};

#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
	#[error("attachment I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("invalid attachment reference: {0}")]
	InvalidReference(String),
}

#[async_trait]
pub trait AttachmentStore: Send + Sync {
	/// Persist `upload` and return a stable reference to it.
	async fn store(&self, upload: &AttachmentUpload) -> Result<AttachmentRef, AttachmentError>;

	/// Remove the stored bytes behind `reference`.
	async fn purge(&self, reference: &AttachmentRef) -> Result<(), AttachmentError>;
}

fn extension_for(content_type: &str) -> &'static str {
	attachment_extension(content_type).unwrap_or("jpg")
}

/// Files under a single directory, named by a random UUID.
pub struct LocalAttachmentStore {
	root: PathBuf,
}

impl LocalAttachmentStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// References are bare file names; anything that could walk out of the
	/// root is rejected.
	fn path_for(&self, reference: &AttachmentRef) -> Result<PathBuf, AttachmentError> {
		let name = reference.as_str();
		if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
			return Err(AttachmentError::InvalidReference(name.to_string()));
		}
		Ok(self.root.join(name))
	}
}

#[async_trait]
impl AttachmentStore for LocalAttachmentStore {
	#[tracing::instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.data.len()))]
	async fn store(&self, upload: &AttachmentUpload) -> Result<AttachmentRef, AttachmentError> {
		tokio::fs::create_dir_all(&self.root).await?;
		let name = format!(
			"{}.{}",
			uuid::Uuid::new_v4(),
			extension_for(&upload.content_type)
		);
		tokio::fs::write(self.root.join(&name), &upload.data).await?;
		tracing::debug!(reference = %name, "attachment stored");
		Ok(AttachmentRef::new(name))
	}

	#[tracing::instrument(skip(self), fields(reference = %reference.as_str()))]
	async fn purge(&self, reference: &AttachmentRef) -> Result<(), AttachmentError> {
		let path = self.path_for(reference)?;
		match tokio::fs::remove_file(&path).await {
			Ok(()) => {
				tracing::debug!("attachment purged");
				Ok(())
			}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!("attachment already gone");
				Ok(())
			}
			Err(e) => Err(e.into()),
		}
	}
}

/// In-process store for tests and for running without a writable disk.
#[derive(Default)]
pub struct MemoryAttachmentStore {
	files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryAttachmentStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, reference: &AttachmentRef) -> bool {
		self.files
			.lock()
			.map(|files| files.contains_key(reference.as_str()))
			.unwrap_or(false)
	}

	pub fn len(&self) -> usize {
		self.files.lock().map(|files| files.len()).unwrap_or(0)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[async_trait]
impl AttachmentStore for MemoryAttachmentStore {
	async fn store(&self, upload: &AttachmentUpload) -> Result<AttachmentRef, AttachmentError> {
		let name = format!(
			"{}.{}",
			uuid::Uuid::new_v4(),
			extension_for(&upload.content_type)
		);
		let mut files = self
			.files
			.lock()
			.map_err(|_| AttachmentError::Io(std::io::Error::other("attachment store poisoned")))?;
		files.insert(name.clone(), upload.data.clone());
		Ok(AttachmentRef::new(name))
	}

	async fn purge(&self, reference: &AttachmentRef) -> Result<(), AttachmentError> {
		let mut files = self
			.files
			.lock()
			.map_err(|_| AttachmentError::Io(std::io::Error::other("attachment store poisoned")))?;
		files.remove(reference.as_str());
		Ok(())
	}
}
