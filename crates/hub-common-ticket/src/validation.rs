// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Field validation that applies regardless of who submits the payload.
//!
//! Every failure is a [`ValidationError`] naming the field, a stable
//! [`ValidationCode`] and a human-readable message. Errors are collected
//! rather than short-circuited so clients see every problem at once.

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::markup::strip_markup;
use crate::payload::{AttachmentUpload, TicketField, TicketPayload};

pub const TITLE_MIN_CHARS: usize = 10;
pub const TITLE_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MIN_CHARS: usize = 20;
pub const DEFAULT_ATTACHMENT_MAX_BYTES: usize = 3 * 1024 * 1024;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_LEADING_WHITESPACE: &str = "Field cannot begin with whitespace.";
pub const MSG_INVALID_TYPE: &str = "Invalid file type (only valid 'jpg' and 'png' files permitted).";
pub const MSG_CORRUPT: &str =
	"Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const MSG_TOO_LARGE: &str = "Maximum file size exceeded (3MB maximum).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
	Required,
	TooShort,
	TooLong,
	LeadingWhitespace,
	InvalidType,
	TooLarge,
	Corrupt,
	UnknownReference,
	InvalidAssignee,
	UsernameTaken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
	pub field: String,
	pub code: ValidationCode,
	pub message: String,
}

impl ValidationError {
	pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			code,
			message: message.into(),
		}
	}

	pub fn required(field: impl Into<String>) -> Self {
		Self::new(field, ValidationCode::Required, MSG_REQUIRED)
	}
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.field, self.message)
	}
}

/// A non-empty list of field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("validation failed: {}", summarize(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

fn summarize(errors: &[ValidationError]) -> String {
	errors
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join("; ")
}

impl ValidationErrors {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn single(error: ValidationError) -> Self {
		Self(vec![error])
	}

	pub fn push(&mut self, error: ValidationError) {
		self.0.push(error);
	}

	pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
		self.0.extend(errors);
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn errors(&self) -> &[ValidationError] {
		&self.0
	}

	pub fn has_code(&self, field: &str, code: ValidationCode) -> bool {
		self.0.iter().any(|e| e.field == field && e.code == code)
	}

	/// `Ok(())` when nothing was collected.
	pub fn into_result(self) -> Result<(), ValidationErrors> {
		if self.is_empty() {
			Ok(())
		} else {
			Err(self)
		}
	}
}

/// Whether a payload creates a ticket or edits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMode {
	Create,
	Update,
}

pub fn validate_title(title: &str) -> Vec<ValidationError> {
	let field = TicketField::Title.as_str();
	let len = title.chars().count();
	if title.trim().is_empty() {
		return vec![ValidationError::required(field)];
	}
	if len < TITLE_MIN_CHARS {
		return vec![ValidationError::new(
			field,
			ValidationCode::TooShort,
			format!("Ensure this value has at least {TITLE_MIN_CHARS} characters (it has {len})."),
		)];
	}
	if len > TITLE_MAX_CHARS {
		return vec![ValidationError::new(
			field,
			ValidationCode::TooLong,
			format!("Ensure this value has at most {TITLE_MAX_CHARS} characters (it has {len})."),
		)];
	}
	Vec::new()
}

/// Length and whitespace rules are checked against the stripped text.
pub fn validate_description(description: &str) -> Vec<ValidationError> {
	let field = TicketField::Description.as_str();
	let stripped = strip_markup(description);
	if stripped.trim().is_empty() {
		return vec![ValidationError::required(field)];
	}

	let mut errors = Vec::new();
	if stripped.starts_with(char::is_whitespace) {
		errors.push(ValidationError::new(
			field,
			ValidationCode::LeadingWhitespace,
			MSG_LEADING_WHITESPACE,
		));
	}
	let len = stripped.chars().count();
	if len < DESCRIPTION_MIN_CHARS {
		errors.push(ValidationError::new(
			field,
			ValidationCode::TooShort,
			format!(
				"Field must be at least {DESCRIPTION_MIN_CHARS} characters long, you have so far entered {len}."
			),
		));
	}
	errors
}

pub fn validate_comment_body(body: &str) -> Vec<ValidationError> {
	if strip_markup(body).trim().is_empty() {
		vec![ValidationError::required("body")]
	} else {
		Vec::new()
	}
}

fn declared_format(content_type: &str) -> Option<ImageFormat> {
	match content_type.trim().to_ascii_lowercase().as_str() {
		"image/jpeg" => Some(ImageFormat::Jpeg),
		"image/png" => Some(ImageFormat::Png),
		_ => None,
	}
}

/// File extension for a declared attachment type, normalised the same way
/// validation reads it.
pub fn attachment_extension(content_type: &str) -> Option<&'static str> {
	match declared_format(content_type)? {
		ImageFormat::Png => Some("png"),
		_ => Some("jpg"),
	}
}

/// Size first, then declared type, then the bytes themselves.
pub fn validate_attachment(upload: &AttachmentUpload, max_bytes: usize) -> Vec<ValidationError> {
	let field = TicketField::Attachment.as_str();
	if upload.data.len() > max_bytes {
		return vec![ValidationError::new(
			field,
			ValidationCode::TooLarge,
			MSG_TOO_LARGE,
		)];
	}

	let Some(declared) = declared_format(&upload.content_type) else {
		return vec![ValidationError::new(
			field,
			ValidationCode::InvalidType,
			MSG_INVALID_TYPE,
		)];
	};

	let corrupt = || vec![ValidationError::new(field, ValidationCode::Corrupt, MSG_CORRUPT)];
	match image::guess_format(&upload.data) {
		Ok(actual) if actual == declared => {}
		Ok(actual) => {
			tracing::debug!(
				filename = %upload.filename,
				declared = %upload.content_type,
				actual = ?actual,
				"attachment content does not match declared type"
			);
			return corrupt();
		}
		Err(_) => return corrupt(),
	}

	if let Err(e) = image::load_from_memory_with_format(&upload.data, declared) {
		tracing::debug!(filename = %upload.filename, error = %e, "attachment failed to decode");
		return corrupt();
	}
	Vec::new()
}

/// Validate every field the payload carries. On create, title and
/// description must be present.
pub fn validate_ticket_payload(
	payload: &TicketPayload,
	mode: PayloadMode,
	max_attachment_bytes: usize,
) -> Result<(), ValidationErrors> {
	let mut errors = ValidationErrors::new();

	match (&payload.title, mode) {
		(Some(title), _) => errors.extend(validate_title(title)),
		(None, PayloadMode::Create) => errors.push(ValidationError::required(TicketField::Title.as_str())),
		(None, PayloadMode::Update) => {}
	}

	match (&payload.description, mode) {
		(Some(description), _) => errors.extend(validate_description(description)),
		(None, PayloadMode::Create) => {
			errors.push(ValidationError::required(TicketField::Description.as_str()))
		}
		(None, PayloadMode::Update) => {}
	}

	if let Some(upload) = &payload.attachment {
		errors.extend(validate_attachment(upload, max_attachment_bytes));
	}

	errors.into_result()
}
