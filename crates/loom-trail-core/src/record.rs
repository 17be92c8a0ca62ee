// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Failure records and their persisted form.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::breadcrumb::Breadcrumb;
use crate::error::Result;
use crate::meta::Metadata;

/// Persisted records older than this many hours are discarded on load.
pub const KEEP_ALIVE_HOURS: i64 = 48;

/// The error portion of a failure record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorInfo {
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stack: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}

impl ErrorInfo {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			stack: None,
			name: None,
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
		self.stack = Some(stack.into());
		self
	}

	/// Captures a Rust error.
	///
	/// The name is the concrete type name and the stack lists the `source()`
	/// chain, one cause per line.
	pub fn from_error<E>(error: &E) -> Self
	where
		E: std::error::Error + ?Sized,
	{
		let mut causes = Vec::new();
		let mut source = error.source();
		while let Some(cause) = source {
			causes.push(format!("caused by: {cause}"));
			source = cause.source();
		}

		Self {
			message: error.to_string(),
			stack: (!causes.is_empty()).then(|| causes.join("\n")),
			name: Some(std::any::type_name::<E>().to_string()),
		}
	}

	/// Coerces an arbitrary rejection reason into an error.
	///
	/// The message is the compact JSON encoding of the reason, so a string
	/// reason keeps its quotes.
	pub fn from_rejection(reason: &serde_json::Value) -> Self {
		Self::new(reason.to_string()).with_name("Error")
	}
}

impl From<&str> for ErrorInfo {
	fn from(message: &str) -> Self {
		Self::new(message)
	}
}

impl From<String> for ErrorInfo {
	fn from(message: String) -> Self {
		Self::new(message)
	}
}

/// A captured failure: error, environment snapshot, tags, and the trail
/// that led up to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FailureRecord {
	pub error: ErrorInfo,
	#[serde(default)]
	pub meta: Metadata,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub breadcrumbs: Vec<Breadcrumb>,
	pub timestamp: DateTime<Utc>,
}

impl FailureRecord {
	/// Builds a record stamped with `timestamp` and no breadcrumbs.
	///
	/// `meta` and `tags` are copied so later changes by the caller do not
	/// reach the record.
	pub fn new(error: ErrorInfo, meta: &Metadata, tags: &[String], timestamp: DateTime<Utc>) -> Self {
		Self {
			error,
			meta: meta.clone(),
			tags: tags.to_vec(),
			breadcrumbs: Vec::new(),
			timestamp,
		}
	}

	/// Returns true if the record is inside the keep-alive window at `now`.
	///
	/// A record exactly at the window edge is kept.
	pub fn is_alive_at(&self, now: DateTime<Utc>) -> bool {
		self.timestamp >= keep_alive_cutoff(now)
	}
}

/// Oldest timestamp still inside the keep-alive window.
pub fn keep_alive_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
	now - Duration::hours(KEEP_ALIVE_HOURS)
}

/// Encodes a record sequence in its persisted JSON form.
pub fn encode_records(records: &[FailureRecord]) -> Result<String> {
	Ok(serde_json::to_string(records)?)
}

/// Decodes a persisted JSON record sequence.
///
/// Fails only if `raw` is not a JSON array. Elements that do not decode as a
/// record are skipped and counted in [`DecodedRecords::skipped`].
pub fn decode_records(raw: &str) -> Result<DecodedRecords> {
	let elements: Vec<serde_json::Value> = serde_json::from_str(raw)?;
	let total = elements.len();
	let records: Vec<FailureRecord> = elements
		.into_iter()
		.filter_map(|element| serde_json::from_value(element).ok())
		.collect();

	Ok(DecodedRecords {
		skipped: total - records.len(),
		records,
	})
}

/// Result of [`decode_records`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedRecords {
	pub records: Vec<FailureRecord>,
	/// Elements dropped because they were not valid records.
	pub skipped: usize,
}
