// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Breadcrumb type (events leading up to a failure).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::meta::Metadata;

/// A breadcrumb representing a contextual event recorded before a failure.
///
/// Immutable once created; the trail stores them newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Breadcrumb {
	pub timestamp: DateTime<Utc>,
	pub message: String,
	/// "nav", "http", "ui", "console"
	pub category: String,
	/// Omitted entirely when no metadata was supplied.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<Metadata>,
}

impl Breadcrumb {
	/// Creates a breadcrumb stamped with the current time.
	pub fn new(message: impl Into<String>, category: impl Into<String>, meta: Option<Metadata>) -> Self {
		Self::at(Utc::now(), message, category, meta)
	}

	/// Creates a breadcrumb with an explicit timestamp.
	pub fn at(
		timestamp: DateTime<Utc>,
		message: impl Into<String>,
		category: impl Into<String>,
		meta: Option<Metadata>,
	) -> Self {
		Self {
			timestamp,
			message: message.into(),
			category: category.into(),
			meta,
		}
	}
}
