// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Assembles failure records from an error, tags and the metadata snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use loom_trail_core::{ErrorInfo, FailureRecord, Metadata};

/// Builds [`FailureRecord`]s against a metadata snapshot taken once.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
	meta: Arc<Metadata>,
}

impl RecordBuilder {
	pub fn new(meta: Metadata) -> Self {
		Self { meta: Arc::new(meta) }
	}

	/// The snapshot every record is stamped with.
	pub fn metadata(&self) -> &Metadata {
		&self.meta
	}

	/// Builds a record timestamped now, with no breadcrumbs attached.
	pub fn build(&self, error: ErrorInfo, tags: &[&str]) -> FailureRecord {
		self.build_at(error, tags, Utc::now())
	}

	pub fn build_at(&self, error: ErrorInfo, tags: &[&str], timestamp: DateTime<Utc>) -> FailureRecord {
		let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
		FailureRecord::new(error, &self.meta, &tags, timestamp)
	}
}
