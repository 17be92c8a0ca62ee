// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bounded-lifetime failure log backed by a [`KeyValueStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use loom_trail_core::{decode_records, encode_records, FailureRecord, Result};
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

/// Ordered, append-only sequence of failure records for one session.
///
/// Hydrated once from storage with expired records dropped, appended to
/// while the session runs, and written back in full when it ends.
#[derive(Debug, Clone, Default)]
pub struct LogStore {
	records: Vec<FailureRecord>,
}

impl LogStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads the persisted log for `tag`, keeping only records inside the
	/// keep-alive window at `now`.
	///
	/// Missing, unreadable or non-array data yields an empty log. Malformed
	/// elements of an array are dropped one by one.
	pub fn hydrate(store: &dyn KeyValueStore, tag: &str, now: DateTime<Utc>) -> Self {
		let raw = match store.get(tag) {
			Ok(Some(raw)) => raw,
			Ok(None) => {
				debug!(tag = %tag, "No persisted failure log");
				return Self::new();
			}
			Err(e) => {
				warn!(tag = %tag, error = %e, "Failed to read persisted failure log, starting empty");
				return Self::new();
			}
		};

		let loaded = match decode_records(&raw) {
			Ok(decoded) => {
				if decoded.skipped > 0 {
					warn!(tag = %tag, skipped = decoded.skipped, "Skipped malformed failure records");
				}
				decoded.records
			}
			Err(e) => {
				warn!(tag = %tag, error = %e, "Discarding unparsable failure log");
				return Self::new();
			}
		};

		let total = loaded.len();
		let records: Vec<FailureRecord> = loaded.into_iter().filter(|r| r.is_alive_at(now)).collect();

		debug!(
			tag = %tag,
			kept = records.len(),
			expired = total - records.len(),
			"Hydrated failure log"
		);

		Self { records }
	}

	/// Appends a record. No deduplication and no cap.
	pub fn append(&mut self, record: FailureRecord) {
		self.records.push(record);
	}

	/// The full log in its persisted JSON form.
	pub fn encode(&self) -> Result<String> {
		encode_records(&self.records)
	}

	/// Overwrites the persisted entry for `tag` with the full log.
	pub fn flush(&self, store: &dyn KeyValueStore, tag: &str) -> Result<()> {
		let payload = self.encode()?;
		store.set(tag, &payload)?;
		debug!(tag = %tag, count = self.records.len(), "Flushed failure log");
		Ok(())
	}

	/// Immutable copy of the current records.
	pub fn snapshot(&self) -> Arc<[FailureRecord]> {
		Arc::from(self.records.clone())
	}

	/// Empties the log without touching storage.
	pub fn reset(&mut self) {
		self.records.clear();
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}
