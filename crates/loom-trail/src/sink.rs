// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Diagnostic sinks that mirror breadcrumbs and captured errors.

use std::sync::Arc;

use parking_lot::Mutex;

/// Fire-and-forget destination for `(category, message)` pairs.
///
/// Implementations must not block. They may call back into the tracker.
pub trait DiagnosticSink: Send + Sync {
	fn log(&self, category: &str, message: &str);
}

/// Emits each entry as a `tracing` debug event under `loom_trail::sink`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn log(&self, category: &str, message: &str) {
		tracing::debug!(target: "loom_trail::sink", category = %category, "{message}");
	}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
	fn log(&self, _category: &str, _message: &str) {}
}

/// Keeps every entry in memory. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
	entries: Arc<Mutex<Vec<(String, String)>>>,
}

impl MemorySink {
	pub fn new() -> Self {
		Self::default()
	}

	/// Entries in the order they were logged.
	pub fn entries(&self) -> Vec<(String, String)> {
		self.entries.lock().clone()
	}
}

impl DiagnosticSink for MemorySink {
	fn log(&self, category: &str, message: &str) {
		self
			.entries
			.lock()
			.push((category.to_string(), message.to_string()));
	}
}
