// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The tracker: breadcrumbs, failure capture and persistence wired together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use loom_trail_core::{Breadcrumb, ErrorInfo, FailureRecord, Metadata, Result};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::builder::RecordBuilder;
use crate::config::TrackerConfig;
use crate::crumbs::CrumbBuffer;
use crate::events::{EventSource, PlatformEvent, Subscription};
use crate::log_store::LogStore;
use crate::metadata::{MetadataProvider, ProcessEnvironment};
use crate::sink::{DiagnosticSink, TracingSink};
use crate::storage::{KeyValueStore, MemoryStore};

/// Tag attached to records captured from uncaught errors.
pub const WINDOW_TAG: &str = "window";
/// Tag attached to records captured from unhandled rejections.
pub const PROMISE_TAG: &str = "promise";
/// Sink category used when a failure is captured.
const ERROR_CATEGORY: &str = "error";

/// Builder for constructing a [`Tracker`].
pub struct TrackerBuilder {
	config: TrackerConfig,
	store: Arc<dyn KeyValueStore>,
	metadata_provider: Box<dyn MetadataProvider>,
	sink: Arc<dyn DiagnosticSink>,
	event_source: Option<Arc<dyn EventSource>>,
	now: Option<DateTime<Utc>>,
}

impl TrackerBuilder {
	/// Creates a builder with an in-memory store, process metadata and a
	/// `tracing` sink.
	pub fn new(config: TrackerConfig) -> Self {
		Self {
			config,
			store: Arc::new(MemoryStore::new()),
			metadata_provider: Box::new(ProcessEnvironment),
			sink: Arc::new(TracingSink),
			event_source: None,
			now: None,
		}
	}

	/// Sets the persistent store the failure log is loaded from and flushed to.
	pub fn store(mut self, store: impl KeyValueStore + 'static) -> Self {
		self.store = Arc::new(store);
		self
	}

	/// Sets the provider of the environment snapshot.
	pub fn metadata_provider(mut self, provider: impl MetadataProvider + 'static) -> Self {
		self.metadata_provider = Box::new(provider);
		self
	}

	/// Sets the sink breadcrumbs and captured errors are mirrored to.
	pub fn sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
		self.sink = Arc::new(sink);
		self
	}

	/// Subscribes the tracker to platform notifications from `source`.
	pub fn event_source(mut self, source: Arc<dyn EventSource>) -> Self {
		self.event_source = Some(source);
		self
	}

	/// Overrides the instant expired records are measured against on load.
	pub fn now(mut self, now: DateTime<Utc>) -> Self {
		self.now = Some(now);
		self
	}

	/// Builds the tracker: loads the persisted log, snapshots metadata and
	/// registers the platform subscription.
	pub fn build(self) -> Result<Tracker> {
		self.config.validate()?;

		let tag = self.config.persistence_key();
		let now = self.now.unwrap_or_else(Utc::now);
		let logs = LogStore::hydrate(self.store.as_ref(), &tag, now);
		let builder = RecordBuilder::new(self.metadata_provider.snapshot(&self.config));
		let capacity = self.config.crumb_capacity();

		let inner = Arc::new(TrackerInner {
			tag: tag.clone(),
			builder,
			store: self.store,
			sink: self.sink,
			crumbs: Mutex::new(CrumbBuffer::new(capacity)),
			logs: Mutex::new(logs),
			flushed: AtomicBool::new(false),
			subscription: OnceLock::new(),
		});

		if let Some(source) = self.event_source {
			let handler_inner = Arc::clone(&inner);
			let subscription = source.subscribe(Arc::new(move |event: &PlatformEvent| {
				handler_inner.handle_event(event);
			}));
			let _ = inner.subscription.set(subscription);
		}

		info!(
			tag = %tag,
			capacity,
			restored = inner.logs.lock().len(),
			"Trail tracker initialized"
		);

		Ok(Tracker { inner })
	}
}

struct TrackerInner {
	tag: String,
	builder: RecordBuilder,
	store: Arc<dyn KeyValueStore>,
	sink: Arc<dyn DiagnosticSink>,
	crumbs: Mutex<CrumbBuffer>,
	logs: Mutex<LogStore>,
	flushed: AtomicBool,
	subscription: OnceLock<Subscription>,
}

impl TrackerInner {
	fn handle_event(&self, event: &PlatformEvent) {
		match event {
			PlatformEvent::SessionEnding => self.end_session(),
			PlatformEvent::UncaughtError(error) => self.send(error.clone(), &[WINDOW_TAG]),
			PlatformEvent::UnhandledRejection(reason) => {
				self.send(ErrorInfo::from_rejection(reason), &[PROMISE_TAG])
			}
		}
	}

	fn crumb(&self, message: String, category: String, meta: Option<Metadata>) {
		let crumb = Breadcrumb::new(message, category, meta);
		// The sink may call back into the tracker, so no lock is held here.
		self.sink.log(&crumb.category, &crumb.message);
		self.crumbs.lock().push(crumb);
	}

	fn send(&self, error: ErrorInfo, tags: &[&str]) {
		let mut record = self.builder.build(error, tags);

		// Taking the trail empties it under one lock, so the same crumbs are
		// never attached to two records.
		let trail = self.crumbs.lock().take();
		record.breadcrumbs = trail;

		self.sink.log(ERROR_CATEGORY, &record.error.message);

		let attached = record.breadcrumbs.len();
		self.logs.lock().append(record);
		debug!(tag = %self.tag, breadcrumbs = attached, "Failure captured");
	}

	fn clear(&self) {
		self.logs.lock().reset();
		self.crumbs.lock().reset();
	}

	fn end_session(&self) {
		if self.flushed.swap(true, Ordering::SeqCst) {
			debug!(tag = %self.tag, "Session already ended, skipping flush");
			return;
		}

		// The log lock is released before the store runs: a store that panics
		// re-enters `send` through the panic hook.
		let (payload, count) = {
			let logs = self.logs.lock();
			(logs.encode(), logs.len())
		};

		// Not retried: nothing reliably runs after the session ends.
		match payload.and_then(|payload| self.store.set(&self.tag, &payload)) {
			Ok(()) => debug!(tag = %self.tag, count, "Flushed failure log"),
			Err(e) => error!(tag = %self.tag, error = %e, "Failed to persist failure log"),
		}
	}
}

/// Records breadcrumbs and captures failures for one namespace and version.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use loom_trail::{EventBus, PlatformEvent, Tracker, TrackerConfig};
///
/// let bus = Arc::new(EventBus::new());
/// let tracker = Tracker::builder(TrackerConfig::new("shop", "1.0.0"))
///     .event_source(bus.clone())
///     .build()?;
///
/// tracker.crumb("opened cart", "nav", None);
/// tracker.send("checkout failed", &["manual"]);
///
/// assert!(tracker.trail().is_empty());
/// assert_eq!(tracker.logs()[0].breadcrumbs.len(), 1);
///
/// bus.emit(&PlatformEvent::SessionEnding);
/// # Ok::<(), loom_trail::TrailError>(())
/// ```
#[derive(Clone)]
pub struct Tracker {
	inner: Arc<TrackerInner>,
}

impl Tracker {
	/// Creates a new builder for constructing a Tracker.
	pub fn builder(config: TrackerConfig) -> TrackerBuilder {
		TrackerBuilder::new(config)
	}

	/// Records a breadcrumb. `meta` is attached only when given.
	pub fn crumb(
		&self,
		message: impl Into<String>,
		category: impl Into<String>,
		meta: Option<Metadata>,
	) {
		self.inner.crumb(message.into(), category.into(), meta);
	}

	/// Captures a failure.
	///
	/// The whole current trail is moved onto the record and the trail is
	/// left empty.
	pub fn send(&self, error: impl Into<ErrorInfo>, tags: &[&str]) {
		self.inner.send(error.into(), tags);
	}

	/// Captures a Rust error. See [`ErrorInfo::from_error`].
	pub fn send_error<E>(&self, error: &E, tags: &[&str])
	where
		E: std::error::Error + ?Sized,
	{
		self.inner.send(ErrorInfo::from_error(error), tags);
	}

	/// Empties both the failure log and the trail. Storage is untouched
	/// until the session ends.
	pub fn clear(&self) {
		self.inner.clear();
	}

	/// Current breadcrumbs, newest first.
	pub fn trail(&self) -> Vec<Breadcrumb> {
		self.inner.crumbs.lock().peek()
	}

	/// Immutable snapshot of the failure log.
	pub fn logs(&self) -> Arc<[FailureRecord]> {
		self.inner.logs.lock().snapshot()
	}

	/// Persists the failure log, as the session-ending notification does.
	///
	/// Only the first call per tracker writes to storage.
	pub fn end_session(&self) {
		self.inner.end_session();
	}

	/// Whether the failure log has been persisted.
	pub fn is_session_ended(&self) -> bool {
		self.inner.flushed.load(Ordering::SeqCst)
	}

	pub fn persistence_key(&self) -> &str {
		&self.inner.tag
	}

	/// Environment snapshot taken when the tracker was built.
	pub fn metadata(&self) -> &Metadata {
		self.inner.builder.metadata()
	}

	pub fn capacity(&self) -> usize {
		self.inner.crumbs.lock().capacity()
	}

	/// The platform subscription, if the tracker was built with an event source.
	pub fn subscription(&self) -> Option<&Subscription> {
		self.inner.subscription.get()
	}
}

impl std::fmt::Debug for Tracker {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Tracker")
			.field("tag", &self.inner.tag)
			.field("subscription", &self.inner.subscription.get())
			.finish_non_exhaustive()
	}
}
