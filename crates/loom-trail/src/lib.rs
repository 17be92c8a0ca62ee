// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Breadcrumb trail and failure log SDK for Loom.
//!
//! A [`Tracker`] accumulates small contextual events (breadcrumbs) and, when
//! a failure is captured, stores a record combining the error, the trail
//! that led up to it, and an environment snapshot. Records survive restarts
//! through a [`KeyValueStore`] and expire after the keep-alive window.
//!
//! # Features
//!
//! - **Bounded trail**: newest-first ring buffer, oldest evicted on overflow
//! - **Exactly-once attachment**: a capture takes the whole trail and empties it
//! - **Keep-alive**: persisted records older than 48 hours are dropped on load
//! - **Platform wiring**: session end, uncaught errors and unhandled
//!   rejections via an [`EventSource`]; panics via [`EventBus::install_panic_hook`]
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use loom_trail::{EventBus, FileStore, PlatformEvent, Tracker, TrackerConfig};
//!
//! let bus = Arc::new(EventBus::new());
//! bus.install_panic_hook();
//!
//! let tracker = Tracker::builder(TrackerConfig::new("shop", "1.4.0"))
//!     .store(FileStore::new("/var/lib/shop/trail"))
//!     .event_source(bus.clone())
//!     .build()?;
//!
//! tracker.crumb("GET /api/cart", "http", None);
//! tracker.send("cart total mismatch", &["manual"]);
//!
//! // On shutdown
//! bus.emit(&PlatformEvent::SessionEnding);
//! # Ok::<(), loom_trail::TrailError>(())
//! ```

mod builder;
mod config;
mod crumbs;
mod events;
mod log_store;
mod metadata;
mod sink;
mod stack;
mod storage;
mod tracker;

pub use builder::RecordBuilder;
pub use config::TrackerConfig;
pub use crumbs::CrumbBuffer;
pub use events::{EventBus, EventHandler, EventSource, PlatformEvent, Subscription};
pub use log_store::LogStore;
pub use metadata::{MetadataProvider, ProcessEnvironment, StaticMetadata, SDK_NAME, SDK_VERSION};
pub use sink::{DiagnosticSink, MemorySink, NoopSink, TracingSink};
pub use stack::{capture_stack, render_stack};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use tracker::{Tracker, TrackerBuilder, PROMISE_TAG, WINDOW_TAG};

// Re-export core types for convenience
pub use loom_trail_core::{
	metadata, persistence_key, Breadcrumb, DecodedRecords, ErrorInfo, FailureRecord, MetaValue,
	Metadata, Result, TrailError, DEFAULT_CRUMB_CAPACITY, KEEP_ALIVE_HOURS,
};
