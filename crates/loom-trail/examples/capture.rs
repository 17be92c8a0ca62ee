// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: record a trail, capture failures, persist on session end.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example capture -p loom-trail

use std::sync::Arc;

use loom_trail::{metadata, EventBus, FileStore, MetaValue, PlatformEvent, Tracker, TrackerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let dir = std::env::var("LOOM_TRAIL_DIR")
		.map(std::path::PathBuf::from)
		.unwrap_or_else(|_| std::env::temp_dir().join("loom-trail"));

	println!("Initializing tracker...");
	println!("  Storage: {}", dir.display());

	let bus = Arc::new(EventBus::new());
	let tracker = Tracker::builder(TrackerConfig::new("example", "0.1.0").with_number_of_crumbs(5))
		.store(FileStore::new(&dir))
		.event_source(bus.clone())
		.build()?;

	println!("  Restored {} record(s) from previous runs", tracker.logs().len());

	tracker.crumb("Application started", "startup", None);
	tracker.crumb(
		"GET /api/data",
		"http",
		Some(metadata([("status", MetaValue::from(502))])),
	);

	bus.emit(&PlatformEvent::UncaughtError(loom_trail::ErrorInfo::new(
		"upstream returned 502",
	)));
	bus.emit(&PlatformEvent::UnhandledRejection(serde_json::json!("timeout")));

	for record in tracker.logs().iter() {
		println!(
			"\n[{}] {} (tags: {:?}, breadcrumbs: {})",
			record.timestamp,
			record.error.message,
			record.tags,
			record.breadcrumbs.len()
		);
	}

	bus.emit(&PlatformEvent::SessionEnding);
	println!("\nSession ended, log persisted to {}", dir.display());

	Ok(())
}
