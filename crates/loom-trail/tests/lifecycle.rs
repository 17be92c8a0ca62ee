// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end tracker lifecycle: hydrate, capture, session end, reload.

use std::sync::Arc;

use chrono::{Duration, Utc};
use loom_trail::{
	ErrorInfo, EventBus, FailureRecord, FileStore, KeyValueStore, MemorySink, MemoryStore, Metadata,
	PlatformEvent, Tracker, TrackerConfig,
};
use loom_trail_core::{decode_records, encode_records, keep_alive_cutoff};

fn config() -> TrackerConfig {
	TrackerConfig::new("shop", "2.0.0")
}

fn record(message: &str, age: Duration) -> FailureRecord {
	FailureRecord::new(ErrorInfo::new(message), &Metadata::new(), &[], Utc::now() - age)
}

#[test]
fn expired_records_are_dropped_on_load() {
	let key = config().persistence_key();
	let store = MemoryStore::with_entry(
		&key,
		encode_records(&[
			record("stale", Duration::hours(49)),
			record("fresh", Duration::hours(1)),
		])
		.unwrap(),
	);

	let tracker = Tracker::builder(config()).store(store).build().unwrap();

	let logs = tracker.logs();
	assert_eq!(logs.len(), 1);
	assert_eq!(logs[0].error.message, "fresh");
}

#[test]
fn record_exactly_at_window_edge_is_kept() {
	let now = Utc::now();
	let key = config().persistence_key();
	let edge = FailureRecord::new(ErrorInfo::new("edge"), &Metadata::new(), &[], keep_alive_cutoff(now));
	let store = MemoryStore::with_entry(&key, encode_records(&[edge]).unwrap());

	let tracker = Tracker::builder(config()).store(store).now(now).build().unwrap();

	assert_eq!(tracker.logs().len(), 1);
}

#[test]
fn unparsable_persisted_state_starts_empty() {
	let key = config().persistence_key();
	let store = MemoryStore::with_entry(&key, "<html>oops</html>");

	let tracker = Tracker::builder(config()).store(store).build().unwrap();

	assert!(tracker.logs().is_empty());
}

#[test]
fn trackers_with_different_versions_do_not_interact() {
	let store = MemoryStore::new();
	let v1 = Tracker::builder(TrackerConfig::new("shop", "1.0.0"))
		.store(store.clone())
		.build()
		.unwrap();
	let v2 = Tracker::builder(TrackerConfig::new("shop", "2.0.0"))
		.store(store.clone())
		.build()
		.unwrap();

	v1.send("from v1", &[]);
	v1.end_session();
	v2.end_session();

	let v1_logs = decode_records(&store.get("vitamins_shop_1.0.0").unwrap().unwrap()).unwrap().records;
	let v2_logs = decode_records(&store.get("vitamins_shop_2.0.0").unwrap().unwrap()).unwrap().records;
	assert_eq!(v1_logs.len(), 1);
	assert!(v2_logs.is_empty());
}

#[test]
fn window_error_scenario_through_event_bus() {
	let bus = Arc::new(EventBus::new());
	let sink = MemorySink::new();
	let tracker = Tracker::builder(config())
		.sink(sink.clone())
		.event_source(bus.clone())
		.build()
		.unwrap();

	tracker.crumb("y", "nav", None);
	tracker.crumb("x", "nav", None);

	bus.emit(&PlatformEvent::UncaughtError(ErrorInfo::new("TypeError: undefined")));

	let logs = tracker.logs();
	let crumbs: Vec<_> = logs[0].breadcrumbs.iter().map(|c| c.message.as_str()).collect();
	assert_eq!(crumbs, vec!["x", "y"]);
	assert_eq!(logs[0].tags, vec!["window".to_string()]);
	assert!(tracker.trail().is_empty());
	assert_eq!(
		sink.entries().last(),
		Some(&("error".to_string(), "TypeError: undefined".to_string()))
	);
}

#[test]
fn rejection_reason_is_coerced_to_message() {
	let bus = Arc::new(EventBus::new());
	let tracker = Tracker::builder(config())
		.event_source(bus.clone())
		.build()
		.unwrap();

	bus.emit(&PlatformEvent::UnhandledRejection(serde_json::json!({"status": 503})));

	let logs = tracker.logs();
	assert_eq!(logs[0].error.message, r#"{"status":503}"#);
	assert_eq!(logs[0].tags, vec!["promise".to_string()]);
}

#[test]
fn clear_before_session_end_persists_empty_log() {
	let bus = Arc::new(EventBus::new());
	let store = MemoryStore::new();
	let tracker = Tracker::builder(config())
		.store(store.clone())
		.event_source(bus.clone())
		.build()
		.unwrap();

	tracker.send("boom", &[]);
	tracker.clear();
	bus.emit(&PlatformEvent::SessionEnding);

	let key = tracker.persistence_key().to_string();
	assert_eq!(store.get(&key).unwrap().as_deref(), Some("[]"));
}

#[test]
fn file_store_survives_restart() {
	let temp_dir = tempfile::tempdir().unwrap();
	let bus = Arc::new(EventBus::new());

	let first = Tracker::builder(config())
		.store(FileStore::new(temp_dir.path()))
		.event_source(bus.clone())
		.build()
		.unwrap();
	first.crumb("opened checkout", "nav", None);
	first.send("payment declined", &["manual"]);
	bus.emit(&PlatformEvent::SessionEnding);

	let second = Tracker::builder(config())
		.store(FileStore::new(temp_dir.path()))
		.build()
		.unwrap();

	let logs = second.logs();
	assert_eq!(logs.len(), 1);
	assert_eq!(logs[0].error.message, "payment declined");
	assert_eq!(logs[0].breadcrumbs[0].message, "opened checkout");
	assert!(second.trail().is_empty());
}

#[test]
fn send_error_captures_rust_error() {
	let tracker = Tracker::builder(config()).build().unwrap();
	let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config missing");

	tracker.send_error(&err, &["io"]);

	let logs = tracker.logs();
	assert_eq!(logs[0].error.message, "config missing");
	assert!(logs[0].error.name.as_deref().unwrap().ends_with("Error"));
}
