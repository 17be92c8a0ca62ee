// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Panics reported through the process-wide panic hook.
//!
//! The hook is global, so this binary holds a single test.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use loom_trail::{EventBus, Tracker, TrackerConfig};

static PREVIOUS_HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

#[test]
fn panic_is_recorded_as_window_failure_and_previous_hook_runs() {
	let original = panic::take_hook();
	panic::set_hook(Box::new(|_| {
		PREVIOUS_HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
	}));

	let bus = Arc::new(EventBus::new());
	let tracker = Tracker::builder(TrackerConfig::new("shop", "2.0.0"))
		.event_source(bus.clone())
		.build()
		.unwrap();
	bus.install_panic_hook();

	tracker.crumb("opened checkout", "nav", None);
	let result = panic::catch_unwind(|| panic!("checkout exploded"));

	let _ = panic::take_hook();
	panic::set_hook(original);

	assert!(result.is_err());
	assert_eq!(PREVIOUS_HOOK_CALLS.load(Ordering::SeqCst), 1);

	let logs = tracker.logs();
	assert_eq!(logs.len(), 1);
	assert_eq!(logs[0].error.name.as_deref(), Some("panic"));
	assert!(logs[0].error.message.starts_with("checkout exploded at "));
	assert!(logs[0].error.message.contains(file!()));
	assert_eq!(logs[0].tags, vec!["window".to_string()]);
	assert_eq!(logs[0].breadcrumbs[0].message, "opened checkout");
	assert!(tracker.trail().is_empty());
}
