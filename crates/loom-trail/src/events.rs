// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Platform notifications a tracker subscribes to.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use loom_trail_core::ErrorInfo;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::stack::capture_stack;

/// A notification from the host platform.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
	/// The page or process session is ending; persist now.
	SessionEnding,
	/// An error escaped every handler.
	UncaughtError(ErrorInfo),
	/// An asynchronous task failed with an arbitrary reason and nobody
	/// observed it.
	UnhandledRejection(serde_json::Value),
}

impl PlatformEvent {
	pub fn kind(&self) -> &'static str {
		match self {
			Self::SessionEnding => "session_ending",
			Self::UncaughtError(_) => "uncaught_error",
			Self::UnhandledRejection(_) => "unhandled_rejection",
		}
	}
}

/// Callback invoked for every event a source emits.
pub type EventHandler = Arc<dyn Fn(&PlatformEvent) + Send + Sync>;

/// Receipt for a registered handler.
///
/// Holding it grants nothing; registrations last as long as the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
	id: u64,
}

impl Subscription {
	pub fn id(&self) -> u64 {
		self.id
	}
}

/// Something a tracker can subscribe to for platform notifications.
pub trait EventSource: Send + Sync {
	fn subscribe(&self, handler: EventHandler) -> Subscription;
}

/// In-process notification hub.
///
/// Handlers run synchronously on the emitting thread, in registration
/// order. They may emit or subscribe re-entrantly.
#[derive(Default)]
pub struct EventBus {
	handlers: RwLock<Vec<(u64, EventHandler)>>,
	next_id: AtomicU64,
}

impl EventBus {
	pub fn new() -> Self {
		Self::default()
	}

	/// Delivers `event` to every handler registered so far.
	pub fn emit(&self, event: &PlatformEvent) {
		let handlers: Vec<EventHandler> = self
			.handlers
			.read()
			.iter()
			.map(|(_, h)| Arc::clone(h))
			.collect();

		debug!(kind = event.kind(), handlers = handlers.len(), "Dispatching platform event");

		for handler in handlers {
			handler(event);
		}
	}

	pub fn handler_count(&self) -> usize {
		self.handlers.read().len()
	}

	/// Installs a panic hook that reports panics as [`PlatformEvent::UncaughtError`].
	///
	/// The previously installed hook still runs afterwards.
	pub fn install_panic_hook(self: &Arc<Self>) {
		let bus = Arc::clone(self);
		let previous = std::panic::take_hook();

		std::panic::set_hook(Box::new(move |info| {
			let mut message = payload_message(info.payload());
			if let Some(location) = info.location() {
				message = format!("{message} at {}:{}", location.file(), location.line());
			}

			let mut error = ErrorInfo::new(message).with_name("panic");
			if let Some(stack) = capture_stack() {
				error = error.with_stack(stack);
			}

			bus.emit(&PlatformEvent::UncaughtError(error));
			previous(info);
		}));

		info!("Panic hook installed");
	}
}

impl EventSource for EventBus {
	fn subscribe(&self, handler: EventHandler) -> Subscription {
		let id = self.next_id.fetch_add(1, Ordering::SeqCst);
		self.handlers.write().push((id, handler));
		Subscription { id }
	}
}

impl fmt::Debug for EventBus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventBus")
			.field("handlers", &self.handler_count())
			.finish()
	}
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"Box<dyn Any>".to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::AtomicUsize;

	#[test]
	fn test_emit_reaches_all_handlers_in_order() {
		let bus = EventBus::new();
		let seen = Arc::new(RwLock::new(Vec::new()));

		for name in ["first", "second"] {
			let seen = Arc::clone(&seen);
			bus.subscribe(Arc::new(move |event: &PlatformEvent| {
				seen.write().push(format!("{name}:{}", event.kind()));
			}));
		}

		bus.emit(&PlatformEvent::SessionEnding);

		assert_eq!(
			*seen.read(),
			vec!["first:session_ending", "second:session_ending"]
		);
	}

	#[test]
	fn test_subscriptions_get_distinct_ids() {
		let bus = EventBus::new();
		let a = bus.subscribe(Arc::new(|_: &PlatformEvent| {}));
		let b = bus.subscribe(Arc::new(|_: &PlatformEvent| {}));

		assert_ne!(a.id(), b.id());
		assert_eq!(bus.handler_count(), 2);
	}

	#[test]
	fn test_handler_may_emit_reentrantly() {
		let bus = Arc::new(EventBus::new());
		let count = Arc::new(AtomicUsize::new(0));

		let inner_bus = Arc::clone(&bus);
		let inner_count = Arc::clone(&count);
		bus.subscribe(Arc::new(move |event: &PlatformEvent| {
			inner_count.fetch_add(1, Ordering::SeqCst);
			if let PlatformEvent::UncaughtError(_) = event {
				inner_bus.emit(&PlatformEvent::SessionEnding);
			}
		}));

		bus.emit(&PlatformEvent::UncaughtError(ErrorInfo::new("boom")));
		assert_eq!(count.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn test_payload_message() {
		let s: Box<dyn Any + Send> = Box::new("static str");
		assert_eq!(payload_message(s.as_ref()), "static str");

		let s: Box<dyn Any + Send> = Box::new(String::from("owned"));
		assert_eq!(payload_message(s.as_ref()), "owned");

		let s: Box<dyn Any + Send> = Box::new(42u8);
		assert_eq!(payload_message(s.as_ref()), "Box<dyn Any>");
	}
}
