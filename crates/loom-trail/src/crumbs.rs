// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bounded breadcrumb ring buffer.

use std::collections::VecDeque;

use loom_trail_core::Breadcrumb;

/// Holds the most recent breadcrumbs, newest first.
///
/// When the buffer is full, the oldest entry is evicted before the new one
/// is inserted at the head.
#[derive(Debug, Clone)]
pub struct CrumbBuffer {
	entries: VecDeque<Breadcrumb>,
	capacity: usize,
}

impl CrumbBuffer {
	/// Creates an empty buffer. A capacity of zero is treated as one.
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self {
			entries: VecDeque::with_capacity(capacity),
			capacity,
		}
	}

	/// Inserts a breadcrumb at the head, evicting the tail if full.
	pub fn push(&mut self, crumb: Breadcrumb) {
		while self.entries.len() >= self.capacity {
			self.entries.pop_back();
		}
		self.entries.push_front(crumb);
	}

	/// Current contents, newest first.
	pub fn peek(&self) -> Vec<Breadcrumb> {
		self.entries.iter().cloned().collect()
	}

	/// Removes and returns the whole trail, newest first.
	pub fn take(&mut self) -> Vec<Breadcrumb> {
		Vec::from(std::mem::take(&mut self.entries))
	}

	pub fn reset(&mut self) {
		self.entries.clear();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}
}
