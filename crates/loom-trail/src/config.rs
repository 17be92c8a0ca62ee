// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracker configuration.

use loom_trail_core::{persistence_key, Result, TrailError, DEFAULT_CRUMB_CAPACITY};
use serde::{Deserialize, Serialize};

/// Static configuration consumed once when a tracker is built.
///
/// Field names deserialize in camelCase (`numberOfCrumbs`) so configuration
/// shared with browser clients loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
	pub namespace: String,
	pub version: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub number_of_crumbs: Option<usize>,
}

impl TrackerConfig {
	pub fn new(namespace: impl Into<String>, version: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			version: version.into(),
			number_of_crumbs: None,
		}
	}

	/// Overrides the breadcrumb capacity.
	pub fn with_number_of_crumbs(mut self, count: usize) -> Self {
		self.number_of_crumbs = Some(count);
		self
	}

	/// Effective breadcrumb capacity. Zero falls back to the default.
	pub fn crumb_capacity(&self) -> usize {
		match self.number_of_crumbs {
			Some(0) | None => DEFAULT_CRUMB_CAPACITY,
			Some(n) => n,
		}
	}

	/// Storage key for this namespace and version.
	pub fn persistence_key(&self) -> String {
		persistence_key(&self.namespace, &self.version)
	}

	pub fn validate(&self) -> Result<()> {
		if self.namespace.trim().is_empty() {
			return Err(TrailError::InvalidConfig("namespace is required".to_string()));
		}
		if self.version.trim().is_empty() {
			return Err(TrailError::InvalidConfig("version is required".to_string()));
		}
		Ok(())
	}
}
