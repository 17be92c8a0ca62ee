// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the breadcrumb trail.

use thiserror::Error;

/// Errors that can occur while recording or persisting failures.
#[derive(Debug, Error)]
pub enum TrailError {
	#[error("storage error: {0}")]
	Storage(String),

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Result type for trail operations.
pub type Result<T> = std::result::Result<T, TrailError>;
