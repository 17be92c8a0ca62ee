// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loom breadcrumb trail.
//!
//! This crate provides the serializable data model shared by the trail
//! tracker (`loom-trail`) and anything that reads its persisted logs.
//!
//! # Overview
//!
//! - [`Breadcrumb`]: a small timestamped event recorded before a failure
//! - [`FailureRecord`]: an error plus tags, environment snapshot and the
//!   breadcrumbs that led up to it
//! - [`decode_records`] / [`encode_records`]: the persisted JSON contract
//! - [`persistence_key`]: the storage key for a namespace and version

pub mod breadcrumb;
pub mod error;
pub mod meta;
pub mod record;

pub use breadcrumb::Breadcrumb;
pub use error::{Result, TrailError};
pub use meta::{metadata, MetaValue, Metadata};
pub use record::{
	decode_records, encode_records, keep_alive_cutoff, DecodedRecords, ErrorInfo, FailureRecord,
	KEEP_ALIVE_HOURS,
};

/// Fixed prefix of every persistence key.
pub const PERSISTENCE_PREFIX: &str = "vitamins";

/// Breadcrumb capacity used when the configuration does not set one.
pub const DEFAULT_CRUMB_CAPACITY: usize = 20;

/// Derives the storage key for a tracker: `vitamins_<namespace>_<version>`.
pub fn persistence_key(namespace: &str, version: &str) -> String {
	format!("{PERSISTENCE_PREFIX}_{namespace}_{version}")
}
