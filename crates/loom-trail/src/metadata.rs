// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment metadata providers.

use loom_trail_core::{MetaValue, Metadata};

use crate::config::TrackerConfig;

/// SDK version for identification.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// SDK name for identification.
pub const SDK_NAME: &str = "loom-trail-rust";

/// Produces the environment snapshot attached to every failure record.
///
/// Called once when a tracker is built; the result is reused for the
/// tracker's lifetime.
pub trait MetadataProvider: Send + Sync {
	fn snapshot(&self, config: &TrackerConfig) -> Metadata;
}

/// Returns a fixed map regardless of configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata(pub Metadata);

impl MetadataProvider for StaticMetadata {
	fn snapshot(&self, _config: &TrackerConfig) -> Metadata {
		self.0.clone()
	}
}

/// Describes the running process: namespace, version, platform and SDK.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl MetadataProvider for ProcessEnvironment {
	fn snapshot(&self, config: &TrackerConfig) -> Metadata {
		let mut meta = Metadata::new();
		meta.insert("namespace".into(), MetaValue::from(config.namespace.as_str()));
		meta.insert("version".into(), MetaValue::from(config.version.as_str()));
		meta.insert("os".into(), MetaValue::from(std::env::consts::OS));
		meta.insert("arch".into(), MetaValue::from(std::env::consts::ARCH));
		meta.insert("family".into(), MetaValue::from(std::env::consts::FAMILY));
		meta.insert("sdk.name".into(), MetaValue::from(SDK_NAME));
		meta.insert("sdk.version".into(), MetaValue::from(SDK_VERSION));
		meta.insert("pid".into(), MetaValue::from(std::process::id()));

		if let Some(host) = std::env::var("HOSTNAME").ok().filter(|h| !h.is_empty()) {
			meta.insert("hostname".into(), MetaValue::from(host));
		}

		meta
	}
}
