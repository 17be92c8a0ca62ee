// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persistent key-value backends for the failure log.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use loom_trail_core::Result;
use parking_lot::RwLock;
use tracing::debug;

/// String key-value storage the failure log is persisted to.
///
/// Keys are persistence keys (`vitamins_<namespace>_<version>`); values are
/// JSON-encoded record sequences.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
	/// Returns the stored value, or `None` if the key was never written.
	fn get(&self, key: &str) -> Result<Option<String>>;

	/// Overwrites the value for a key.
	fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// a tracker persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store pre-seeded with one entry.
	pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
		let store = Self::new();
		store.entries.write().insert(key.into(), value.into());
		store
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>> {
		Ok(self.entries.read().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<()> {
		self.entries.write().insert(key.to_string(), value.to_string());
		Ok(())
	}
}

/// File-backed store, one `<encoded key>.json` file per key under a directory.
///
/// Writes go to a temporary file that is renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
	dir: PathBuf,
}

impl FileStore {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Path of the file holding `key`.
	///
	/// The key is percent-encoded, so distinct keys never share a file.
	pub fn path_for(&self, key: &str) -> PathBuf {
		self.dir.join(format!("{}.json", urlencoding::encode(key)))
	}
}

impl KeyValueStore for FileStore {
	fn get(&self, key: &str) -> Result<Option<String>> {
		let path = self.path_for(key);
		match fs::read_to_string(&path) {
			Ok(contents) => Ok(Some(contents)),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e.into()),
		}
	}

	fn set(&self, key: &str, value: &str) -> Result<()> {
		fs::create_dir_all(&self.dir)?;

		let path = self.path_for(key);
		let temp_path = path.with_extension("tmp");
		let mut file = fs::File::create(&temp_path)?;
		file.write_all(value.as_bytes())?;
		file.sync_all()?;
		drop(file);

		fs::rename(&temp_path, &path)?;

		debug!(path = ?path, bytes = value.len(), "Failure log written");
		Ok(())
	}
}
