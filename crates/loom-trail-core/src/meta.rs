// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scalar metadata attached to breadcrumbs and failure records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Mapping from attribute name to scalar value.
///
/// Ordered so that serialized records are stable across runs.
pub type Metadata = BTreeMap<String, MetaValue>;

/// A single scalar metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum MetaValue {
	Bool(bool),
	Integer(i64),
	Float(f64),
	Text(String),
}

impl fmt::Display for MetaValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(b) => write!(f, "{b}"),
			Self::Integer(i) => write!(f, "{i}"),
			Self::Float(x) => write!(f, "{x}"),
			Self::Text(s) => write!(f, "{s}"),
		}
	}
}

impl From<bool> for MetaValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for MetaValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<i32> for MetaValue {
	fn from(value: i32) -> Self {
		Self::Integer(value.into())
	}
}

impl From<u32> for MetaValue {
	fn from(value: u32) -> Self {
		Self::Integer(value.into())
	}
}

impl From<f64> for MetaValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<String> for MetaValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<&str> for MetaValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

/// Builds a [`Metadata`] map from key/value pairs.
///
/// ```
/// use loom_trail_core::{metadata, MetaValue};
///
/// let meta = metadata([("route", MetaValue::from("/cart")), ("items", 3.into())]);
/// assert_eq!(meta.len(), 2);
/// ```
pub fn metadata<K, I>(pairs: I) -> Metadata
where
	K: Into<String>,
	I: IntoIterator<Item = (K, MetaValue)>,
{
	pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_untagged_serialization_is_plain_json() {
		let meta = metadata([
			("flag", MetaValue::from(true)),
			("count", MetaValue::from(7)),
			("ratio", MetaValue::from(0.5)),
			("route", MetaValue::from("/home")),
		]);

		let json = serde_json::to_string(&meta).unwrap();
		assert_eq!(
			json,
			r#"{"count":7,"flag":true,"ratio":0.5,"route":"/home"}"#
		);
	}

	#[test]
	fn test_deserialize_prefers_integer_over_float() {
		let value: MetaValue = serde_json::from_str("42").unwrap();
		assert_eq!(value, MetaValue::Integer(42));

		let value: MetaValue = serde_json::from_str("4.25").unwrap();
		assert_eq!(value, MetaValue::Float(4.25));
	}

	#[test]
	fn test_display() {
		assert_eq!(MetaValue::from("x").to_string(), "x");
		assert_eq!(MetaValue::from(false).to_string(), "false");
		assert_eq!(MetaValue::from(3).to_string(), "3");
	}
}
