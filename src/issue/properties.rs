//! Extended properties from the trailing block of an issue file.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer, ser::SerializeMap};

/// Ordered `key -> value` map. Keeps first-insertion order; inserting an existing key replaces its
/// value in place.
#[derive(Clone, Default)]
pub struct Properties {
	entries: IndexMap<String, String>,
}

impl Properties {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert, returning the value previously stored under `key`.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.entries.insert(key.into(), value.into())
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries.get(key).map(String::as_str)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}
}

/// Order matters: two maps with the same entries in a different order are different documents.
impl PartialEq for Properties {
	fn eq(&self, other: &Self) -> bool {
		self.iter().eq(other.iter())
	}
}

impl Eq for Properties {}

impl fmt::Debug for Properties {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl Serialize for Properties {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.len()))?;
		for (k, v) in self.iter() {
			map.serialize_entry(k, v)?;
		}
		map.end()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut properties = Self::new();
		for (k, v) in iter {
			properties.insert(k, v);
		}
		properties
	}
}
