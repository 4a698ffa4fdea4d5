//! Concurrency-tag cache backing `If-Match` preconditions.
//!
//! Entries are keyed by the fully-qualified resource URL and only ever overwritten; nothing
//! invalidates them when a resource changes out of band, so such a resource fails its next
//! precondition until a fresh tag is stored.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, error::TagError, obs};

/// JSON field carrying a resource's concurrency tag.
pub const TAG_FIELD: &str = "@odata.etag";

/// Read/write-locked map from resource URL to its last observed tag.
#[derive(Debug, Default)]
pub struct ConcurrencyTagCache {
	entries: RwLock<HashMap<String, String>>,
}
impl ConcurrencyTagCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a cache seeded with persisted entries.
	pub fn from_entries(entries: HashMap<String, String>) -> Self {
		Self { entries: RwLock::new(entries) }
	}

	/// Returns the cached tag for `path`.
	pub fn get(&self, path: &str) -> Option<String> {
		self.entries.read().get(path).cloned()
	}

	/// Stores `tag` for `path`, replacing any previous value.
	pub fn put(&self, path: impl Into<String>, tag: impl Into<String>) {
		let path = path.into();

		obs::note_tag_stored(&path);

		self.entries.write().insert(path, tag.into());
	}

	/// Drops the cached tag for `path`, returning it.
	pub fn remove(&self, path: &str) -> Option<String> {
		self.entries.write().remove(path)
	}

	/// Copies every entry, e.g. for persistence.
	pub fn snapshot(&self) -> HashMap<String, String> {
		self.entries.read().clone()
	}

	/// Number of cached entries.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Returns `true` when no tags are cached.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

/// Partial view of a resource that only decodes its tag field.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TagField {
	#[serde(rename = "@odata.etag")]
	tag: Option<Value>,
}
impl TagField {
	/// Extracts the tag, failing when it is absent or not a string.
	pub(crate) fn into_tag(self, path: &str) -> Result<String, TagError> {
		match self.tag {
			None | Some(Value::Null) => Err(TagError::Missing { path: path.to_owned() }),
			Some(Value::String(tag)) => Ok(tag),
			Some(other) =>
				Err(TagError::NotAString { path: path.to_owned(), found: json_kind(&other) }),
		}
	}

	/// Returns the tag when it is present as a string; anything else yields `None`.
	pub(crate) fn tag(&self) -> Option<&str> {
		self.tag.as_ref().and_then(Value::as_str)
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
