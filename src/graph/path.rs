//! Immutable, fully-qualified resource locators.

// self
use crate::{_prelude::*, error::PathError};

/// Absolute URL of a resource or collection.
///
/// Every navigation step returns a new value; the parent is never modified, so intermediate
/// paths can be kept and reused freely.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath(String);
impl ResourcePath {
	/// Root path for `base`, which must be able to carry path segments.
	pub fn root(base: &Url) -> Result<Self, PathError> {
		if base.cannot_be_a_base() || base.query().is_some() || base.fragment().is_some() {
			return Err(PathError::CannotBeABase { url: base.to_string() });
		}

		Ok(Self(base.as_str().trim_end_matches('/').to_owned()))
	}

	/// Appends a fixed segment such as `planner` or `tasks`.
	pub(crate) fn child_static(&self, segment: &'static str) -> Self {
		Self(format!("{}/{segment}", self.0))
	}

	/// Appends a caller-supplied identifier segment.
	///
	/// Identifiers must be non-empty, must not be `.` or `..`, and may only contain
	/// unreserved characters plus `:@!$&'()*+,;=`. Nothing is percent-encoded.
	pub fn child(&self, id: &str) -> Result<Self, PathError> {
		if id.is_empty() {
			return Err(PathError::EmptySegment { parent: self.0.clone() });
		}
		if id == "." || id == ".." || !id.chars().all(is_segment_char) {
			return Err(PathError::InvalidSegment { segment: id.to_owned() });
		}

		Ok(Self(format!("{}/{id}", self.0)))
	}

	/// Full URL string; also the key of the concurrency-tag cache.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Parses the composed path into a [`Url`].
	pub fn to_url(&self) -> Result<Url, PathError> {
		Url::parse(&self.0).map_err(|source| PathError::InvalidUrl { path: self.0.clone(), source })
	}
}
impl AsRef<str> for ResourcePath {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Debug for ResourcePath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ResourcePath").field(&self.0).finish()
	}
}
impl Display for ResourcePath {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn is_segment_char(c: char) -> bool {
	c.is_ascii_alphanumeric()
		|| matches!(
			c,
			'-' | '.' | '_' | '~' | ':' | '@' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
		)
}
