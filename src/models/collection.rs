// self
use crate::_prelude::*;

/// OData collection envelope returned by list endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection<T> {
	/// Total count, present only when the request asked for it.
	#[serde(rename = "@odata.count", default, skip_serializing_if = "Option::is_none")]
	pub count: Option<u64>,
	/// Items on this page.
	#[serde(default = "Vec::new")]
	pub value: Vec<T>,
}
impl<T> Collection<T> {
	/// Drops the envelope.
	pub fn into_items(self) -> Vec<T> {
		self.value
	}
}
impl<T> Default for Collection<T> {
	fn default() -> Self {
		Self { count: None, value: Vec::new() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn envelope_tolerates_missing_count() {
		let page: Collection<u8> =
			serde_json::from_str(r#"{"value":[1,2]}"#).expect("Envelope should decode.");

		assert_eq!(page.count, None);
		assert_eq!(page.into_items(), vec![1, 2]);

		let counted: Collection<u8> = serde_json::from_str(r#"{"@odata.count":0,"value":[]}"#)
			.expect("Counted envelope should decode.");

		assert_eq!(counted.count, Some(0));
	}
}
