// self
use crate::_prelude::*;

/// User or application reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
	/// Object identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Display name, when the service resolves it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
}

/// Actor that performed an action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySet {
	/// Acting user.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user: Option<Identity>,
	/// Acting application.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub application: Option<Identity>,
}
