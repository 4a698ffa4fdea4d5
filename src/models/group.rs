// self
use crate::_prelude::*;

/// Microsoft 365 or security group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
	/// Group identifier.
	#[serde(default)]
	pub id: String,
	/// Display name.
	#[serde(default)]
	pub display_name: Option<String>,
	/// Free-form description.
	#[serde(default)]
	pub description: Option<String>,
	/// Classification label.
	#[serde(default)]
	pub classification: Option<String>,
	/// SMTP address.
	#[serde(default)]
	pub mail: Option<String>,
	/// Whether the group is mail-enabled.
	#[serde(default)]
	pub mail_enabled: Option<bool>,
	/// Mail alias.
	#[serde(default)]
	pub mail_nickname: Option<String>,
	/// Whether the group is a security group.
	#[serde(default)]
	pub security_enabled: Option<bool>,
	/// Group kinds, e.g. `Unified`.
	#[serde(default)]
	pub group_types: Vec<String>,
	/// `Public`, `Private`, or `HiddenMembership`.
	#[serde(default)]
	pub visibility: Option<String>,
	/// Preferred language.
	#[serde(default)]
	pub preferred_language: Option<String>,
	/// Provisioned workloads, e.g. `Team`.
	#[serde(default)]
	pub resource_provisioning_options: Vec<String>,
	/// Creation time.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_date_time: Option<OffsetDateTime>,
	/// Last renewal time.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub renewed_date_time: Option<OffsetDateTime>,
	/// Expiration time, when an expiration policy applies.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub expiration_date_time: Option<OffsetDateTime>,
	/// Soft-deletion time.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub deleted_date_time: Option<OffsetDateTime>,
}
