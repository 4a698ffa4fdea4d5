// self
use crate::{_prelude::*, models::IdentitySet};

/// Planner plan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
	/// Concurrency tag.
	#[serde(rename = "@odata.etag", default, skip_serializing_if = "Option::is_none")]
	pub etag: Option<String>,
	/// Plan identifier.
	#[serde(default)]
	pub id: String,
	/// Plan title.
	#[serde(default)]
	pub title: Option<String>,
	/// Owning group (legacy field).
	#[serde(default)]
	pub owner: Option<String>,
	/// Resource that contains the plan.
	#[serde(default)]
	pub container: Option<PlanContainer>,
	/// Creator.
	#[serde(default)]
	pub created_by: Option<IdentitySet>,
	/// Creation time.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_date_time: Option<OffsetDateTime>,
}

/// Container a plan belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanContainer {
	/// Container identifier.
	#[serde(default)]
	pub container_id: Option<String>,
	/// Container kind, e.g. `group`.
	#[serde(rename = "type", default)]
	pub kind: Option<String>,
	/// Full URL of the container.
	#[serde(default)]
	pub url: Option<String>,
}

/// Fields of a plan that may be updated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPatch {
	/// New title.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
}

/// Planner bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
	/// Concurrency tag.
	#[serde(rename = "@odata.etag", default, skip_serializing_if = "Option::is_none")]
	pub etag: Option<String>,
	/// Bucket identifier.
	#[serde(default)]
	pub id: String,
	/// Bucket name.
	#[serde(default)]
	pub name: Option<String>,
	/// Ordering hint.
	#[serde(default)]
	pub order_hint: Option<String>,
	/// Owning plan.
	#[serde(default)]
	pub plan_id: Option<String>,
}

/// Body for creating a bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBucket {
	/// Bucket name.
	pub name: String,
	/// Owning plan.
	pub plan_id: String,
	/// Ordering hint; the service picks one when absent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order_hint: Option<String>,
}
impl NewBucket {
	/// Bucket named `name` in `plan_id`.
	pub fn new(plan_id: impl Into<String>, name: impl Into<String>) -> Self {
		Self { name: name.into(), plan_id: plan_id.into(), order_hint: None }
	}
}

/// Fields of a bucket that may be updated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketPatch {
	/// New name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New ordering hint.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order_hint: Option<String>,
}

/// Assignment of a task to one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
	/// OData type marker the service requires on writes.
	#[serde(rename = "@odata.type", default, skip_serializing_if = "Option::is_none")]
	pub odata_type: Option<String>,
	/// Ordering hint.
	#[serde(default)]
	pub order_hint: Option<String>,
	/// Who made the assignment.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub assigned_by: Option<IdentitySet>,
	/// When the assignment was made.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub assigned_date_time: Option<OffsetDateTime>,
}
impl Default for Assignment {
	fn default() -> Self {
		Self {
			odata_type: Some("#microsoft.graph.plannerAssignment".into()),
			order_hint: Some(" !".into()),
			assigned_by: None,
			assigned_date_time: None,
		}
	}
}

/// Planner task.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
	/// Concurrency tag.
	#[serde(rename = "@odata.etag", default, skip_serializing_if = "Option::is_none")]
	pub etag: Option<String>,
	/// Task identifier.
	#[serde(default)]
	pub id: String,
	/// Owning plan.
	#[serde(default)]
	pub plan_id: Option<String>,
	/// Containing bucket.
	#[serde(default)]
	pub bucket_id: Option<String>,
	/// Task title.
	#[serde(default)]
	pub title: Option<String>,
	/// Ordering hint in list views.
	#[serde(default)]
	pub order_hint: Option<String>,
	/// Ordering hint in the assignee view.
	#[serde(default)]
	pub assignee_priority: Option<String>,
	/// Completion percentage, 0 to 100.
	#[serde(default)]
	pub percent_complete: Option<u8>,
	/// Priority, 0 (highest) to 10.
	#[serde(default)]
	pub priority: Option<u8>,
	/// Whether the details carry a description.
	#[serde(default)]
	pub has_description: Option<bool>,
	/// Preview shown on the card.
	#[serde(default)]
	pub preview_type: Option<String>,
	/// Number of external references.
	#[serde(default)]
	pub reference_count: Option<u32>,
	/// Number of checklist items.
	#[serde(default)]
	pub checklist_item_count: Option<u32>,
	/// Number of unchecked checklist items.
	#[serde(default)]
	pub active_checklist_item_count: Option<u32>,
	/// Linked group conversation.
	#[serde(default)]
	pub conversation_thread_id: Option<String>,
	/// Start time.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub start_date_time: Option<OffsetDateTime>,
	/// Due time.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub due_date_time: Option<OffsetDateTime>,
	/// Creation time.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_date_time: Option<OffsetDateTime>,
	/// Completion time.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub completed_date_time: Option<OffsetDateTime>,
	/// Creator.
	#[serde(default)]
	pub created_by: Option<IdentitySet>,
	/// Who completed the task.
	#[serde(default)]
	pub completed_by: Option<IdentitySet>,
	/// Category flags keyed `category1`..`category25`.
	#[serde(default)]
	pub applied_categories: HashMap<String, bool>,
	/// Assignments keyed by user id.
	#[serde(default)]
	pub assignments: HashMap<String, Assignment>,
}

/// Body for creating a task.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
	/// Owning plan.
	pub plan_id: String,
	/// Task title.
	pub title: String,
	/// Containing bucket.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bucket_id: Option<String>,
	/// Ordering hint.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order_hint: Option<String>,
	/// Priority, 0 (highest) to 10.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub priority: Option<u8>,
	/// Completion percentage.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub percent_complete: Option<u8>,
	/// Start time.
	#[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub start_date_time: Option<OffsetDateTime>,
	/// Due time.
	#[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub due_date_time: Option<OffsetDateTime>,
	/// Category flags.
	#[serde(skip_serializing_if = "HashMap::is_empty")]
	pub applied_categories: HashMap<String, bool>,
	/// Assignments keyed by user id.
	#[serde(skip_serializing_if = "HashMap::is_empty")]
	pub assignments: HashMap<String, Assignment>,
}
impl NewTask {
	/// Task titled `title` in `plan_id`.
	pub fn new(plan_id: impl Into<String>, title: impl Into<String>) -> Self {
		Self { plan_id: plan_id.into(), title: title.into(), ..Default::default() }
	}

	/// Places the task in `bucket_id`.
	pub fn in_bucket(mut self, bucket_id: impl Into<String>) -> Self {
		self.bucket_id = Some(bucket_id.into());

		self
	}
}

/// Fields of a task that may be updated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
	/// New title.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Move to another bucket.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bucket_id: Option<String>,
	/// New ordering hint.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order_hint: Option<String>,
	/// New assignee ordering hint.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub assignee_priority: Option<String>,
	/// New priority.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub priority: Option<u8>,
	/// New completion percentage.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub percent_complete: Option<u8>,
	/// Linked conversation.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub conversation_thread_id: Option<String>,
	/// New start time.
	#[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub start_date_time: Option<OffsetDateTime>,
	/// New due time.
	#[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub due_date_time: Option<OffsetDateTime>,
	/// Category flags to set or clear.
	#[serde(skip_serializing_if = "HashMap::is_empty")]
	pub applied_categories: HashMap<String, bool>,
	/// Assignments to add; a `null` value is not expressible here.
	#[serde(skip_serializing_if = "HashMap::is_empty")]
	pub assignments: HashMap<String, Assignment>,
}

/// Checklist entry of a task.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
	/// OData type marker the service requires on writes.
	#[serde(rename = "@odata.type", default, skip_serializing_if = "Option::is_none")]
	pub odata_type: Option<String>,
	/// Item text.
	#[serde(default)]
	pub title: Option<String>,
	/// Whether the item is done.
	#[serde(default)]
	pub is_checked: Option<bool>,
	/// Ordering hint.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_hint: Option<String>,
	/// Last editor.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_modified_by: Option<IdentitySet>,
	/// Last edit time.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub last_modified_date_time: Option<OffsetDateTime>,
}

/// External link attached to a task.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalReference {
	/// OData type marker the service requires on writes.
	#[serde(rename = "@odata.type", default, skip_serializing_if = "Option::is_none")]
	pub odata_type: Option<String>,
	/// Display alias.
	#[serde(default)]
	pub alias: Option<String>,
	/// Reference kind, e.g. `Word`.
	#[serde(rename = "type", default)]
	pub kind: Option<String>,
	/// Ordering hint in previews.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub preview_priority: Option<String>,
	/// Last editor.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_modified_by: Option<IdentitySet>,
	/// Last edit time.
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub last_modified_date_time: Option<OffsetDateTime>,
}

/// Extended task properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetails {
	/// Concurrency tag.
	#[serde(rename = "@odata.etag", default, skip_serializing_if = "Option::is_none")]
	pub etag: Option<String>,
	/// Same identifier as the owning task.
	#[serde(default)]
	pub id: String,
	/// Description text.
	#[serde(default)]
	pub description: Option<String>,
	/// Preview shown on the card.
	#[serde(default)]
	pub preview_type: Option<String>,
	/// Checklist keyed by item id.
	#[serde(default)]
	pub checklist: HashMap<String, ChecklistItem>,
	/// References keyed by encoded URL.
	#[serde(default)]
	pub references: HashMap<String, ExternalReference>,
}

/// Fields of task details that may be updated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetailsPatch {
	/// New description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// New preview type.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub preview_type: Option<String>,
	/// Checklist items to add or change.
	#[serde(skip_serializing_if = "HashMap::is_empty")]
	pub checklist: HashMap<String, ChecklistItem>,
	/// References to add or change.
	#[serde(skip_serializing_if = "HashMap::is_empty")]
	pub references: HashMap<String, ExternalReference>,
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn task_keeps_its_tag() {
		let task: Task = serde_json::from_value(json!({
			"@odata.etag": "W/\"JzEtVGFzayAg\"",
			"id": "task1",
			"planId": "plan1",
			"title": "Write report",
			"percentComplete": 50,
			"dueDateTime": "2025-02-01T17:00:00Z",
			"appliedCategories": { "category1": true },
			"assignments": {
				"user1": {
					"@odata.type": "#microsoft.graph.plannerAssignment",
					"orderHint": "8585"
				}
			}
		}))
		.expect("Task should decode.");

		assert_eq!(task.etag.as_deref(), Some("W/\"JzEtVGFzayAg\""));
		assert_eq!(task.percent_complete, Some(50));
		assert_eq!(task.due_date_time, Some(datetime!(2025-02-01 17:00 UTC)));
		assert_eq!(task.assignments["user1"].order_hint.as_deref(), Some("8585"));
	}

	#[test]
	fn patches_only_send_set_fields() {
		let patch = TaskPatch {
			title: Some("Renamed".into()),
			due_date_time: Some(datetime!(2025-03-01 09:00 UTC)),
			..Default::default()
		};

		assert_eq!(
			serde_json::to_value(&patch).expect("Patch should encode."),
			json!({ "title": "Renamed", "dueDateTime": "2025-03-01T09:00:00Z" })
		);
		assert_eq!(
			serde_json::to_value(PlanPatch::default()).expect("Empty patch should encode."),
			json!({})
		);
	}

	#[test]
	fn new_task_encodes_required_fields() {
		let body = NewTask::new("plan1", "Draft").in_bucket("bucket1");

		assert_eq!(
			serde_json::to_value(&body).expect("New task should encode."),
			json!({ "planId": "plan1", "title": "Draft", "bucketId": "bucket1" })
		);
		assert_eq!(
			serde_json::to_value(NewBucket::new("plan1", "Backlog"))
				.expect("New bucket should encode."),
			json!({ "name": "Backlog", "planId": "plan1" })
		);
	}

	#[test]
	fn default_assignment_carries_type_marker() {
		assert_eq!(
			serde_json::to_value(Assignment::default()).expect("Assignment should encode."),
			json!({ "@odata.type": "#microsoft.graph.plannerAssignment", "orderHint": " !" })
		);
	}
}
