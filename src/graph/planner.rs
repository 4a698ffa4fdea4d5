//! `/planner` resources: plans, buckets, tasks, and task details.

// self
use crate::{
	_prelude::*,
	client::GraphClient,
	context::RequestContext,
	error::PathError,
	graph::ResourcePath,
	models::{
		Bucket, BucketPatch, Collection, NewBucket, NewTask, Plan, PlanPatch, Task, TaskDetails,
		TaskDetailsPatch, TaskPatch,
	},
};

/// `/planner`.
#[derive(Clone, Debug)]
pub struct Planner<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
}
impl<'a> Planner<'a> {
	pub(crate) fn new(client: &'a GraphClient) -> Self {
		Self { client, path: client.root().child_static("planner") }
	}

	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// `/planner/plans`.
	pub fn plans(&self) -> Plans<'a> {
		Plans { client: self.client, path: self.path.child_static("plans") }
	}

	/// `/planner/tasks`.
	pub fn tasks(&self) -> Tasks<'a> {
		Tasks { client: self.client, path: self.path.child_static("tasks") }
	}

	/// `/planner/buckets`.
	pub fn buckets(&self) -> Buckets<'a> {
		Buckets { client: self.client, path: self.path.child_static("buckets") }
	}
}

/// `/planner/plans`.
#[derive(Clone, Debug)]
pub struct Plans<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
}
impl<'a> Plans<'a> {
	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Selects one plan.
	pub fn by_id(&self, id: &str) -> Result<PlanItem<'a>, PathError> {
		Ok(PlanItem { client: self.client, path: self.path.child(id)?, id: id.to_owned() })
	}
}

/// `/planner/plans/{id}`.
#[derive(Clone, Debug)]
pub struct PlanItem<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
	id: String,
}
impl<'a> PlanItem<'a> {
	/// Plan identifier.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Fetches the plan and caches its tag.
	pub async fn get(&self, ctx: &RequestContext) -> Result<Plan> {
		self.client.get(&self.path, ctx).await
	}

	/// Updates the plan; `None` when the service answered 204.
	pub async fn patch(&self, patch: &PlanPatch, ctx: &RequestContext) -> Result<Option<Plan>> {
		self.client.patch(&self.path, patch, ctx).await
	}

	/// `/planner/plans/{id}/buckets`.
	pub fn buckets(&self) -> PlanBuckets<'a> {
		PlanBuckets { client: self.client, path: self.path.child_static("buckets") }
	}

	/// `/planner/plans/{id}/tasks`.
	pub fn tasks(&self) -> PlanTasks<'a> {
		PlanTasks { client: self.client, path: self.path.child_static("tasks") }
	}
}

/// `/planner/plans/{id}/buckets`.
#[derive(Clone, Debug)]
pub struct PlanBuckets<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
}
impl PlanBuckets<'_> {
	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Lists the plan's buckets.
	pub async fn list(&self, ctx: &RequestContext) -> Result<Collection<Bucket>> {
		self.client.get(&self.path, ctx).await
	}
}

/// `/planner/plans/{id}/tasks`.
#[derive(Clone, Debug)]
pub struct PlanTasks<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
}
impl PlanTasks<'_> {
	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Lists the plan's tasks.
	pub async fn list(&self, ctx: &RequestContext) -> Result<Collection<Task>> {
		self.client.get(&self.path, ctx).await
	}
}

/// `/planner/tasks`.
#[derive(Clone, Debug)]
pub struct Tasks<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
}
impl<'a> Tasks<'a> {
	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Creates a task.
	pub async fn create(&self, task: &NewTask, ctx: &RequestContext) -> Result<Task> {
		self.client.post(&self.path, task, ctx).await
	}

	/// Selects one task.
	pub fn by_id(&self, id: &str) -> Result<TaskItem<'a>, PathError> {
		Ok(TaskItem { client: self.client, path: self.path.child(id)?, id: id.to_owned() })
	}
}

/// `/planner/tasks/{id}`.
#[derive(Clone, Debug)]
pub struct TaskItem<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
	id: String,
}
impl<'a> TaskItem<'a> {
	/// Task identifier.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Fetches the task and caches its tag.
	pub async fn get(&self, ctx: &RequestContext) -> Result<Task> {
		self.client.get(&self.path, ctx).await
	}

	/// Updates the task; `None` when the service answered 204.
	pub async fn patch(&self, patch: &TaskPatch, ctx: &RequestContext) -> Result<Option<Task>> {
		self.client.patch(&self.path, patch, ctx).await
	}

	/// `/planner/tasks/{id}/details`.
	pub fn details(&self) -> TaskDetailsItem<'a> {
		TaskDetailsItem {
			client: self.client,
			path: self.path.child_static("details"),
			id: self.id.clone(),
		}
	}
}

/// `/planner/tasks/{id}/details`.
#[derive(Clone, Debug)]
pub struct TaskDetailsItem<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
	id: String,
}
impl TaskDetailsItem<'_> {
	/// Identifier of the owning task.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Fetches the details and caches their tag.
	pub async fn get(&self, ctx: &RequestContext) -> Result<TaskDetails> {
		self.client.get(&self.path, ctx).await
	}

	/// Updates the details; `None` when the service answered 204.
	pub async fn patch(
		&self,
		patch: &TaskDetailsPatch,
		ctx: &RequestContext,
	) -> Result<Option<TaskDetails>> {
		self.client.patch(&self.path, patch, ctx).await
	}
}

/// `/planner/buckets`.
#[derive(Clone, Debug)]
pub struct Buckets<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
}
impl<'a> Buckets<'a> {
	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Creates a bucket.
	pub async fn create(&self, bucket: &NewBucket, ctx: &RequestContext) -> Result<Bucket> {
		self.client.post(&self.path, bucket, ctx).await
	}

	/// Selects one bucket.
	pub fn by_id(&self, id: &str) -> Result<BucketItem<'a>, PathError> {
		Ok(BucketItem { client: self.client, path: self.path.child(id)?, id: id.to_owned() })
	}
}

/// `/planner/buckets/{id}`.
#[derive(Clone, Debug)]
pub struct BucketItem<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
	id: String,
}
impl BucketItem<'_> {
	/// Bucket identifier.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Fetches the bucket and caches its tag.
	pub async fn get(&self, ctx: &RequestContext) -> Result<Bucket> {
		self.client.get(&self.path, ctx).await
	}

	/// Updates the bucket; `None` when the service answered 204.
	pub async fn patch(&self, patch: &BucketPatch, ctx: &RequestContext) -> Result<Option<Bucket>> {
		self.client.patch(&self.path, patch, ctx).await
	}
}
