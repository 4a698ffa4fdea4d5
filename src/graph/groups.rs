//! `/groups` resources.

// self
use crate::{
	_prelude::*,
	client::GraphClient,
	context::RequestContext,
	error::PathError,
	graph::ResourcePath,
	models::{Collection, Group, Plan},
};

/// `/groups`.
#[derive(Clone, Debug)]
pub struct Groups<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
}
impl<'a> Groups<'a> {
	pub(crate) fn new(client: &'a GraphClient) -> Self {
		Self { client, path: client.root().child_static("groups") }
	}

	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Lists groups visible to the application.
	pub async fn list(&self, ctx: &RequestContext) -> Result<Collection<Group>> {
		self.client.get(&self.path, ctx).await
	}

	/// Selects one group.
	pub fn by_id(&self, id: &str) -> Result<GroupItem<'a>, PathError> {
		Ok(GroupItem { client: self.client, path: self.path.child(id)?, id: id.to_owned() })
	}
}

/// `/groups/{id}`.
#[derive(Clone, Debug)]
pub struct GroupItem<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
	id: String,
}
impl<'a> GroupItem<'a> {
	/// Group identifier.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Fetches the group.
	pub async fn get(&self, ctx: &RequestContext) -> Result<Group> {
		self.client.get(&self.path, ctx).await
	}

	/// `/groups/{id}/planner/plans`.
	pub fn plans(&self) -> GroupPlans<'a> {
		GroupPlans {
			client: self.client,
			path: self.path.child_static("planner").child_static("plans"),
		}
	}
}

/// `/groups/{id}/planner/plans`.
#[derive(Clone, Debug)]
pub struct GroupPlans<'a> {
	client: &'a GraphClient,
	path: ResourcePath,
}
impl GroupPlans<'_> {
	/// Composed path.
	pub fn path(&self) -> &ResourcePath {
		&self.path
	}

	/// Lists the plans owned by the group.
	pub async fn list(&self, ctx: &RequestContext) -> Result<Collection<Plan>> {
		self.client.get(&self.path, ctx).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{auth::Credentials, config::ClientConfig};

	fn client() -> GraphClient {
		GraphClient::new(
			Credentials::new("tenant", "client", "secret").expect("Credentials should be valid."),
			ClientConfig::default().with_base_url("https://graph.example/v1.0/"),
		)
		.expect("Client should build.")
	}

	#[test]
	fn group_paths_compose() {
		let client = client();
		let groups = client.groups();
		let group = groups.by_id("group1").expect("Id should be accepted.");

		assert_eq!(groups.path().as_str(), "https://graph.example/v1.0/groups");
		assert_eq!(group.id(), "group1");
		assert_eq!(
			group.plans().path().as_str(),
			"https://graph.example/v1.0/groups/group1/planner/plans"
		);
		assert!(matches!(groups.by_id(""), Err(PathError::EmptySegment { .. })));
	}
}
