mod common;

// std
use std::time::Duration;
// crates.io
use httpmock::prelude::*;
use serde_json::Value;
// self
use common::*;
use msgraph_planner::{
	CancellationToken, Error, RequestContext,
	error::{AuthError, RateLimitError, TransportError},
	models::{NewTask, Task},
};

#[tokio::test]
async fn get_decodes_group() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, 3600).await;
	let group = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1.0/groups/group1")
				.header("authorization", BEARER)
				.header("accept", "application/json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"group1\",\"displayName\":\"Group 1\"}");
		})
		.await;
	let client = client(&server);
	let decoded = client
		.groups()
		.by_id("group1")
		.expect("Id should be accepted.")
		.get(&RequestContext::new())
		.await
		.expect("Group fetch should succeed.");

	assert_eq!(decoded.id, "group1");
	assert_eq!(decoded.display_name.as_deref(), Some("Group 1"));

	group.assert_async().await;
}

#[tokio::test]
async fn get_rejects_non_200() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, 3600).await;
	let _missing = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/groups/ghost");
			then.status(404)
				.header("content-type", "application/json")
				.body("{\"error\":{\"code\":\"Request_ResourceNotFound\"}}");
		})
		.await;
	let client = client(&server);
	let err = client
		.groups()
		.by_id("ghost")
		.expect("Id should be accepted.")
		.get(&RequestContext::new())
		.await
		.expect_err("404 should fail.");

	match err {
		Error::Status { method, status, body, url } => {
			assert_eq!(method, "GET");
			assert_eq!(status, 404);
			assert!(body.contains("Request_ResourceNotFound"));
			assert_eq!(url, resource_url(&server, "/groups/ghost"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, 3600).await;
	let _group = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/groups/group1");
			then.status(200).header("content-type", "application/json").body("{\"id\":");
		})
		.await;
	let client = client(&server);
	let err = client
		.groups()
		.by_id("group1")
		.expect("Id should be accepted.")
		.get(&RequestContext::new())
		.await
		.expect_err("Truncated JSON should fail.");

	assert!(matches!(err, Error::Decode(ref decode) if decode.status == 200));
	assert!(!err.is_transport());
	assert_eq!(err.status(), None);
}

#[tokio::test]
async fn post_accepts_only_created() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, 3600).await;
	let created = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1.0/planner/tasks")
				.header("authorization", BEARER)
				.header("content-type", "application/json")
				.body("{\"planId\":\"plan1\",\"title\":\"Draft\"}");
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"id\":\"task1\",\"planId\":\"plan1\",\"title\":\"Draft\"}");
		})
		.await;
	let client = client(&server);
	let task = client
		.planner()
		.tasks()
		.create(&NewTask::new("plan1", "Draft"), &RequestContext::new())
		.await
		.expect("201 should decode.");

	assert_eq!(task.id, "task1");
	assert_eq!(task.title.as_deref(), Some("Draft"));

	created.assert_async().await;
}

#[tokio::test]
async fn post_failure_carries_status_and_body() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, 3600).await;
	let _rejected = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1.0/planner/tasks");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":{\"message\":\"planId is required\"}}");
		})
		.await;
	let client = client(&server);
	let err = client
		.planner()
		.tasks()
		.create(&NewTask::new("plan1", "Draft"), &RequestContext::new())
		.await
		.expect_err("400 should fail.");

	assert!(err.is_status(400));
	assert!(err.to_string().contains("planId is required"));
}

#[tokio::test]
async fn post_treats_plain_200_as_failure() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, 3600).await;
	let _ok = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1.0/planner/tasks");
			then.status(200).header("content-type", "application/json").body("{\"id\":\"task1\"}");
		})
		.await;
	let client = client(&server);
	let body = NewTask::new("plan1", "Draft");
	let err = client
		.post::<Task, _>(client.planner().tasks().path(), &body, &RequestContext::new())
		.await
		.expect_err("Only 201 counts as success.");

	assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn cancelled_context_performs_no_io() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server, 3600).await;
	let groups = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/groups");
			then.status(200).header("content-type", "application/json").body("{\"value\":[]}");
		})
		.await;
	let client = client(&server);
	let cancel = CancellationToken::new();

	cancel.cancel();

	let err = client
		.groups()
		.list(&RequestContext::new().with_cancellation(cancel))
		.await
		.expect_err("Cancelled call should fail.");

	assert!(matches!(err, Error::RateLimit(RateLimitError::Cancelled)));

	token.assert_calls_async(0).await;
	groups.assert_calls_async(0).await;
}

#[tokio::test]
async fn slow_response_times_out() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, 3600).await;
	let _slow = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/groups");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"value\":[]}")
				.delay(Duration::from_secs(2));
		})
		.await;
	let client = client(&server);

	// Warm the token cache so only the resource call races the deadline.
	client
		.authenticator()
		.token(client.credentials(), &RequestContext::new())
		.await
		.expect("Token should be issued.");

	let err = client
		.get::<Value>(
			client.groups().path(),
			&RequestContext::new().with_timeout(Duration::from_millis(200)),
		)
		.await
		.expect_err("Slow response should time out.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })));
	assert!(err.is_transport());
}

#[tokio::test]
async fn list_decodes_odata_envelope() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, 3600).await;
	let _groups = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/groups");
			then.status(200).header("content-type", "application/json").body(
				"{\"@odata.context\":\"https://graph.microsoft.com/v1.0/$metadata#groups\",\"value\":[{\"id\":\"g1\"},{\"id\":\"g2\"}]}",
			);
		})
		.await;
	let client = client(&server);
	let groups = client.groups().list(&RequestContext::new()).await.expect("List should decode.");
	let ids = groups.into_items().into_iter().map(|group| group.id).collect::<Vec<_>>();

	assert_eq!(ids, ["g1", "g2"]);
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server, 3600).await;
	let client = client_with(config(&server).with_base_url("http://127.0.0.1:1/v1.0"));
	let err = client
		.groups()
		.by_id("group1")
		.expect("Id should be accepted.")
		.get(&RequestContext::new())
		.await
		.expect_err("Closed port should fail.");

	assert!(
		matches!(
			&err,
			Error::Transport(TransportError::Network { url, .. })
				if url.contains("/v1.0/groups/group1")
		),
		"unexpected error: {err:?}"
	);
	assert!(err.is_transport());

	token.assert_async().await;
}

#[tokio::test]
async fn unreachable_authority_is_an_auth_network_error() {
	let server = MockServer::start_async().await;
	let group = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/groups/group1");
			then.status(200).body("{\"id\":\"group1\"}");
		})
		.await;
	let client = client_with(config(&server).with_authority("http://127.0.0.1:1"));
	let err = client
		.groups()
		.by_id("group1")
		.expect("Id should be accepted.")
		.get(&RequestContext::new())
		.await
		.expect_err("Closed token endpoint should fail.");

	assert!(
		matches!(&err, Error::Auth(AuthError::Transport(TransportError::Network { .. }))),
		"unexpected error: {err:?}"
	);
	assert!(err.is_transport());

	group.assert_calls_async(0).await;
}
