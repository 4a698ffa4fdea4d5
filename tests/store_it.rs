mod common;

// std
use std::fs;
// crates.io
use httpmock::prelude::*;
use serde_json::Value;
// self
use common::*;
use msgraph_planner::{
	Error, GraphClient, RequestContext,
	error::{AuthError, ConfigError},
	store::GraphHome,
};

fn cleanup(home: &GraphHome) {
	if let Err(e) = fs::remove_dir_all(home.dir()) {
		panic!("Failed to remove temporary directory {}: {e}", home.dir().display());
	}
}

#[tokio::test]
async fn missing_config_means_missing_credentials() {
	let server = MockServer::start_async().await;
	let home = GraphHome::new(temp_dir("store_missing"));
	let err = GraphClient::open_with_http_client(&home, None, config(&server), http_client())
		.expect_err("Opening without credentials should fail.");

	assert!(matches!(err, Error::Auth(AuthError::MissingCredentials)));
	assert!(!home.config_path().exists());
}

#[tokio::test]
async fn invalid_config_leaves_home_untouched() {
	let server = MockServer::start_async().await;
	let home = GraphHome::new(temp_dir("store_invalid"));
	let err = GraphClient::open_with_http_client(
		&home,
		Some(credentials()),
		config(&server).with_base_url("not a url"),
		http_client(),
	)
	.expect_err("Opening with an unusable base URL should fail.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidBaseUrl { .. })));
	assert!(!home.config_path().exists());
	assert!(!home.cache_path().exists());
}

#[tokio::test]
async fn override_is_persisted_and_tags_survive_a_restart() {
	let server = MockServer::start_async().await;
	let _token = mock_token(&server, 3600).await;
	let _plan = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1.0/planner/plans/plan1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"plan1\",\"@odata.etag\":\"W/\\\"persisted\\\"\"}");
		})
		.await;
	let update = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path("/v1.0/planner/plans/plan1")
				.header("if-match", "W/\"persisted\"");
			then.status(204);
		})
		.await;
	let home = GraphHome::new(temp_dir("store_restart"));
	let first = GraphClient::open_with_http_client(
		&home,
		Some(credentials()),
		config(&server),
		http_client(),
	)
		.expect("Opening with an override should succeed.");

	first
		.planner()
		.plans()
		.by_id("plan1")
		.expect("Id should be accepted.")
		.get(&RequestContext::new())
		.await
		.expect("Plan fetch should succeed.");
	first.close(&home).expect("Closing should persist the tag cache.");

	let config_json: Value = serde_json::from_str(
		&fs::read_to_string(home.config_path()).expect("config.json should exist."),
	)
	.expect("config.json should be JSON.");

	assert_eq!(config_json["tenant_id"], TENANT);
	assert_eq!(config_json["client_id"], CLIENT);
	assert_eq!(config_json["client_secret"], SECRET);

	let cache_json: Value = serde_json::from_str(
		&fs::read_to_string(home.cache_path()).expect("cache.json should exist."),
	)
	.expect("cache.json should be JSON.");

	assert_eq!(
		cache_json["eTags"][resource_url(&server, "/planner/plans/plan1")],
		"W/\"persisted\""
	);

	let second = GraphClient::open_with_http_client(&home, None, config(&server), http_client())
		.expect("Reopening from config.json should succeed.");

	assert_eq!(second.credentials(), &credentials());

	let outcome = second
		.planner()
		.plans()
		.by_id("plan1")
		.expect("Id should be accepted.")
		.patch(&Default::default(), &RequestContext::new())
		.await
		.expect("Patch with the persisted tag should succeed.");

	assert!(outcome.is_none());

	update.assert_async().await;
	cleanup(&home);
}
