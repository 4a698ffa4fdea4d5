//! Shared fixtures for the integration suites.

#![allow(dead_code)]

// std
use std::{env, path::PathBuf, process};
// crates.io
use httpmock::{Mock, prelude::*};
use time::OffsetDateTime;
// self
use msgraph_planner::{
	GraphClient,
	auth::Credentials,
	config::ClientConfig,
	reqwest::{self, Client as ReqwestClient},
};

pub const TENANT: &str = "tenant-it";
pub const CLIENT: &str = "client-it";
pub const SECRET: &str = "secret-it";
pub const TOKEN_PATH: &str = "/tenant-it/oauth2/v2.0/token";
pub const ACCESS_TOKEN: &str = "graph-token";
pub const BEARER: &str = "Bearer graph-token";

pub fn credentials() -> Credentials {
	Credentials::new(TENANT, CLIENT, SECRET).expect("Fixture credentials should be valid.")
}

pub fn config(server: &MockServer) -> ClientConfig {
	ClientConfig::default().with_base_url(server.url("/v1.0")).with_authority(server.base_url())
}

/// Reqwest client that trusts the mock server's self-signed certificate.
pub fn http_client() -> ReqwestClient {
	ReqwestClient::builder()
		.redirect(reqwest::redirect::Policy::none())
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build reqwest client for tests.")
}

pub fn client(server: &MockServer) -> GraphClient {
	client_with(config(server))
}

pub fn client_with(config: ClientConfig) -> GraphClient {
	GraphClient::with_http_client(credentials(), config, http_client())
		.expect("Client should build against the mock.")
}

/// Absolute URL the client uses for `path`, which is also its tag cache key.
pub fn resource_url(server: &MockServer, path: &str) -> String {
	server.url(format!("/v1.0{path}"))
}

pub async fn mock_token(server: &MockServer, expires_in: u64) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"access_token\":\"{ACCESS_TOKEN}\",\"token_type\":\"Bearer\",\"expires_in\":{expires_in},\"ext_expires_in\":{expires_in}}}"
			));
		})
		.await
}

pub fn temp_dir(label: &str) -> PathBuf {
	let unique = format!(
		"msgraph_planner_{label}_{}_{}",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	);

	env::temp_dir().join(unique)
}
