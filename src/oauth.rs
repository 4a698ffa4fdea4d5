//! Client-credentials exchange against the tenant token endpoint.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId as OAuthClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, RequestTokenError, Scope, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenType},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials, ScopeSet, TenantId},
	context::CallScope,
	error::{AuthError, ConfigError, TransportError},
	http::{InstrumentedHandle, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeTokenResponse = oauth2::basic::BasicTokenResponse;

/// Builds `<authority>/<tenant>/oauth2/v2.0/token`.
pub fn token_url(authority: &Url, tenant: &TenantId) -> Result<Url, ConfigError> {
	let raw = format!("{}/{tenant}/oauth2/v2.0/token", authority.as_str().trim_end_matches('/'));

	Url::parse(&raw).map_err(|source| ConfigError::InvalidTokenEndpoint { source })
}

/// `oauth2` client bound to one credential set and one token URL.
pub(crate) struct TokenEndpoint {
	oauth_client: ConfiguredBasicClient,
	http_client: ReqwestClient,
	url: Url,
}
impl TokenEndpoint {
	pub(crate) fn new(
		authority: &Url,
		credentials: &Credentials,
		http_client: ReqwestClient,
	) -> Result<Self, ConfigError> {
		let url = token_url(authority, &credentials.tenant_id)?;
		let token_uri = TokenUrl::from_url(url.clone());
		let oauth_client = BasicClient::new(OAuthClientId::new(credentials.client_id.to_string()))
			.set_client_secret(ClientSecret::new(credentials.client_secret.expose().to_owned()))
			.set_token_uri(token_uri)
			.set_auth_type(AuthType::RequestBody);

		Ok(Self { oauth_client, http_client, url })
	}

	pub(crate) fn url(&self) -> &Url {
		&self.url
	}

	/// Posts the grant and converts the response into an [`AccessToken`].
	pub(crate) async fn exchange(
		&self,
		scopes: &ScopeSet,
		scope: &CallScope,
	) -> Result<AccessToken, AuthError> {
		let meta = ResponseMetadataSlot::default();
		let handle = InstrumentedHandle::new(self.http_client.clone(), meta.clone());
		let mut request = self.oauth_client.exchange_client_credentials();

		for requested in scopes.requested() {
			request = request.add_scope(Scope::new(requested.to_owned()));
		}

		let response = scope
			.run(request.request_async(&handle))
			.await
			.map_err(|reason| AuthError::Transport(reason.at(self.url.as_str())))?
			.map_err(|err| map_request_error(&self.url, meta.take(), err))?;

		map_token_response(response)
	}
}

fn map_token_response(response: FacadeTokenResponse) -> Result<AccessToken, AuthError> {
	let secret = response.access_token().secret();

	if secret.is_empty() {
		return Err(AuthError::MissingAccessToken);
	}

	// A missing lifetime makes the token usable for this call only.
	let expires_in = response.expires_in().map_or(0, |lifetime| lifetime.as_secs());
	let expires_in = i64::try_from(expires_in).map_err(|_| AuthError::ExpiresInOutOfRange)?;
	let issued_at = OffsetDateTime::now_utc();
	let expires_in = Duration::seconds(expires_in);

	issued_at.checked_add(expires_in).ok_or(AuthError::ExpiresInOutOfRange)?;

	Ok(AccessToken::new(
		secret.to_owned(),
		token_type_label(response.token_type()),
		issued_at,
		expires_in,
	))
}

fn token_type_label(token_type: &BasicTokenType) -> String {
	let label = token_type.as_ref();

	if label.eq_ignore_ascii_case("bearer") { "Bearer".into() } else { label.to_owned() }
}

fn map_request_error(
	url: &Url,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> AuthError {
	let status = meta.as_ref().and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, status),
		RequestTokenError::Request(error) => map_transport_error(url, error),
		RequestTokenError::Parse(source, _body) => match meta {
			Some(ResponseMetadata { status: Some(code), body }) if code != 200 =>
				AuthError::TokenEndpoint {
					message: format!("Token endpoint returned {code}: {body}"),
					status: Some(code),
				},
			_ => AuthError::TokenResponseParse { source, status },
		},
		RequestTokenError::Other(message) => AuthError::TokenEndpoint {
			message: format!("Token endpoint returned an unexpected response: {message}"),
			status,
		},
	}
}

fn map_server_response_error(response: BasicErrorResponse, status: Option<u16>) -> AuthError {
	let message = if let Some(description) = response.error_description() {
		format!("Token endpoint returned an OAuth error: {description}")
	} else {
		format!("Token endpoint returned an OAuth error: {}", response.error().as_ref())
	};

	AuthError::TokenEndpoint { message, status }
}

fn map_transport_error(url: &Url, err: HttpClientError<ReqwestError>) -> AuthError {
	let url = url.to_string();
	let error = match err {
		HttpClientError::Reqwest(inner) if inner.is_timeout() => TransportError::Timeout { url },
		HttpClientError::Reqwest(inner) => TransportError::network(url, *inner),
		HttpClientError::Http(inner) => TransportError::network(url, inner),
		HttpClientError::Io(inner) => TransportError::network(url, inner),
		HttpClientError::Other(message) =>
			return AuthError::TokenEndpoint {
				message: format!("HTTP client error occurred while calling the token endpoint: {message}"),
				status: None,
			},
		_ =>
			return AuthError::TokenEndpoint {
				message: "HTTP client error occurred while calling the token endpoint.".into(),
				status: None,
			},
	};

	AuthError::Transport(error)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn authority() -> Url {
		Url::parse("https://login.example.com/").expect("Authority fixture should parse.")
	}

	#[test]
	fn token_url_embeds_tenant() {
		let tenant = TenantId::new("contoso").expect("Tenant fixture should be valid.");

		assert_eq!(
			token_url(&authority(), &tenant).expect("Token URL should build.").as_str(),
			"https://login.example.com/contoso/oauth2/v2.0/token"
		);
	}

	#[test]
	fn endpoint_builds_for_credentials() {
		let credentials =
			Credentials::new("contoso", "app", "secret").expect("Credentials should be valid.");
		let endpoint = TokenEndpoint::new(&authority(), &credentials, ReqwestClient::new())
			.expect("Endpoint should build.");

		assert_eq!(endpoint.url().path(), "/contoso/oauth2/v2.0/token");
	}

	#[test]
	fn rejected_requests_keep_status_and_body() {
		let url = authority();
		let source = serde_path_to_error::deserialize::<_, BasicErrorResponse>(
			&mut serde_json::Deserializer::from_str("not json"),
		)
		.expect_err("Fixture body should fail to parse.");
		let meta = ResponseMetadata { status: Some(401), body: "not json".into() };
		let err = map_request_error(
			&url,
			Some(meta),
			RequestTokenError::Parse(source, b"not json".to_vec()),
		);

		assert!(matches!(
			err,
			AuthError::TokenEndpoint { status: Some(401), ref message } if message.contains("not json")
		));
	}
}
