//! Client-credentials grant inputs.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ScopeSet, TenantId, TokenSecret},
	error::AuthError,
};

const ENV_TENANT_ID: &str = "TENANT_ID";
const ENV_CLIENT_ID: &str = "CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";
const ENV_SCOPES: &str = "SCOPES";

/// Tenant, application, and secret used for the client-credentials grant.
///
/// The serialized form matches the persisted `config.json` layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	/// Directory the application is registered in.
	pub tenant_id: TenantId,
	/// Registered application.
	pub client_id: ClientId,
	/// Application secret.
	pub client_secret: TokenSecret,
	/// Requested scopes; empty means the catch-all default.
	#[serde(default)]
	pub scopes: ScopeSet,
}
impl Credentials {
	/// Validates and bundles the three required values.
	pub fn new(
		tenant_id: impl AsRef<str>,
		client_id: impl AsRef<str>,
		client_secret: impl Into<String>,
	) -> Result<Self, AuthError> {
		let tenant_id = TenantId::new(tenant_id).map_err(invalid)?;
		let client_id = ClientId::new(client_id).map_err(invalid)?;
		let client_secret = TokenSecret::new(client_secret);

		if client_secret.is_empty() {
			return Err(AuthError::InvalidCredentials { reason: "client secret is empty".into() });
		}

		Ok(Self { tenant_id, client_id, client_secret, scopes: ScopeSet::default() })
	}

	/// Replaces the requested scopes.
	pub fn with_scopes(mut self, scopes: ScopeSet) -> Self {
		self.scopes = scopes;

		self
	}

	/// Token cache key: `tenant:client`.
	pub fn cache_key(&self) -> String {
		format!("{}:{}", self.tenant_id, self.client_id)
	}

	/// Rejects deserialized credentials that carry an empty secret.
	pub fn validate(&self) -> Result<(), AuthError> {
		if self.client_secret.is_empty() {
			return Err(AuthError::InvalidCredentials { reason: "client secret is empty".into() });
		}

		Ok(())
	}

	/// Reads `TENANT_ID`, `CLIENT_ID`, `CLIENT_SECRET`, and the optional space-separated
	/// `SCOPES` from the environment.
	pub fn from_env() -> Result<Self, AuthError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let required = |name: &str| {
			lookup(name).filter(|value| !value.is_empty()).ok_or(AuthError::MissingCredentials)
		};
		let credentials =
			Self::new(required(ENV_TENANT_ID)?, required(ENV_CLIENT_ID)?, required(ENV_CLIENT_SECRET)?)?;

		match lookup(ENV_SCOPES) {
			Some(raw) => Ok(credentials.with_scopes(ScopeSet::from_str(&raw).map_err(invalid)?)),
			None => Ok(credentials),
		}
	}
}

fn invalid(e: impl Display) -> AuthError {
	AuthError::InvalidCredentials { reason: e.to_string() }
}
