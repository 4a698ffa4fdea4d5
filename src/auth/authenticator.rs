//! Token cache keyed by `tenant:client`, with per-key single-flight fetches.
//!
//! A cached token is returned unchanged while its expiry lies strictly in the future; expiry
//! is checked at the point of use. Concurrent callers for the same key queue behind one
//! fetch and re-check the cache once they get their turn.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials},
	config::ClientConfig,
	context::{CallScope, RequestContext},
	error::AuthError,
	obs::{self, OperationKind, OperationSpan, Outcome},
	oauth::TokenEndpoint,
};

/// Owns the token cache for one client.
pub struct Authenticator {
	http_client: ReqwestClient,
	authority: Url,
	default_timeout: StdDuration,
	tokens: Mutex<HashMap<String, AccessToken>>,
	guards: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}
impl Authenticator {
	/// Creates an authenticator that requests tokens from `authority`.
	pub fn new(http_client: ReqwestClient, authority: Url) -> Self {
		Self {
			http_client,
			authority,
			default_timeout: ClientConfig::DEFAULT_TIMEOUT,
			tokens: Default::default(),
			guards: Default::default(),
		}
	}

	/// Bounds [`token`](Self::token) calls whose context sets no deadline.
	pub fn with_default_timeout(mut self, timeout: StdDuration) -> Self {
		self.default_timeout = timeout;

		self
	}

	/// Timeout applied when the caller's context sets none.
	pub fn default_timeout(&self) -> StdDuration {
		self.default_timeout
	}

	/// Login host tokens are requested from.
	pub fn authority(&self) -> &Url {
		&self.authority
	}

	/// Returns a valid token for `credentials`, fetching one when the cache has none.
	///
	/// A context without a deadline is bounded by [`default_timeout`](Self::default_timeout).
	pub async fn token(
		&self,
		credentials: &Credentials,
		ctx: &RequestContext,
	) -> Result<AccessToken, AuthError> {
		self.token_in(credentials, &ctx.scope(self.default_timeout)).await
	}

	/// Cached token for `credentials` if it is still valid.
	pub fn cached(&self, credentials: &Credentials) -> Option<AccessToken> {
		self.lookup(&credentials.cache_key(), OffsetDateTime::now_utc())
	}

	/// Drops the cached token for `credentials`.
	pub fn invalidate(&self, credentials: &Credentials) {
		self.tokens.lock().remove(&credentials.cache_key());
	}

	pub(crate) async fn token_in(
		&self,
		credentials: &Credentials,
		scope: &CallScope,
	) -> Result<AccessToken, AuthError> {
		let key = credentials.cache_key();

		if let Some(token) = self.lookup(&key, OffsetDateTime::now_utc()) {
			return Ok(token);
		}

		let guard = self.guard(&key);
		let _singleflight = scope
			.run(guard.lock())
			.await
			.map_err(|reason| AuthError::Transport(reason.at(self.authority.as_str())))?;

		if let Some(token) = self.lookup(&key, OffsetDateTime::now_utc()) {
			return Ok(token);
		}

		let endpoint = TokenEndpoint::new(&self.authority, credentials, self.http_client.clone())
			.map_err(|e| AuthError::InvalidCredentials { reason: e.to_string() })?;
		let span = OperationSpan::new(OperationKind::Token, endpoint.url().as_str());

		obs::record_outcome(OperationKind::Token, Outcome::Attempt);

		let result = span.instrument(endpoint.exchange(&credentials.scopes, scope)).await;

		obs::record_outcome(OperationKind::Token, Outcome::of(&result));

		let token = result?;

		obs::note_token_issued(&key, token.expires_at());
		self.tokens.lock().insert(key, token.clone());

		Ok(token)
	}

	fn lookup(&self, key: &str, now: OffsetDateTime) -> Option<AccessToken> {
		self.tokens.lock().get(key).filter(|token| token.is_valid_at(now)).cloned()
	}

	fn guard(&self, key: &str) -> Arc<AsyncMutex<()>> {
		let mut guards = self.guards.lock();

		guards.entry(key.to_owned()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
impl Debug for Authenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator")
			.field("authority", &self.authority.as_str())
			.field("default_timeout", &self.default_timeout)
			.field("cached", &self.tokens.lock().len())
			.finish()
	}
}
