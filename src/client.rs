//! Owned client handle and the authenticated GET/POST/PATCH transport.
//!
//! Every verb resolves its [`RequestContext`] once, then waits for rate-limit budget, obtains
//! a bearer token, and only then touches the network. PATCH additionally needs a
//! concurrency tag, taken from the cache or learned through one extra GET.

// std
use std::time::Duration as StdDuration;
// crates.io
use reqwest::{
	Method,
	header::{ACCEPT, CONTENT_TYPE, HeaderValue, IF_MATCH},
};
// self
use crate::{
	_prelude::*,
	auth::{Authenticator, Credentials},
	config::ClientConfig,
	context::{CallScope, RequestContext},
	error::{AuthError, ConfigError, DecodeError, TagError, TransportError},
	graph::{Groups, Planner, ResourcePath},
	obs::{self, OperationKind, OperationSpan, Outcome},
	rate_limit::{RateBudget, RateLimiter},
	store::GraphHome,
	tags::{ConcurrencyTagCache, TagField},
};

const JSON: &str = "application/json";
const PREFER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Microsoft Graph client owning its token cache, tag cache, and rate limiter.
///
/// All state is scoped to the instance; two clients never share caches. Resource builders
/// borrow the client, so wrap it in an [`Arc`] to use it from several tasks.
pub struct GraphClient {
	http: ReqwestClient,
	credentials: Credentials,
	authenticator: Authenticator,
	limiter: RateLimiter,
	tags: ConcurrencyTagCache,
	root: ResourcePath,
	timeout: StdDuration,
}
impl GraphClient {
	/// Builds a client with its own reqwest transport.
	///
	/// Redirects are disabled so bearer tokens never follow a `Location` header.
	pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
		Self::with_http_client(credentials, config, default_http_client()?)
	}

	/// Builds a client over a caller-provided reqwest client.
	pub fn with_http_client(
		credentials: Credentials,
		config: ClientConfig,
		http: ReqwestClient,
	) -> Result<Self> {
		credentials.validate()?;

		let (base, authority) = config.validate()?;
		let root = ResourcePath::root(&base)?;

		Ok(Self {
			authenticator: Authenticator::new(http.clone(), authority)
				.with_default_timeout(config.timeout()),
			limiter: RateLimiter::new(config.rate()).with_default_timeout(config.timeout()),
			tags: ConcurrencyTagCache::new(),
			root,
			timeout: config.timeout(),
			credentials,
			http,
		})
	}

	/// Replaces the tag cache with previously persisted entries.
	pub fn with_tags(self, entries: HashMap<String, String>) -> Self {
		Self { tags: ConcurrencyTagCache::from_entries(entries), ..self }
	}

	/// Opens a client backed by `home`.
	///
	/// An explicit `credentials` override is written to `config.json` and used; otherwise the
	/// persisted credentials are loaded. The tag cache is seeded from `cache.json`.
	pub fn open(
		home: &GraphHome,
		credentials: Option<Credentials>,
		config: ClientConfig,
	) -> Result<Self> {
		Self::open_with_http_client(home, credentials, config, default_http_client()?)
	}

	/// [`open`](Self::open) over a caller-provided reqwest client.
	///
	/// Nothing is written to `home` unless the credentials and the config are both valid.
	pub fn open_with_http_client(
		home: &GraphHome,
		credentials: Option<Credentials>,
		config: ClientConfig,
		http: ReqwestClient,
	) -> Result<Self> {
		let persist = credentials.is_some();
		let credentials = match credentials {
			Some(credentials) => credentials,
			None => home.load_credentials()?.ok_or(AuthError::MissingCredentials)?,
		};
		let client = Self::with_http_client(credentials, config, http)?;

		if persist {
			home.save_credentials(&client.credentials)?;
		}

		let tags = home.load_tags()?;

		Ok(client.with_tags(tags))
	}

	/// Writes the current tag cache to `cache.json` and drops the client.
	pub fn close(self, home: &GraphHome) -> Result<()> {
		home.save_tags(self.tags.snapshot())?;

		Ok(())
	}

	/// Credentials every request authenticates with.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Concurrency tags observed so far.
	pub fn tags(&self) -> &ConcurrencyTagCache {
		&self.tags
	}

	/// Token cache used before every request.
	pub fn authenticator(&self) -> &Authenticator {
		&self.authenticator
	}

	/// Limiter every request waits on.
	pub fn rate_limiter(&self) -> &RateLimiter {
		&self.limiter
	}

	/// Current sustained rate and burst.
	pub fn rate_budget(&self) -> RateBudget {
		self.limiter.budget()
	}

	/// Sets the sustained rate to `requests_per_second` and the burst to twice that.
	pub fn set_rate(&self, requests_per_second: u32) -> Result<RateBudget> {
		Ok(self.limiter.set_rate(requests_per_second)?)
	}

	/// Root path every resource is composed under.
	pub fn root(&self) -> &ResourcePath {
		&self.root
	}

	/// `/groups` navigation.
	pub fn groups(&self) -> Groups<'_> {
		Groups::new(self)
	}

	/// `/planner` navigation.
	pub fn planner(&self) -> Planner<'_> {
		Planner::new(self)
	}

	/// GETs `path` and decodes a 200 body into `T`.
	///
	/// When the body carries a string `@odata.etag`, it is stored for `path`.
	pub async fn get<T>(&self, path: &ResourcePath, ctx: &RequestContext) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let scope = ctx.scope(self.timeout);

		observed(OperationKind::Get, path, self.get_in(path, &scope)).await
	}

	/// POSTs `body` as JSON and decodes a 201 body into `T`. Every other status fails.
	pub async fn post<T, B>(&self, path: &ResourcePath, body: &B, ctx: &RequestContext) -> Result<T>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let body = encode(body)?;
		let scope = ctx.scope(self.timeout);

		observed(OperationKind::Post, path, self.post_in(path, body, &scope)).await
	}

	/// PATCHes `path` under an `If-Match` precondition.
	///
	/// The tag comes from the cache; without one, a GET learns it first and a failure there
	/// aborts the update. Returns `None` for 204 No Content and the decoded resource for
	/// 200/201.
	pub async fn patch<T, B>(
		&self,
		path: &ResourcePath,
		body: &B,
		ctx: &RequestContext,
	) -> Result<Option<T>>
	where
		T: DeserializeOwned,
		B: ?Sized + Serialize,
	{
		let body = encode(body)?;
		let scope = ctx.scope(self.timeout);

		observed(OperationKind::Patch, path, self.patch_in(path, body, &scope)).await
	}

	/// GETs `path` only to learn its concurrency tag, storing and returning it.
	pub async fn refresh_tag(&self, path: &ResourcePath, ctx: &RequestContext) -> Result<String> {
		self.refresh_tag_in(path, &ctx.scope(self.timeout)).await
	}

	async fn get_in<T>(&self, path: &ResourcePath, scope: &CallScope) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.fetch(path, scope).await?;

		self.remember_tag(path, &response);

		response.decode(path)
	}

	async fn post_in<T>(&self, path: &ResourcePath, body: Vec<u8>, scope: &CallScope) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.send(Method::POST, path, Some(body), None, scope).await?;

		if response.status != 201 {
			return Err(response.into_status_error("POST", path));
		}

		response.decode(path)
	}

	async fn patch_in<T>(
		&self,
		path: &ResourcePath,
		body: Vec<u8>,
		scope: &CallScope,
	) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		let tag = match self.tags.get(path.as_str()) {
			Some(tag) => tag,
			None => self.refresh_tag_in(path, scope).await?,
		};
		let if_match = HeaderValue::from_str(&tag)
			.map_err(|_| TagError::InvalidHeader { path: path.to_string() })?;
		let response = self.send(Method::PATCH, path, Some(body), Some(if_match), scope).await?;

		match response.status {
			204 => {
				obs::note_no_content(path.as_str());

				Ok(None)
			},
			200 | 201 => {
				self.remember_tag(path, &response);

				response.decode(path).map(Some)
			},
			_ => Err(response.into_status_error("PATCH", path)),
		}
	}

	async fn refresh_tag_in(&self, path: &ResourcePath, scope: &CallScope) -> Result<String> {
		observed(OperationKind::TagRefresh, path, self.read_tag(path, scope)).await
	}

	async fn read_tag(&self, path: &ResourcePath, scope: &CallScope) -> Result<String> {
		let field = match self.fetch(path, scope).await {
			Ok(response) => response.decode::<TagField>(path),
			Err(e) => Err(e),
		}
		.map_err(|source| TagError::Refresh { path: path.to_string(), source: Box::new(source) })?;
		let tag = field.into_tag(path.as_str())?;

		self.tags.put(path.as_str(), tag.clone());

		Ok(tag)
	}

	async fn fetch(&self, path: &ResourcePath, scope: &CallScope) -> Result<RawResponse> {
		let response = self.send(Method::GET, path, None, None, scope).await?;

		if response.status != 200 {
			return Err(response.into_status_error("GET", path));
		}

		Ok(response)
	}

	async fn send(
		&self,
		method: Method,
		path: &ResourcePath,
		body: Option<Vec<u8>>,
		if_match: Option<HeaderValue>,
		scope: &CallScope,
	) -> Result<RawResponse> {
		let url = path.to_url()?;

		self.limiter.acquire(scope).await?;

		let token = self.authenticator.token_in(&self.credentials, scope).await?;
		let mut request =
			self.http.request(method, url).bearer_auth(token.secret()).header(ACCEPT, JSON);

		if let Some(body) = body {
			request = request.header(CONTENT_TYPE, JSON).body(body);
		}
		if let Some(tag) = if_match {
			request = request.header(IF_MATCH, tag).header(PREFER, RETURN_REPRESENTATION);
		}

		let response = scope
			.run(request.send())
			.await
			.map_err(|reason| reason.at(path.as_str()))?
			.map_err(|e| transport_error(path, e))?;
		let status = response.status().as_u16();
		let body = scope
			.run(response.bytes())
			.await
			.map_err(|reason| reason.at(path.as_str()))?
			.map_err(|e| transport_error(path, e))?;

		Ok(RawResponse { status, body: body.to_vec() })
	}

	fn remember_tag(&self, path: &ResourcePath, response: &RawResponse) {
		let Ok(field) = serde_json::from_slice::<TagField>(&response.body) else {
			return;
		};

		if let Some(tag) = field.tag() {
			self.tags.put(path.as_str(), tag);
		}
	}
}
impl Debug for GraphClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("GraphClient")
			.field("root", &self.root)
			.field("credentials", &self.credentials)
			.field("rate", &self.limiter.budget())
			.field("tags", &self.tags.len())
			.field("timeout", &self.timeout)
			.finish()
	}
}

struct RawResponse {
	status: u16,
	body: Vec<u8>,
}
impl RawResponse {
	fn decode<T>(&self, path: &ResourcePath) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			DecodeError { url: path.to_string(), status: self.status, source }.into()
		})
	}

	fn into_status_error(self, method: &'static str, path: &ResourcePath) -> Error {
		Error::Status {
			method,
			url: path.to_string(),
			status: self.status,
			body: String::from_utf8_lossy(&self.body).into_owned(),
		}
	}
}

async fn observed<T, F>(kind: OperationKind, path: &ResourcePath, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(kind, path.as_str());

	obs::record_outcome(kind, Outcome::Attempt);

	let result = span.instrument(fut).await;

	obs::record_outcome(kind, Outcome::of(&result));

	result
}

fn default_http_client() -> Result<ReqwestClient> {
	let http = ReqwestClient::builder()
		.redirect(reqwest::redirect::Policy::none())
		.build()
		.map_err(ConfigError::from)?;

	Ok(http)
}

fn encode<B>(body: &B) -> Result<Vec<u8>>
where
	B: ?Sized + Serialize,
{
	serde_json::to_vec(body).map_err(Error::Encode)
}

fn transport_error(path: &ResourcePath, e: ReqwestError) -> TransportError {
	if e.is_timeout() {
		TransportError::Timeout { url: path.to_string() }
	} else {
		TransportError::network(path.as_str(), e)
	}
}
