//! Client configuration: endpoints, throttling budget, and the default call timeout.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::ConfigError, rate_limit::RateBudget};

const ENV_BASE_URL: &str = "MS_GRAPH_BASE_URL";
const ENV_AUTHORITY: &str = "MS_GRAPH_AUTHORITY";
const ENV_REQUESTS_PER_SECOND: &str = "MS_GRAPH_REQUESTS_PER_SECOND";
const ENV_TIMEOUT_SECS: &str = "MS_GRAPH_TIMEOUT_SECS";

/// Settings consumed by [`GraphClient`](crate::GraphClient) at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	base_url: String,
	authority: String,
	rate: RateBudget,
	timeout: StdDuration,
}
impl ClientConfig {
	/// Resource API root.
	pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
	/// Login host that issues tokens; the tenant is appended per request.
	pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
	/// Bound applied to an operation when the caller supplies no deadline.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(5);

	/// Overrides the resource API root.
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();

		self
	}

	/// Overrides the token authority.
	pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
		self.authority = authority.into();

		self
	}

	/// Overrides the full throttling budget.
	pub fn with_rate(mut self, rate: RateBudget) -> Self {
		self.rate = rate;

		self
	}

	/// Sets the sustained rate; the burst becomes twice that rate.
	pub fn with_requests_per_second(self, requests_per_second: u32) -> Result<Self, ConfigError> {
		Ok(self.with_rate(RateBudget::per_second(requests_per_second)?))
	}

	/// Overrides the default per-operation timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Configured resource API root, unparsed.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Configured token authority, unparsed.
	pub fn authority(&self) -> &str {
		&self.authority
	}

	/// Configured throttling budget.
	pub fn rate(&self) -> RateBudget {
		self.rate
	}

	/// Configured default timeout.
	pub fn timeout(&self) -> StdDuration {
		self.timeout
	}

	/// Checks every field and returns the parsed `(base_url, authority)` pair.
	pub fn validate(&self) -> Result<(Url, Url), ConfigError> {
		let base = Url::parse(&self.base_url)
			.map_err(|_| ConfigError::InvalidBaseUrl { url: self.base_url.clone() })?;

		if base.cannot_be_a_base() || base.query().is_some() || base.fragment().is_some() {
			return Err(ConfigError::InvalidBaseUrl { url: self.base_url.clone() });
		}

		let authority = Url::parse(&self.authority)
			.map_err(|source| ConfigError::InvalidTokenEndpoint { source })?;

		if authority.cannot_be_a_base() {
			return Err(ConfigError::InvalidTokenEndpoint {
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			});
		}

		RateBudget::new(self.rate.requests_per_second, self.rate.burst)?;

		if self.timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}

		Ok((base, authority))
	}

	/// Defaults overlaid with the `MS_GRAPH_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Self::default();

		if let Some(base_url) = lookup(ENV_BASE_URL) {
			config = config.with_base_url(base_url);
		}
		if let Some(authority) = lookup(ENV_AUTHORITY) {
			config = config.with_authority(authority);
		}
		if let Some(raw) = lookup(ENV_REQUESTS_PER_SECOND) {
			let rate = parse_env::<u32>(ENV_REQUESTS_PER_SECOND, &raw)?;

			config = config.with_requests_per_second(rate)?;
		}
		if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
			let secs = parse_env::<u64>(ENV_TIMEOUT_SECS, &raw)?;

			config = config.with_timeout(StdDuration::from_secs(secs));
		}

		Ok(config)
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			base_url: Self::DEFAULT_BASE_URL.into(),
			authority: Self::DEFAULT_AUTHORITY.into(),
			rate: RateBudget::default(),
			timeout: Self::DEFAULT_TIMEOUT,
		}
	}
}

fn parse_env<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
	T: FromStr,
	T::Err: Display,
{
	raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnv { name, reason: e.to_string() })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
		move |name| pairs.iter().find(|(key, _)| *key == name).map(|(_, value)| (*value).to_owned())
	}

	#[test]
	fn defaults_validate() {
		let config = ClientConfig::default();
		let (base, authority) = config.validate().expect("Default configuration should be valid.");

		assert_eq!(base.as_str(), "https://graph.microsoft.com/v1.0");
		assert_eq!(authority.host_str(), Some("login.microsoftonline.com"));
		assert_eq!(config.rate(), RateBudget { requests_per_second: 10, burst: 20 });
		assert_eq!(config.timeout(), StdDuration::from_secs(5));
	}

	#[test]
	fn env_overrides_apply() {
		let config = ClientConfig::from_lookup(lookup_from(&[
			(ENV_BASE_URL, "http://127.0.0.1:8080/v1.0"),
			(ENV_REQUESTS_PER_SECOND, "50"),
			(ENV_TIMEOUT_SECS, " 12 "),
		]))
		.expect("Environment overrides should parse.");

		assert_eq!(config.base_url(), "http://127.0.0.1:8080/v1.0");
		assert_eq!(config.authority(), ClientConfig::DEFAULT_AUTHORITY);
		assert_eq!(config.rate(), RateBudget { requests_per_second: 50, burst: 100 });
		assert_eq!(config.timeout(), StdDuration::from_secs(12));
	}

	#[test]
	fn env_rejects_garbage() {
		let err = ClientConfig::from_lookup(lookup_from(&[(ENV_REQUESTS_PER_SECOND, "fast")]))
			.expect_err("Non-numeric rate should be rejected.");

		assert!(matches!(err, ConfigError::InvalidEnv { name: ENV_REQUESTS_PER_SECOND, .. }));

		let err = ClientConfig::from_lookup(lookup_from(&[(ENV_REQUESTS_PER_SECOND, "0")]))
			.expect_err("Zero rate should be rejected.");

		assert!(matches!(err, ConfigError::ZeroRate));
	}

	#[test]
	fn validate_rejects_unusable_urls() {
		let with_query = ClientConfig::default().with_base_url("https://graph.example/v1.0?x=1");
		let opaque = ClientConfig::default().with_base_url("mailto:someone@example.com");
		let bad_authority = ClientConfig::default().with_authority("not a url");

		assert!(matches!(with_query.validate(), Err(ConfigError::InvalidBaseUrl { .. })));
		assert!(matches!(opaque.validate(), Err(ConfigError::InvalidBaseUrl { .. })));
		assert!(matches!(bad_authority.validate(), Err(ConfigError::InvalidTokenEndpoint { .. })));
		assert!(matches!(
			ClientConfig::default().with_timeout(StdDuration::ZERO).validate(),
			Err(ConfigError::ZeroTimeout)
		));
	}
}
