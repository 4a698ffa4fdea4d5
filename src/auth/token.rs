//! Bearer tokens held by the authenticator.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Access token plus its absolute expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	secret: TokenSecret,
	token_type: String,
	expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Creates a token that expires `expires_in` after `issued_at`.
	pub fn new(
		secret: impl Into<String>,
		token_type: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Self {
		Self {
			secret: TokenSecret::new(secret),
			token_type: token_type.into(),
			expires_at: issued_at + expires_in,
		}
	}

	/// Bearer value to send in `Authorization` headers.
	pub fn secret(&self) -> &str {
		self.secret.expose()
	}

	/// Token type reported by the endpoint (normally `Bearer`).
	pub fn token_type(&self) -> &str {
		&self.token_type
	}

	/// Absolute expiry instant.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// A token is usable strictly before its expiry.
	pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
		self.expires_at > now
	}

	/// Shorthand for [`is_valid_at`](Self::is_valid_at) with the current time.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}
}
