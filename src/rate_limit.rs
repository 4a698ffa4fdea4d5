//! Token-bucket throttling shared by every outbound request of one client.
//!
//! The bucket starts full, replenishes continuously at the sustained rate, and caps at the
//! burst ceiling. Waiters reserve their unit up front and sleep exactly until it matures, so
//! concurrent callers queue fairly without polling. A reservation that cannot mature before
//! the caller's deadline is refused on the spot and never consumed; one abandoned by
//! cancellation is handed back.

// std
use std::time::Duration as StdDuration;
// crates.io
use tokio::time::{self, Instant};
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	context::{CallScope, Interrupted, RequestContext},
	error::{ConfigError, RateLimitError},
	obs,
};

/// Sustained rate and burst ceiling of a [`RateLimiter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBudget {
	/// Units replenished per second.
	pub requests_per_second: u32,
	/// Maximum units that may accumulate.
	pub burst: u32,
}
impl RateBudget {
	/// Budget for `requests_per_second` with the default burst of twice that rate.
	pub fn per_second(requests_per_second: u32) -> Result<Self, ConfigError> {
		Self::new(requests_per_second, requests_per_second.saturating_mul(2))
	}

	/// Budget with an explicit burst ceiling.
	pub fn new(requests_per_second: u32, burst: u32) -> Result<Self, ConfigError> {
		if requests_per_second == 0 || burst == 0 {
			return Err(ConfigError::ZeroRate);
		}

		Ok(Self { requests_per_second, burst })
	}
}
impl Default for RateBudget {
	fn default() -> Self {
		Self { requests_per_second: 10, burst: 20 }
	}
}

#[derive(Debug)]
struct Bucket {
	budget: RateBudget,
	tokens: f64,
	refilled_at: Instant,
}
impl Bucket {
	fn full(budget: RateBudget, now: Instant) -> Self {
		Self { budget, tokens: f64::from(budget.burst), refilled_at: now }
	}

	fn refill(&mut self, now: Instant) {
		let elapsed = now.saturating_duration_since(self.refilled_at).as_secs_f64();

		self.tokens = (self.tokens + elapsed * self.rate()).min(f64::from(self.budget.burst));
		self.refilled_at = now;
	}

	fn rate(&self) -> f64 {
		f64::from(self.budget.requests_per_second)
	}

	/// Takes one unit and returns how long the caller must wait for it to mature.
	fn reserve(&mut self, now: Instant) -> StdDuration {
		self.refill(now);
		self.tokens -= 1.;

		if self.tokens >= 0. {
			StdDuration::ZERO
		} else {
			StdDuration::from_secs_f64(-self.tokens / self.rate())
		}
	}

	fn release(&mut self, now: Instant) {
		self.refill(now);
		self.tokens = (self.tokens + 1.).min(f64::from(self.budget.burst));
	}
}

/// Process-local token bucket guarding one client's outbound calls.
#[derive(Debug)]
pub struct RateLimiter {
	bucket: Mutex<Bucket>,
	default_timeout: StdDuration,
}
impl RateLimiter {
	/// Creates a limiter whose bucket starts full.
	pub fn new(budget: RateBudget) -> Self {
		Self {
			bucket: Mutex::new(Bucket::full(budget, Instant::now())),
			default_timeout: ClientConfig::DEFAULT_TIMEOUT,
		}
	}

	/// Bounds [`wait`](Self::wait) calls whose context sets no deadline.
	pub fn with_default_timeout(mut self, timeout: StdDuration) -> Self {
		self.default_timeout = timeout;

		self
	}

	/// Timeout applied when the caller's context sets none.
	pub fn default_timeout(&self) -> StdDuration {
		self.default_timeout
	}

	/// Current sustained rate and burst ceiling.
	pub fn budget(&self) -> RateBudget {
		self.bucket.lock().budget
	}

	/// Sets the sustained rate to `requests_per_second` and the burst ceiling to twice that.
	///
	/// Units already accumulated are kept up to the new ceiling.
	pub fn set_rate(&self, requests_per_second: u32) -> Result<RateBudget, ConfigError> {
		let budget = RateBudget::per_second(requests_per_second)?;
		let mut bucket = self.bucket.lock();

		bucket.refill(Instant::now());
		bucket.budget = budget;
		bucket.tokens = bucket.tokens.min(f64::from(budget.burst));

		Ok(budget)
	}

	/// Takes one unit if it is available right now.
	pub fn try_acquire(&self) -> bool {
		let mut bucket = self.bucket.lock();

		bucket.refill(Instant::now());

		if bucket.tokens >= 1. {
			bucket.tokens -= 1.;

			true
		} else {
			false
		}
	}

	/// Waits for one unit of budget, honoring the context's deadline and cancellation.
	///
	/// Without an explicit bound [`default_timeout`](Self::default_timeout) applies.
	pub async fn wait(&self, ctx: &RequestContext) -> Result<(), RateLimitError> {
		self.acquire(&ctx.scope(self.default_timeout)).await
	}

	pub(crate) async fn acquire(&self, scope: &CallScope) -> Result<(), RateLimitError> {
		scope.check().map_err(refusal)?;

		let now = Instant::now();
		let wait = {
			let mut bucket = self.bucket.lock();
			let wait = bucket.reserve(now);

			if now + wait > scope.deadline() {
				bucket.release(now);

				return Err(RateLimitError::DeadlineExceeded);
			}

			wait
		};

		if wait.is_zero() {
			return Ok(());
		}

		obs::note_throttled(wait);

		let ready_at = now + wait;

		match scope.cancellation() {
			Some(token) => tokio::select! {
				biased;
				_ = token.cancelled() => {
					self.bucket.lock().release(Instant::now());

					Err(RateLimitError::Cancelled)
				},
				_ = time::sleep_until(ready_at) => Ok(()),
			},
			None => {
				time::sleep_until(ready_at).await;

				Ok(())
			},
		}
	}
}
impl Default for RateLimiter {
	fn default() -> Self {
		Self::new(RateBudget::default())
	}
}

fn refusal(reason: Interrupted) -> RateLimitError {
	match reason {
		Interrupted::Cancelled => RateLimitError::Cancelled,
		Interrupted::DeadlineExceeded => RateLimitError::DeadlineExceeded,
	}
}
