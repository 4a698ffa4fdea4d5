//! Per-call cancellation and deadline handling.
//!
//! Every network-issuing operation accepts a [`RequestContext`]. The context is resolved once
//! per operation into a [`CallScope`] whose deadline falls back to the client's configured
//! timeout, so the limiter wait, the token fetch, the tag refresh, and the primary call all
//! share one budget.

// std
use std::time::Duration as StdDuration;
// crates.io
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
// self
use crate::{_prelude::*, error::TransportError};

/// Caller-supplied deadline and cancellation signal.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
	timeout: Option<StdDuration>,
	deadline: Option<Instant>,
	cancel: Option<CancellationToken>,
}
impl RequestContext {
	/// Context that relies entirely on the client's default timeout.
	pub fn new() -> Self {
		Self::default()
	}

	/// Bounds the whole operation by `timeout`, measured from the moment it starts.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Bounds the whole operation by an absolute deadline.
	pub fn with_deadline(mut self, deadline: Instant) -> Self {
		self.deadline = Some(deadline);

		self
	}

	/// Aborts the operation once `token` is cancelled.
	pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
		self.cancel = Some(token);

		self
	}

	/// Returns the cancellation token, if any.
	pub fn cancellation(&self) -> Option<&CancellationToken> {
		self.cancel.as_ref()
	}

	/// Returns `true` when the attached token has been cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
	}

	/// Resolves the effective scope at `now`. The earliest of the explicit deadline and
	/// `now + timeout` wins; `default_timeout` applies when neither is set.
	pub(crate) fn scope_at(&self, now: Instant, default_timeout: StdDuration) -> CallScope {
		let from_timeout = self.timeout.map(|timeout| now + timeout);
		let deadline = match (self.deadline, from_timeout) {
			(Some(a), Some(b)) => a.min(b),
			(Some(a), None) | (None, Some(a)) => a,
			(None, None) => now + default_timeout,
		};

		CallScope { deadline, cancel: self.cancel.clone() }
	}

	pub(crate) fn scope(&self, default_timeout: StdDuration) -> CallScope {
		self.scope_at(Instant::now(), default_timeout)
	}
}

/// Reason a scoped future stopped early.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Interrupted {
	Cancelled,
	DeadlineExceeded,
}
impl Interrupted {
	/// Transport error for a call to `url` that stopped for this reason.
	pub(crate) fn at(self, url: impl Into<String>) -> TransportError {
		let url = url.into();

		match self {
			Interrupted::Cancelled => TransportError::Cancelled { url },
			Interrupted::DeadlineExceeded => TransportError::Timeout { url },
		}
	}
}

/// Resolved deadline plus optional cancellation for one operation.
#[derive(Clone, Debug)]
pub(crate) struct CallScope {
	deadline: Instant,
	cancel: Option<CancellationToken>,
}
impl CallScope {
	pub(crate) fn deadline(&self) -> Instant {
		self.deadline
	}

	pub(crate) fn cancellation(&self) -> Option<&CancellationToken> {
		self.cancel.as_ref()
	}

	/// Reports whether the scope is already spent, checking cancellation first.
	pub(crate) fn check(&self) -> Result<(), Interrupted> {
		if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
			return Err(Interrupted::Cancelled);
		}
		if Instant::now() >= self.deadline {
			return Err(Interrupted::DeadlineExceeded);
		}

		Ok(())
	}

	/// Drives `fut` until it completes, the deadline passes, or the caller cancels.
	pub(crate) async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
	where
		F: Future,
	{
		self.check()?;

		match &self.cancel {
			Some(token) => tokio::select! {
				biased;
				_ = token.cancelled() => Err(Interrupted::Cancelled),
				outcome = time::timeout_at(self.deadline, fut) =>
					outcome.map_err(|_| Interrupted::DeadlineExceeded),
			},
			None => time::timeout_at(self.deadline, fut)
				.await
				.map_err(|_| Interrupted::DeadlineExceeded),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const DEFAULT: StdDuration = StdDuration::from_secs(5);

	#[tokio::test(start_paused = true)]
	async fn default_timeout_applies_without_overrides() {
		let now = Instant::now();
		let scope = RequestContext::new().scope_at(now, DEFAULT);

		assert_eq!(scope.deadline(), now + DEFAULT);
		assert!(scope.cancellation().is_none());
	}

	#[tokio::test(start_paused = true)]
	async fn earliest_bound_wins() {
		let now = Instant::now();
		let ctx = RequestContext::new()
			.with_timeout(StdDuration::from_secs(1))
			.with_deadline(now + StdDuration::from_secs(3));

		assert_eq!(ctx.scope_at(now, DEFAULT).deadline(), now + StdDuration::from_secs(1));

		let ctx = RequestContext::new()
			.with_timeout(StdDuration::from_secs(10))
			.with_deadline(now + StdDuration::from_secs(3));

		assert_eq!(ctx.scope_at(now, DEFAULT).deadline(), now + StdDuration::from_secs(3));
	}

	#[tokio::test(start_paused = true)]
	async fn run_reports_deadline() {
		let scope = RequestContext::new().with_timeout(StdDuration::from_millis(50)).scope(DEFAULT);
		let outcome = scope.run(time::sleep(StdDuration::from_secs(1))).await;

		assert_eq!(outcome, Err(Interrupted::DeadlineExceeded));
	}

	#[tokio::test(start_paused = true)]
	async fn run_prefers_cancellation() {
		let token = CancellationToken::new();
		let ctx = RequestContext::new().with_cancellation(token.clone());

		token.cancel();

		assert!(ctx.is_cancelled());

		let scope = ctx.scope(DEFAULT);

		assert_eq!(scope.check(), Err(Interrupted::Cancelled));
		assert_eq!(scope.run(async { 1 }).await, Err(Interrupted::Cancelled));
	}

	#[tokio::test(start_paused = true)]
	async fn run_passes_through_completed_futures() {
		let scope = RequestContext::new().scope(DEFAULT);

		assert_eq!(scope.run(async { 7 }).await, Ok(7));
	}
}
