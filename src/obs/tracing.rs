// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + target.
	pub fn new(kind: OperationKind, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("msgraph.request", op = kind.as_str(), path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, path);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event after a token was issued for `key`.
pub fn note_token_issued(key: &str, expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	tracing::debug!(key, %expires_at, "access token issued");
	#[cfg(not(feature = "tracing"))]
	let _ = (key, expires_at);
}

/// Emits a debug event after a concurrency tag was stored for `path`.
pub fn note_tag_stored(path: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(path, "concurrency tag stored");
	#[cfg(not(feature = "tracing"))]
	let _ = path;
}

/// Emits a debug event when the limiter makes a caller wait.
pub fn note_throttled(wait: std::time::Duration) {
	#[cfg(feature = "tracing")]
	tracing::debug!(wait_ms = wait.as_millis() as u64, "waiting for request budget");
	#[cfg(not(feature = "tracing"))]
	let _ = wait;
}

/// Emits a debug event when a PATCH answered 204 No Content.
pub fn note_no_content(path: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(path, "update returned no content");
	#[cfg(not(feature = "tracing"))]
	let _ = path;
}
