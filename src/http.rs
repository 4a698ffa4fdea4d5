//! reqwest adapter that lets the `oauth2` crate drive token requests.
//!
//! The handle records the status and body of the last response in a
//! [`ResponseMetadataSlot`] so the facade can tell a rejected request (non-200) apart from
//! a malformed success body when `oauth2` reports a parse failure.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
// self
use crate::_prelude::*;

/// Status and body captured from the most recent token response.
#[derive(Clone, Debug, Default)]
pub(crate) struct ResponseMetadata {
	pub(crate) status: Option<u16>,
	pub(crate) body: String,
}

/// Thread-safe slot shared between the handle and the error mapper.
#[derive(Clone, Debug, Default)]
pub(crate) struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	pub(crate) fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	pub(crate) fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

struct InstrumentedHttpClient {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}

/// [`AsyncHttpClient`] over a shared [`ReqwestClient`].
#[derive(Clone)]
pub(crate) struct InstrumentedHandle(Arc<InstrumentedHttpClient>);
impl InstrumentedHandle {
	pub(crate) fn new(client: ReqwestClient, slot: ResponseMetadataSlot) -> Self {
		Self(Arc::new(InstrumentedHttpClient { client, slot }))
	}
}
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			client.slot.take();

			let response = client
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(Box::new)?.to_vec();

			client.slot.store(ResponseMetadata {
				status: Some(status.as_u16()),
				body: String::from_utf8_lossy(&body).into_owned(),
			});

			let mut response_new = HttpResponse::new(body);

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
