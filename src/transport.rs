//! Transport contract consumed by the executor, plus the default reqwest implementation.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ApiTransport`] dispatch methods.
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of dispatching the executor's outbound calls.
///
/// The trait is the executor's only dependency on an HTTP stack. Implementations report
/// network failures through [`TransportError`] and never panic into the core; a non-2xx
/// status is data carried by [`RawResponse`], not an error. Connection pooling, TLS, and
/// timeouts are entirely the implementation's concern.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Dispatches a GET to the provided URL with the given headers.
	fn get<'a>(
		&'a self,
		url: &'a Url,
		headers: &'a [(String, String)],
	) -> TransportFuture<'a, RawResponse>;

	/// Dispatches a POST carrying `body` to the provided URL with the given headers.
	fn post<'a>(
		&'a self,
		url: &'a Url,
		headers: &'a [(String, String)],
		body: &'a str,
	) -> TransportFuture<'a, RawResponse>;
}

/// Raw result of one transport exchange.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The wrapped client is dispatched as-is; configure pooling, TLS, and timeouts on the
/// [`ReqwestClient`] before handing it over.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn finish(response: reqwest::Response) -> Result<RawResponse, TransportError> {
		let status = response.status().as_u16();
		let body = response.text().await.map_err(TransportError::from)?;

		Ok(RawResponse { status, body })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn get<'a>(
		&'a self,
		url: &'a Url,
		headers: &'a [(String, String)],
	) -> TransportFuture<'a, RawResponse> {
		Box::pin(async move {
			let mut builder = self.0.get(url.clone());

			for (name, value) in headers {
				builder = builder.header(name, value);
			}

			Self::finish(builder.send().await.map_err(TransportError::from)?).await
		})
	}

	fn post<'a>(
		&'a self,
		url: &'a Url,
		headers: &'a [(String, String)],
		body: &'a str,
	) -> TransportFuture<'a, RawResponse> {
		Box::pin(async move {
			let mut builder = self.0.post(url.clone());

			for (name, value) in headers {
				builder = builder.header(name, value);
			}

			Self::finish(builder.body(body.to_owned()).send().await.map_err(TransportError::from)?)
				.await
		})
	}
}
