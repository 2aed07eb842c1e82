//! Transport primitives for provider API calls.
//!
//! The module exposes [`Transport`] alongside [`RawResponse`] so downstream crates can integrate
//! custom HTTP clients without touching the flows. The contract is deliberately small: every
//! provider endpoint this connector talks to is a GET with query parameters, and every response
//! body is a JSON document decoded by the caller.

// std
use std::ops::Deref;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ProtocolError, TransportError},
};

/// Boxed future returned by [`Transport::get`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing provider API calls.
///
/// The trait acts as the connector's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so they can be shared behind `Arc<C>` across connector instances, and
/// the futures they return must be `Send` so flow futures stay executor-agnostic. Failures are
/// reported as [`TransportError`]; rendered transport messages may embed a provider error code,
/// which the recovery predicate scans for.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Issues a GET request against `url` with the provided query pairs appended.
	fn get<'a>(&'a self, url: &'a Url, query: &'a [(&'a str, &'a str)]) -> TransportFuture<'a>;
}

/// Raw provider response captured by a [`Transport`] implementation.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code returned by the provider.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Decodes the body as JSON into `T`, reporting the failing path on mismatch.
	pub fn json<T>(&self, endpoint: &'static str) -> Result<T, ProtocolError>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ProtocolError::ResponseParse { endpoint, source })
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Provider calls should not follow redirects; the endpoints answer directly instead of
/// delegating to another URI. Configure any custom [`ReqwestClient`] accordingly before handing
/// it to [`ReqwestHttpClient::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestHttpClient {
	fn get<'a>(&'a self, url: &'a Url, query: &'a [(&'a str, &'a str)]) -> TransportFuture<'a> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut target = url.clone();

			{
				let mut pairs = target.query_pairs_mut();

				for (key, value) in query {
					pairs.append_pair(key, value);
				}
			}

			let response = client
				.get(target)
				.send()
				.await
				.and_then(|response| response.error_for_status())
				.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(RawResponse { status, body })
		})
	}
}
