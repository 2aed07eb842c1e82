//! High-level connector flows: authorization URL, access-token lifecycle, identity exchange.

pub mod authorization;
pub mod user_info;

mod access_token;
mod common;
mod recover;

pub use authorization::*;
pub use user_info::*;

// self
use crate::{
	_prelude::*,
	cache::TokenCache,
	http::Transport,
	provider::{WeComConfig, WeComEndpoints},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Connector specialized for the crate's default reqwest transport stack.
pub type ReqwestConnector = Connector<ReqwestHttpClient>;

/// Coordinates WeCom sign-in flows for a single corp configuration.
///
/// The connector owns the HTTP client, endpoint set, validated configuration, and an injected
/// [`TokenCache`] so individual flow implementations can focus on endpoint-specific logic. The
/// cache is shared state: handing one cache to several connectors (or test fixtures) makes them
/// coordinate token refreshes for the same corp id.
#[derive(Clone)]
pub struct Connector<C>
where
	C: ?Sized + Transport,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Endpoint set targeted by the flows.
	pub endpoints: WeComEndpoints,
	/// Validated corp configuration.
	pub config: WeComConfig,
	pub(crate) cache: TokenCache,
}
impl<C> Connector<C>
where
	C: ?Sized + Transport,
{
	/// Creates a connector that reuses the caller-provided transport.
	pub fn with_http_client(
		config: WeComConfig,
		cache: TokenCache,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			endpoints: WeComEndpoints::default(),
			config,
			cache,
		}
	}

	/// Replaces the endpoint set, e.g. to target a mock server in tests.
	pub fn with_endpoints(mut self, endpoints: WeComEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}
}
#[cfg(feature = "reqwest")]
impl Connector<ReqwestHttpClient> {
	/// Creates a new connector for the provided configuration and cache.
	///
	/// The connector provisions its own reqwest-backed transport so callers do not need to pass
	/// HTTP handles explicitly. Use [`Connector::with_http_client`] to supply a custom transport.
	pub fn new(config: WeComConfig, cache: TokenCache) -> Self {
		Self::with_http_client(config, cache, ReqwestHttpClient::default())
	}
}
impl<C> Debug for Connector<C>
where
	C: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Connector")
			.field("endpoints", &self.endpoints)
			.field("app_id", &self.config.app_id)
			.field("scope", &self.config.effective_scope())
			.finish()
	}
}
