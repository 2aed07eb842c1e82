//! WeCom (WeChat Work) web sign-in connector—cached corp access-token lifecycle, one-shot
//! stale-token recovery, and typed identity mapping in one crate built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod cache;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod provider;
pub mod secret;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		cache::TokenCache,
		flows::Connector,
		http::ReqwestHttpClient,
		provider::{WeComConfig, WeComEndpoints},
	};

	/// Connector type alias used by reqwest-backed integration tests.
	pub type ReqwestTestConnector = Connector<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Connector`] whose API endpoints all point at `api_base`, backed by a fresh
	/// [`TokenCache`] and the insecure reqwest transport used across integration tests.
	pub fn build_test_connector(
		api_base: &str,
		corp_id: &str,
		corp_secret: &str,
	) -> (ReqwestTestConnector, TokenCache) {
		let base = Url::parse(api_base).expect("Failed to parse test API base URL.");
		let endpoints =
			WeComEndpoints::with_api_base(&base).expect("Failed to rebase test endpoints.");
		let config = WeComConfig::new(corp_id, corp_secret);
		let cache = TokenCache::default();
		let connector =
			Connector::with_http_client(config, cache.clone(), test_reqwest_http_client())
				.with_endpoints(endpoints);

		(connector, cache)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _, wecom_connector as _};
