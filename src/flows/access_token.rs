//! Corp access-token lifecycle: cached reads, guarded refreshes, explicit invalidation.
//!
//! The connector exposes [`Connector::access_token`] so every provider call can obtain a usable
//! bearer token without tracking expiry itself. Each request acquires the corp id's singleflight
//! guard, serves unexpired cache entries without touching the network, and otherwise performs
//! one `gettoken` exchange whose result overwrites the cache—last write wins. Invalidation is a
//! plain evict; the next request always refreshes.

// self
use crate::{
	_prelude::*,
	cache::{CachedToken, ISSUANCE_LATENCY_ALLOWANCE},
	error::ProtocolError,
	flows::{Connector, common},
	http::Transport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const ENDPOINT: &str = "gettoken";

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
	errcode: i64,
	errmsg: String,
	access_token: String,
	expires_in: i64,
}

impl<C> Connector<C>
where
	C: ?Sized + Transport,
{
	/// Returns a valid corp access token, refreshing through the issuing endpoint when the
	/// cached entry is absent or expired.
	pub async fn access_token(&self) -> Result<CachedToken> {
		const KIND: FlowKind = FlowKind::AccessToken;

		let span = FlowSpan::new(KIND, "access_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let guard = self.cache.refresh_guard(&self.config.app_id);
				let _singleflight = guard.lock().await;
				let now = OffsetDateTime::now_utc();

				if let Some(current) = self
					.cache
					.fetch(&self.config.app_id)
					.filter(|token| !token.is_expired_at(now))
				{
					return Ok(current);
				}

				let token = self.fetch_access_token().await?;

				self.cache.save(&self.config.app_id, token.clone());

				Ok(token)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Drops the cached token for this corp id; the next [`Connector::access_token`] call always
	/// contacts the issuing endpoint, regardless of prior expiry state.
	pub fn invalidate_access_token(&self) {
		self.cache.evict(&self.config.app_id);
	}

	async fn fetch_access_token(&self) -> Result<CachedToken> {
		// Stamped before dispatch so network latency biases toward earlier expiry, never later.
		let issued_at = OffsetDateTime::now_utc() - ISSUANCE_LATENCY_ALLOWANCE;
		let response = self
			.http_client
			.get(&self.endpoints.access_token, &[
				("corpid", self.config.app_id.as_str()),
				("corpsecret", self.config.app_secret.expose()),
			])
			.await?;
		let payload = common::decode_provider_response::<AccessTokenResponse>(&response, ENDPOINT)?;

		if payload.errcode != 0 || payload.errmsg != "ok" {
			return Err(ProtocolError::Provider {
				errcode: payload.errcode,
				errmsg: payload.errmsg,
			}
			.into());
		}

		Ok(CachedToken::new(
			payload.access_token,
			issued_at,
			Duration::seconds(payload.expires_in),
		))
	}
}
