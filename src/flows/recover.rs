//! One-shot recovery wrapper for token-dependent provider calls.

// self
use crate::{
	_prelude::*,
	error::is_credential_rejection,
	flows::Connector,
	http::Transport,
};

impl<C> Connector<C>
where
	C: ?Sized + Transport,
{
	/// Executes a token-dependent provider call, recovering once from a stale-token rejection.
	///
	/// Success passes through untouched, as do local configuration errors—those are never
	/// reinterpreted or retried. When the failure carries the provider's invalid-credential
	/// code, the cached token is evicted, refreshed once through [`Connector::access_token`],
	/// and `action` is invoked exactly one more time; whatever that attempt produces is final.
	/// A second rejection on the retried attempt propagates as-is. All other failures propagate
	/// as their typed upstream errors with the original cause preserved.
	pub async fn with_token_retry<T, F, Fut>(&self, action: F) -> Result<T>
	where
		F: Fn() -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		match action().await {
			Ok(value) => Ok(value),
			Err(error) if error.is_config() => Err(error),
			Err(error) if is_credential_rejection(&error) => {
				self.invalidate_access_token();
				self.access_token().await?;

				action().await
			},
			Err(error) => Err(error),
		}
	}
}
