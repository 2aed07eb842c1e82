//! Process-wide corp access-token cache with lazy expiry checks.
//!
//! [`TokenCache`] is a cloneable handle over shared state, passed to the connector constructor
//! instead of living in a global. Entries are keyed by corp id, checked lazily on read (no
//! sweeper), and overwritten on refresh—last write wins. The cache also owns a per-corp-id
//! singleflight guard so concurrent refreshes serialize instead of stampeding the issuing
//! endpoint.

// self
use crate::{_prelude::*, secret::TokenSecret};

/// Local clock allowance subtracted from the issuance instant before the token request is
/// dispatched, so network latency biases toward earlier expiry, never later.
pub const ISSUANCE_LATENCY_ALLOWANCE: Duration = Duration::seconds(2);

/// Corp access token cached alongside its expiry metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
	/// Opaque bearer credential; callers must avoid logging it.
	pub secret: TokenSecret,
	/// Issuance instant stamped locally before the issuing request was sent.
	pub issued_at: OffsetDateTime,
	/// Provider-declared lifetime.
	pub expires_in: Duration,
}
impl CachedToken {
	/// Creates a token record from an issuance response.
	pub fn new(secret: impl Into<String>, issued_at: OffsetDateTime, expires_in: Duration) -> Self {
		Self { secret: TokenSecret::new(secret), issued_at, expires_in }
	}

	/// Returns the instant after which the token is no longer usable.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.issued_at + self.expires_in
	}

	/// Returns `true` when `now` is strictly past the expiry instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now > self.expires_at()
	}

	/// Convenience helper that checks expiry against the current UTC instant.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}

type CacheMap = Arc<RwLock<HashMap<String, CachedToken>>>;
type GuardMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Cloneable in-process token cache keyed by corp id.
#[derive(Clone, Debug, Default)]
pub struct TokenCache {
	entries: CacheMap,
	refresh_guards: GuardMap,
}
impl TokenCache {
	/// Returns the cached token for `corp_id`, expired or not.
	///
	/// Freshness is the caller's concern; the access-token flow pairs this with
	/// [`CachedToken::is_expired_at`] under the refresh guard.
	pub fn fetch(&self, corp_id: &str) -> Option<CachedToken> {
		self.entries.read().get(corp_id).cloned()
	}

	/// Persists or replaces the token for `corp_id`.
	pub fn save(&self, corp_id: &str, token: CachedToken) {
		self.entries.write().insert(corp_id.to_owned(), token);
	}

	/// Removes the cached entry for `corp_id`; no-op when absent.
	pub fn evict(&self, corp_id: &str) {
		self.entries.write().remove(corp_id);
	}

	/// Returns (and creates on demand) the singleflight guard for a corp id.
	pub(crate) fn refresh_guard(&self, corp_id: &str) -> Arc<AsyncMutex<()>> {
		let mut guards = self.refresh_guards.lock();

		guards.entry(corp_id.to_owned()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
