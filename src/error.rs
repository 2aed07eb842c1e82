//! Connector-level error types shared across flows, the token cache, and transports.

// self
use crate::_prelude::*;

/// Connector-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Provider error code signaling an invalid or expired access token.
///
/// WeCom reports it inside an HTTP 200 body (`errcode: 42001`), so recovery keys on the payload
/// rather than the status line.
pub const CREDENTIAL_REJECTED_CODE: i64 = 42001;

/// Canonical connector error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or parameter problem; never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider violated its own response protocol.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl Error {
	/// Returns `true` when the error belongs to the local configuration class that recovery must
	/// pass through untouched.
	pub fn is_config(&self) -> bool {
		matches!(self, Self::Config(_))
	}
}

/// Returns `true` when the provider rejected the presented access token as invalid or expired.
///
/// Detection policy: structured match on the provider error envelope first, then a substring
/// scan of the rendered message for transport failures that embed the provider code. Swapping
/// this predicate is the only change needed to alter the recovery trigger.
pub fn is_credential_rejection(error: &Error) -> bool {
	if error.is_config() {
		return false;
	}
	if let Error::Protocol(ProtocolError::Provider { errcode, .. }) = error {
		return *errcode == CREDENTIAL_REJECTED_CODE;
	}

	error.to_string().contains(&CREDENTIAL_REJECTED_CODE.to_string())
}

/// Configuration and validation failures raised by the connector.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Connector configuration payload failed validation.
	#[error("Connector configuration is invalid.")]
	InvalidConfig {
		/// Structured deserialization failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
	/// Callback parameters match neither sign-in flow.
	#[error("Callback parameters are invalid for the WeCom connector.")]
	InvalidParameters,
	/// An endpoint URL could not be assembled.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Provider protocol violations surfaced by API responses.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Provider returned a nonzero error envelope.
	///
	/// The display format is `"{errcode}: {errmsg}"`, keeping the provider code visible to the
	/// recovery predicate and the caller alike.
	#[error("{errcode}: {errmsg}")]
	Provider {
		/// Provider-declared error code.
		errcode: i64,
		/// Provider-declared error message.
		errmsg: String,
	},
	/// Response body did not match the documented shape.
	#[error("{endpoint} returned a malformed response.")]
	ResponseParse {
		/// Endpoint label for diagnostics.
		endpoint: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider: {message}.")]
	Network {
		/// Rendered transport error, which may embed a provider error code.
		message: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { message: src.to_string(), source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn provider_error(errcode: i64, errmsg: &str) -> Error {
		ProtocolError::Provider { errcode, errmsg: errmsg.into() }.into()
	}

	#[test]
	fn credential_rejection_matches_structured_envelope() {
		assert!(is_credential_rejection(&provider_error(42001, "access_token expired")));
		assert!(!is_credential_rejection(&provider_error(40029, "invalid code")));
	}

	#[test]
	fn credential_rejection_scans_transport_messages() {
		let embedded = Error::Transport(TransportError::Network {
			message: "provider said 42001, hint: acquire a new token".into(),
			source: "upstream".to_string().into(),
		});
		let unrelated = Error::Transport(TransportError::Network {
			message: "connection reset by peer".into(),
			source: "upstream".to_string().into(),
		});

		assert!(is_credential_rejection(&embedded));
		assert!(!is_credential_rejection(&unrelated));
	}

	#[test]
	fn credential_rejection_never_matches_config_errors() {
		let config = Error::Config(ConfigError::InvalidParameters);

		assert!(config.is_config());
		assert!(!is_credential_rejection(&config));
	}

	#[test]
	fn provider_errors_render_code_and_message() {
		let rendered = provider_error(42001, "access_token expired").to_string();

		assert_eq!(rendered, "42001: access_token expired");
	}
}
