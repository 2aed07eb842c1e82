//! Shared helpers for flow implementations (provider response decoding).

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::ProtocolError, http::RawResponse};

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
	#[serde(default)]
	pub errcode: i64,
	#[serde(default)]
	pub errmsg: String,
}

/// Decodes a provider response body into `T`.
///
/// WeCom reports failures inside HTTP 200 bodies, so the envelope is inspected first: a nonzero
/// `errcode` becomes [`ProtocolError::Provider`] rendered as `"{errcode}: {errmsg}"`. Bodies
/// that pass the envelope check but miss the documented shape fail with the structured parse
/// error instead.
pub(crate) fn decode_provider_response<T>(
	response: &RawResponse,
	endpoint: &'static str,
) -> Result<T>
where
	T: DeserializeOwned,
{
	if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(&response.body) {
		if envelope.errcode != 0 {
			return Err(ProtocolError::Provider {
				errcode: envelope.errcode,
				errmsg: envelope.errmsg,
			}
			.into());
		}
	}

	Ok(response.json(endpoint)?)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct LoginInfo {
		usertype: i64,
	}

	fn response(body: &str) -> RawResponse {
		RawResponse { status: 200, body: body.as_bytes().to_vec() }
	}

	#[test]
	fn nonzero_envelopes_surface_as_provider_errors() {
		let err = decode_provider_response::<LoginInfo>(
			&response("{\"errcode\":42001,\"errmsg\":\"access_token expired\"}"),
			"get_login_info",
		)
		.expect_err("Nonzero envelope should fail.");

		assert_eq!(err.to_string(), "42001: access_token expired");
	}

	#[test]
	fn success_envelopes_decode_the_documented_shape() {
		let info = decode_provider_response::<LoginInfo>(
			&response("{\"errcode\":0,\"errmsg\":\"ok\",\"usertype\":5}"),
			"get_login_info",
		)
		.expect("Zero envelope with matching shape should decode.");

		assert_eq!(info.usertype, 5);
	}

	#[test]
	fn shape_mismatches_fail_with_parse_errors() {
		let err = decode_provider_response::<LoginInfo>(
			&response("{\"errcode\":0,\"errmsg\":\"ok\"}"),
			"get_login_info",
		)
		.expect_err("Missing fields should fail to decode.");

		assert!(matches!(
			err,
			Error::Protocol(ProtocolError::ResponseParse { endpoint: "get_login_info", .. })
		));
	}
}
