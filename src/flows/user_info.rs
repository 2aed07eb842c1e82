//! Identity exchange: normalizes provider callbacks into a connector identity record.
//!
//! The provider redirects back with either a QR-connect `auth_code` or an in-app `code`; both
//! exchanges require a corp access token and ride through the one-shot recovery wrapper so a
//! stale cached token costs one transparent refresh instead of a failed sign-in.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	flows::{Connector, common},
	http::Transport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Callback parameters delivered to the connector after the provider redirect.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CallbackParams {
	/// Desktop QR-connect callback.
	QrConnect {
		/// One-time login code issued by the QR-connect page.
		auth_code: String,
	},
	/// In-app OAuth callback.
	Base {
		/// One-time authorization code issued by the OAuth page.
		code: String,
	},
}
impl CallbackParams {
	/// Validates an untyped callback payload against the two supported shapes.
	pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
		serde_json::from_value(value).map_err(|_| ConfigError::InvalidParameters)
	}
}

/// Normalized identity record produced by a completed sign-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
	/// Stable identifier for the signed-in member.
	pub id: String,
	/// Corp-internal member id, when the flow distinguishes it from `id`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	/// Display name, when the provider discloses it.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Avatar URL, when the provider discloses it.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QrConnectLoginInfo {
	userinfo: QrConnectMember,
}

#[derive(Debug, Deserialize)]
struct QrConnectMember {
	userid: String,
	open_userid: String,
	name: Option<String>,
	avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BaseMember {
	userid: String,
	user_ticket: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BaseMemberDetail {
	userid: String,
	avatar: Option<String>,
}

impl<C> Connector<C>
where
	C: ?Sized + Transport,
{
	/// Exchanges callback parameters for the normalized identity record.
	pub async fn user_info(&self, params: &CallbackParams) -> Result<UserInfo> {
		const KIND: FlowKind = FlowKind::UserInfo;

		let span = FlowSpan::new(KIND, "user_info");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				match params {
					CallbackParams::QrConnect { auth_code } =>
						self.qr_connect_user_info(auth_code).await,
					CallbackParams::Base { code } => self.base_user_info(code).await,
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn qr_connect_user_info(&self, auth_code: &str) -> Result<UserInfo> {
		let login_info = self
			.with_token_retry(|| async move {
				let token = self.access_token().await?;
				let response = self
					.http_client
					.get(&self.endpoints.qr_connect_login_info, &[
						("access_token", token.secret.expose()),
						("auth_code", auth_code),
					])
					.await?;

				common::decode_provider_response::<QrConnectLoginInfo>(&response, "get_login_info")
			})
			.await?;
		let QrConnectMember { userid, open_userid, name, avatar } = login_info.userinfo;

		Ok(UserInfo { id: open_userid, user_id: Some(userid), name, avatar })
	}

	async fn base_user_info(&self, code: &str) -> Result<UserInfo> {
		let member = self
			.with_token_retry(|| async move {
				let token = self.access_token().await?;
				let response = self
					.http_client
					.get(&self.endpoints.base_user_info, &[
						("access_token", token.secret.expose()),
						("code", code),
					])
					.await?;

				common::decode_provider_response::<BaseMember>(&response, "getuserinfo")
			})
			.await?;
		// The provider only issues a ticket for elevated scopes; without one the member id is
		// all the identity this flow can disclose.
		let Some(user_ticket) = member.user_ticket else {
			return Ok(UserInfo { id: member.userid, user_id: None, name: None, avatar: None });
		};
		let ticket = user_ticket.as_str();
		let detail = self
			.with_token_retry(|| async move {
				let token = self.access_token().await?;
				let response = self
					.http_client
					.get(&self.endpoints.base_user_detail, &[
						("access_token", token.secret.expose()),
						("user_ticket", ticket),
					])
					.await?;

				common::decode_provider_response::<BaseMemberDetail>(&response, "getuserdetail")
			})
			.await?;

		Ok(UserInfo { id: detail.userid, user_id: None, name: None, avatar: detail.avatar })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn callback_params_distinguish_the_two_flows() {
		let qr = CallbackParams::from_value(serde_json::json!({ "auth_code": "qr-123" }))
			.expect("QR-connect parameters should validate.");
		let base = CallbackParams::from_value(serde_json::json!({ "code": "app-456" }))
			.expect("In-app parameters should validate.");

		assert_eq!(qr, CallbackParams::QrConnect { auth_code: "qr-123".into() });
		assert_eq!(base, CallbackParams::Base { code: "app-456".into() });
	}

	#[test]
	fn callback_params_reject_unknown_shapes() {
		let err = CallbackParams::from_value(serde_json::json!({ "ticket": "nope" }))
			.expect_err("Unknown parameter shapes should be rejected.");

		assert!(matches!(err, ConfigError::InvalidParameters));
	}

	#[test]
	fn user_info_serializes_camel_case_without_empty_fields() {
		let info = UserInfo {
			id: "open-1".into(),
			user_id: Some("member-1".into()),
			name: None,
			avatar: None,
		};
		let payload =
			serde_json::to_value(&info).expect("Identity record should serialize to JSON.");

		assert_eq!(payload, serde_json::json!({ "id": "open-1", "userId": "member-1" }));
	}
}
