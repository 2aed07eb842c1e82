//! Provider configuration, endpoint set, and connector self-description.
//!
//! The platform hosting this connector hands over configuration as an untyped JSON value;
//! [`WeComConfig::from_value`] is the validation boundary. Endpoint URLs default to production
//! but stay overridable so tests can point every API call at a mock server.

// self
use crate::{_prelude::*, error::ConfigError, secret::TokenSecret};

/// Stable connector identifier registered with the hosting platform.
pub const CONNECTOR_ID: &str = "wecom-web";
/// Identity target shared by all WeCom connector variants.
pub const CONNECTOR_TARGET: &str = "wecom";

/// OAuth scope requested during the in-app authorization redirect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScope {
	/// Silent authorization; yields the member id only.
	#[default]
	SnsapiBase,
	/// Interactive authorization; unlocks profile detail access.
	SnsapiUserinfo,
}
impl AuthScope {
	/// Returns the scope literal used in authorization URLs.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthScope::SnsapiBase => "snsapi_base",
			AuthScope::SnsapiUserinfo => "snsapi_userinfo",
		}
	}
}
impl Display for AuthScope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Validated connector configuration supplied by the hosting platform.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeComConfig {
	/// Corp identifier presented to the provider as `corpid`.
	pub app_id: String,
	/// Corp secret presented to the provider as `corpsecret`.
	pub app_secret: TokenSecret,
	/// Authorization scope; defaults to silent sign-in when omitted.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub scope: Option<AuthScope>,
}
impl WeComConfig {
	/// Creates a configuration with the default scope.
	pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
		Self { app_id: app_id.into(), app_secret: TokenSecret::new(app_secret), scope: None }
	}

	/// Validates an untyped configuration payload, reporting the failing path on mismatch.
	pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
		serde_path_to_error::deserialize(value)
			.map_err(|source| ConfigError::InvalidConfig { source })
	}

	/// Returns the effective authorization scope.
	pub fn effective_scope(&self) -> AuthScope {
		self.scope.unwrap_or_default()
	}
}

/// Endpoint set consumed by the connector flows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeComEndpoints {
	/// Corp access-token issuing endpoint.
	pub access_token: Url,
	/// In-app OAuth authorization page.
	pub base_authorization: Url,
	/// In-app code-to-member exchange endpoint.
	pub base_user_info: Url,
	/// In-app member profile detail endpoint.
	pub base_user_detail: Url,
	/// Desktop QR-connect authorization page.
	pub qr_connect_authorization: Url,
	/// QR-connect login info endpoint.
	pub qr_connect_login_info: Url,
}
impl WeComEndpoints {
	/// Rebases every API endpoint onto `api_base`, keeping the authorization pages untouched.
	///
	/// Authorization URLs are only ever rendered for the user agent, so tests that rebase onto a
	/// mock server still exercise them verbatim.
	pub fn with_api_base(api_base: &Url) -> Result<Self, ConfigError> {
		Ok(Self {
			access_token: join(api_base, "gettoken")?,
			base_user_info: join(api_base, "auth/getuserinfo")?,
			base_user_detail: join(api_base, "auth/getuserdetail")?,
			qr_connect_login_info: join(api_base, "service/get_login_info")?,
			..Self::default()
		})
	}
}
impl Default for WeComEndpoints {
	fn default() -> Self {
		Self {
			access_token: production("https://qyapi.weixin.qq.com/cgi-bin/gettoken"),
			base_authorization: production("https://open.weixin.qq.com/connect/oauth2/authorize"),
			base_user_info: production("https://qyapi.weixin.qq.com/cgi-bin/auth/getuserinfo"),
			base_user_detail: production("https://qyapi.weixin.qq.com/cgi-bin/auth/getuserdetail"),
			qr_connect_authorization: production(
				"https://open.work.weixin.qq.com/wwopen/sso/3rd_qrConnect",
			),
			qr_connect_login_info: production(
				"https://qyapi.weixin.qq.com/cgi-bin/service/get_login_info",
			),
		}
	}
}

/// Platforms a connector variant can serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorPlatform {
	/// Native mobile applications.
	Native,
	/// Platform-independent flows.
	Universal,
	/// Web sign-in pages.
	Web,
}

/// Self-description record the hosting platform uses to register the connector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectorMetadata {
	/// Stable connector identifier.
	pub id: &'static str,
	/// Identity target grouping connector variants.
	pub target: &'static str,
	/// Platform this variant serves.
	pub platform: ConnectorPlatform,
	/// Localized display names as `(language tag, name)` pairs.
	pub display_names: &'static [(&'static str, &'static str)],
	/// Localized descriptions as `(language tag, text)` pairs.
	pub descriptions: &'static [(&'static str, &'static str)],
}
impl Default for ConnectorMetadata {
	fn default() -> Self {
		Self {
			id: CONNECTOR_ID,
			target: CONNECTOR_TARGET,
			platform: ConnectorPlatform::Web,
			display_names: &[("en", "WeCom"), ("zh-CN", "企业微信")],
			descriptions: &[
				("en", "WeCom is an enterprise communication and collaboration platform."),
				("zh-CN", "企业微信是一个企业通讯与办公平台。"),
			],
		}
	}
}

fn join(base: &Url, path: &str) -> Result<Url, ConfigError> {
	base.join(path).map_err(|source| ConfigError::InvalidEndpoint { source })
}

fn production(value: &str) -> Url {
	Url::parse(value).expect("Production endpoint literals must parse.")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn config_deserializes_camel_case_payloads() {
		let config = WeComConfig::from_value(serde_json::json!({
			"appId": "corp-1",
			"appSecret": "secret-1",
			"scope": "snsapi_userinfo",
		}))
		.expect("Well-formed configuration should validate.");

		assert_eq!(config.app_id, "corp-1");
		assert_eq!(config.app_secret.expose(), "secret-1");
		assert_eq!(config.effective_scope(), AuthScope::SnsapiUserinfo);
	}

	#[test]
	fn config_scope_defaults_to_silent_sign_in() {
		let config =
			WeComConfig::from_value(serde_json::json!({ "appId": "corp-1", "appSecret": "s" }))
				.expect("Scope should be optional.");

		assert_eq!(config.effective_scope(), AuthScope::SnsapiBase);
	}

	#[test]
	fn config_rejects_malformed_payloads() {
		let err = WeComConfig::from_value(serde_json::json!({ "appId": "corp-1" }))
			.expect_err("Missing secret should fail validation.");

		assert!(matches!(err, ConfigError::InvalidConfig { .. }));
		assert!(WeComConfig::from_value(serde_json::json!({
			"appId": "corp-1",
			"appSecret": "s",
			"scope": "snsapi_everything",
		}))
		.is_err());
	}

	#[test]
	fn endpoints_rebase_api_calls_only() {
		let base = Url::parse("https://mock.test/cgi-bin/").expect("Test base URL should parse.");
		let endpoints =
			WeComEndpoints::with_api_base(&base).expect("Rebasing onto a valid URL should work.");

		assert_eq!(endpoints.access_token.as_str(), "https://mock.test/cgi-bin/gettoken");
		assert_eq!(
			endpoints.qr_connect_login_info.as_str(),
			"https://mock.test/cgi-bin/service/get_login_info",
		);
		assert_eq!(endpoints.base_authorization, WeComEndpoints::default().base_authorization);
	}

	#[test]
	fn metadata_describes_the_web_variant() {
		let metadata = ConnectorMetadata::default();

		assert_eq!(metadata.id, "wecom-web");
		assert_eq!(metadata.target, "wecom");
		assert_eq!(metadata.platform, ConnectorPlatform::Web);
		assert!(metadata.display_names.iter().any(|(tag, _)| *tag == "zh-CN"));
	}
}
