//! Authorization URL construction for in-app and QR-connect sign-in.
//!
//! WeCom serves two entry points: browsers embedded in the WeCom client get the in-app OAuth
//! page (which requires a `#wechat_redirect` fragment), every other agent gets the desktop
//! QR-connect page. Selection keys on the User-Agent header the hosting platform forwards.

// self
use crate::{
	_prelude::*,
	flows::Connector,
	http::Transport,
	obs::{FlowKind, FlowSpan},
};

const WECOM_UA_MARKER: &str = "wxwork";

/// Parameters for building an authorization redirect.
#[derive(Clone, Debug)]
pub struct AuthorizationRequest {
	/// Opaque anti-forgery state round-tripped by the provider.
	pub state: String,
	/// Callback URI registered with the provider for this corp app.
	pub redirect_uri: Url,
	/// User-Agent header of the requesting browser, when known.
	pub user_agent: Option<String>,
}
impl AuthorizationRequest {
	/// Creates a request with no User-Agent attached.
	pub fn new(state: impl Into<String>, redirect_uri: Url) -> Self {
		Self { state: state.into(), redirect_uri, user_agent: None }
	}

	/// Attaches the requesting browser's User-Agent header.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}
}

/// Returns `true` when the User-Agent belongs to WeCom's embedded browser.
fn is_wecom_agent(user_agent: Option<&str>) -> bool {
	user_agent.is_some_and(|value| value.to_lowercase().contains(WECOM_UA_MARKER))
}

impl<C> Connector<C>
where
	C: ?Sized + Transport,
{
	/// Builds the authorization redirect for the requesting agent; pure, no network call.
	pub fn authorization_url(&self, request: &AuthorizationRequest) -> Url {
		let _guard = FlowSpan::new(FlowKind::Authorization, "authorization_url").entered();

		if is_wecom_agent(request.user_agent.as_deref()) {
			self.in_app_authorization_url(request)
		} else {
			self.qr_connect_authorization_url(request)
		}
	}

	fn in_app_authorization_url(&self, request: &AuthorizationRequest) -> Url {
		let mut url = self.endpoints.base_authorization.clone();

		url.query_pairs_mut()
			.append_pair("appid", &self.config.app_id)
			.append_pair("redirect_uri", request.redirect_uri.as_str())
			.append_pair("response_type", "code")
			.append_pair("scope", self.config.effective_scope().as_str())
			.append_pair("state", &request.state);
		// The provider drops the query without this fragment.
		url.set_fragment(Some("wechat_redirect"));

		url
	}

	fn qr_connect_authorization_url(&self, request: &AuthorizationRequest) -> Url {
		let mut url = self.endpoints.qr_connect_authorization.clone();

		url.query_pairs_mut()
			.append_pair("appid", &self.config.app_id)
			.append_pair("redirect_uri", request.redirect_uri.as_str())
			.append_pair("state", &request.state)
			.append_pair("usertype", "member");

		url
	}
}
