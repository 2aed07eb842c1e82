// self
use wecom_connector::{
	_preludet::*,
	flows::AuthorizationRequest,
	provider::AuthScope,
};

const CORP_ID: &str = "corp-auth";
const WECOM_UA: &str =
	"Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) wxwork/4.1.10 MicroMessenger/7.0.1";

fn request() -> AuthorizationRequest {
	let redirect = Url::parse("https://logto.test/callback/wecom-web")
		.expect("Redirect fixture should parse.");

	AuthorizationRequest::new("state-123", redirect)
}

fn query_pairs(url: &Url) -> Vec<(String, String)> {
	url.query_pairs().map(|(key, value)| (key.into_owned(), value.into_owned())).collect()
}

#[test]
fn wecom_agents_get_the_in_app_oauth_url() {
	let (connector, _cache) =
		build_test_connector("https://qyapi.weixin.qq.com/cgi-bin/", CORP_ID, "secret");
	let url = connector.authorization_url(&request().with_user_agent(WECOM_UA));

	assert_eq!(url.host_str(), Some("open.weixin.qq.com"));
	assert_eq!(url.path(), "/connect/oauth2/authorize");
	assert_eq!(url.fragment(), Some("wechat_redirect"));
	assert_eq!(query_pairs(&url), vec![
		("appid".into(), CORP_ID.into()),
		("redirect_uri".into(), "https://logto.test/callback/wecom-web".into()),
		("response_type".into(), "code".into()),
		("scope".into(), "snsapi_base".into()),
		("state".into(), "state-123".into()),
	]);
}

#[test]
fn other_agents_get_the_qr_connect_url() {
	let (connector, _cache) =
		build_test_connector("https://qyapi.weixin.qq.com/cgi-bin/", CORP_ID, "secret");
	let desktop = request().with_user_agent("Mozilla/5.0 (Macintosh) Safari/605.1.15");
	let url = connector.authorization_url(&desktop);

	assert_eq!(url.host_str(), Some("open.work.weixin.qq.com"));
	assert_eq!(url.path(), "/wwopen/sso/3rd_qrConnect");
	assert_eq!(url.fragment(), None);
	assert_eq!(query_pairs(&url), vec![
		("appid".into(), CORP_ID.into()),
		("redirect_uri".into(), "https://logto.test/callback/wecom-web".into()),
		("state".into(), "state-123".into()),
		("usertype".into(), "member".into()),
	]);

	// No User-Agent at all also routes to QR-connect.
	let unknown = connector.authorization_url(&request());

	assert_eq!(unknown.host_str(), Some("open.work.weixin.qq.com"));
}

#[test]
fn configured_scope_flows_into_the_in_app_url() {
	let (mut connector, _cache) =
		build_test_connector("https://qyapi.weixin.qq.com/cgi-bin/", CORP_ID, "secret");

	connector.config.scope = Some(AuthScope::SnsapiUserinfo);

	let url = connector.authorization_url(&request().with_user_agent(WECOM_UA));
	let scope = query_pairs(&url)
		.into_iter()
		.find(|(key, _)| key == "scope")
		.expect("Scope parameter should be present.");

	assert_eq!(scope.1, "snsapi_userinfo");
}
