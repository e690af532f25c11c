// crates.io
use httpmock::prelude::*;
// self
use tokengate::{
	_preludet::*,
	api::ApiRequest,
	auth::CredentialState,
	error::ConfigError,
	flows::ReqwestExecutor,
};

const APP_ID: &str = "A";
const APP_SECRET: &str = "B";

const EXPIRED_BODY: &str = "{\"errcode\":42001,\"errmsg\":\"access_token expired\"}";
const OK_BODY: &str = "{\"errcode\":0,\"errmsg\":\"ok\"}";

fn seeded_executor(server: &MockServer, token: &str) -> ReqwestExecutor {
	build_reqwest_test_executor(&server.base_url(), APP_ID, APP_SECRET)
		.with_state(Arc::new(CredentialState::with_token(token)))
}

#[tokio::test]
async fn success_on_first_dispatch_performs_no_refresh() {
	let server = MockServer::start_async().await;
	let executor = seeded_executor(&server, "T1");
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"T9\",\"expires_in\":7200}");
		})
		.await;
	let api_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/info").query_param("access_token", "T1");
			then.status(200).header("content-type", "application/json").body(OK_BODY);
		})
		.await;
	let response = executor
		.execute(ApiRequest::get(format!("{}/user/info?access_token=#", server.base_url())))
		.await
		.expect("First dispatch should succeed without entering the retry cycle.");

	assert!(response.is_success());

	api_mock.assert_calls_async(1).await;
	token_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn expired_token_is_refreshed_once_and_the_call_retried() {
	let server = MockServer::start_async().await;
	let executor = seeded_executor(&server, "T1");
	let stale_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/info").query_param("access_token", "T1");
			then.status(200).header("content-type", "application/json").body(EXPIRED_BODY);
		})
		.await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/token")
				.query_param("grant_type", "client_credential")
				.query_param("appid", APP_ID)
				.query_param("secret", APP_SECRET);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"T2\",\"expires_in\":7200}");
		})
		.await;
	let fresh_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/info").query_param("access_token", "T2");
			then.status(200).header("content-type", "application/json").body(OK_BODY);
		})
		.await;
	let response = executor
		.execute(ApiRequest::get(format!("{}/user/info?access_token=#", server.base_url())))
		.await
		.expect("Retry with the fresh token should succeed.");

	assert_eq!(response.status, 200);
	assert!(response.is_success());
	assert_eq!(executor.state.current().await.expose(), "T2");

	stale_mock.assert_calls_async(1).await;
	token_mock.assert_calls_async(1).await;
	fresh_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn failing_retry_is_returned_as_is_without_a_third_attempt() {
	let server = MockServer::start_async().await;
	let executor = seeded_executor(&server, "T1");
	let api_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/info");
			then.status(200).header("content-type", "application/json").body(EXPIRED_BODY);
		})
		.await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"T2\",\"expires_in\":7200}");
		})
		.await;
	let response = executor
		.execute(ApiRequest::get(format!("{}/user/info?access_token=#", server.base_url())))
		.await
		.expect("The second outcome should be handed back even when it still reports expiry.");

	assert!(response.credential_expired());

	api_mock.assert_calls_async(2).await;
	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn failed_refresh_retains_the_stale_token_and_lets_the_retry_fail() {
	let server = MockServer::start_async().await;
	let executor = seeded_executor(&server, "T1");
	let api_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/user/info").query_param("access_token", "T1");
			then.status(200).header("content-type", "application/json").body(EXPIRED_BODY);
		})
		.await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":40164,\"errmsg\":\"invalid ip\"}");
		})
		.await;
	let response = executor
		.execute(ApiRequest::get(format!("{}/user/info?access_token=#", server.base_url())))
		.await
		.expect("The retry on the stale token should still produce a response.");

	assert!(response.credential_expired());
	assert_eq!(executor.state.current().await.expose(), "T1");
	assert_eq!(executor.refresh_metrics.failures(), 1);

	api_mock.assert_calls_async(2).await;
	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn unreachable_service_is_treated_as_an_expiry_event() {
	let server = MockServer::start_async().await;
	let executor = seeded_executor(&server, "T1");
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"T2\",\"expires_in\":7200}");
		})
		.await;
	// Nothing listens on port 9, so both dispatches fail at the transport level; the
	// refresh still runs against the live token endpoint in between.
	let err = executor
		.execute(ApiRequest::get("http://127.0.0.1:9/user/info?access_token=#"))
		.await
		.expect_err("Both dispatches should fail at the transport level.");

	assert!(matches!(err, Error::Transport(_)));
	assert_eq!(executor.state.current().await.expose(), "T2");

	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn post_requests_forward_body_and_headers() {
	let server = MockServer::start_async().await;
	let executor = seeded_executor(&server, "T1");
	let api_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/menu/create")
				.query_param("access_token", "T1")
				.header("content-type", "application/json")
				.body("{\"button\":[]}");
			then.status(200).header("content-type", "application/json").body(OK_BODY);
		})
		.await;
	let request =
		ApiRequest::post(format!("{}/menu/create?access_token=#", server.base_url()), "{\"button\":[]}")
			.with_header("Content-Type", "application/json");
	let response =
		executor.execute(request).await.expect("Write-style dispatch should succeed.");

	assert!(response.is_success());

	api_mock.assert_async().await;
}

#[tokio::test]
async fn empty_url_templates_are_programming_errors() {
	let server = MockServer::start_async().await;
	let executor = seeded_executor(&server, "T1");
	let err = executor
		.execute(ApiRequest::get(""))
		.await
		.expect_err("An empty template should surface before any dispatch.");

	assert!(matches!(err, Error::Config(ConfigError::EmptyUrl)));
}
