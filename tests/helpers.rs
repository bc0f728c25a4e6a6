/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use pixiv_web::web::{AuthData, Client, Endpoints, FixedUserAgent, Options};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub(crate) const TEST_USER_AGENT: &str = "pixiv-web-tests/1.0";

#[allow(dead_code)]
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Client pointed at the mock server with a fixed user agent
#[allow(dead_code)]
pub(crate) fn mock_client(server: &MockServer, auth: AuthData) -> Client {
    init_logging();
    Client::with_config(
        auth,
        Options::default(),
        Endpoints::from_origin(&server.uri()),
        &FixedUserAgent(TEST_USER_AGENT.into()),
    )
    .unwrap()
}

// A logged in home page in the current layout
#[allow(dead_code)]
pub(crate) fn logged_in_home_page(user_id: &str) -> String {
    format!(
        r#"<html><head><script>
var dataLayer = [{{ login: 'yes', gender: "female", user_id: "{user_id}", lang: "en" }}];
</script></head><body><a href="/logout.php?return_to=%2F">Log out</a></body></html>"#
    )
}

// Serves `body` as the home page for any request
#[allow(dead_code)]
pub(crate) async fn mount_home_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub(crate) fn get_session_cookie() -> anyhow::Result<String> {
    Ok(std::env::var("PIXIV_SESSION")?)
}

#[allow(dead_code)]
pub(crate) fn get_credentials() -> anyhow::Result<AuthData> {
    let username = std::env::var("PIXIV_USERNAME")?;
    let password = std::env::var("PIXIV_PASSWORD")?;
    Ok(AuthData::from_credentials(&username, &password))
}
