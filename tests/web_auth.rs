/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
mod helpers;

#[cfg(test)]
mod test {
    use crate::helpers;
    use pixiv_web::web::session::SESSION_MARKERS;
    use pixiv_web::web::{
        AuthData, COOKIE_LOGIN_FAILED, Client, Endpoints, FixedUserAgent, LoginMethod, Options,
        PixivError,
    };
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LOGIN_PAGE: &str = r#"<html><body><form action="/api/login" method="post">
        <input type="hidden" name="return_to" value="https://www.pixiv.net/">
        <input type="hidden" name="post_key" value="f3a9c1d2e4b5">
        <input type="text" name="pixiv_id">
        <input type="password" name="password">
    </form></body></html>"#;

    async fn mount_login_page(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
            .expect(1)
            .mount(server)
            .await;
    }

    fn login_ok() -> serde_json::Value {
        json!({"error": false, "message": "", "body": {"success": {"return_to": "https://www.pixiv.net/"}}})
    }

    #[tokio::test]
    async fn cookie_login_accepts_every_marker() {
        for marker in SESSION_MARKERS {
            let server = MockServer::start().await;
            helpers::mount_home_page(&server, &format!("<html>{marker}</html>")).await;

            let mut client = helpers::mock_client(&server, AuthData::from_cookie("123_tok"));
            let outcome = client.login(None).await.unwrap();
            assert!(outcome.is_success(), "marker {marker} not accepted");
            assert_eq!(outcome.method, LoginMethod::Cookie);
        }
    }

    #[tokio::test]
    async fn cookie_login_sends_session_cookie_and_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("cookie", "PHPSESSID=123_tok"))
            .and(header("user-agent", helpers::TEST_USER_AGENT))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(helpers::logged_in_home_page("123")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut client = helpers::mock_client(&server, AuthData::default());
        let outcome = client
            .login(Some(AuthData::from_cookie("123_tok")))
            .await
            .unwrap();
        assert!(outcome.is_success());
        assert_eq!(client.user_id(), Some("123"));
    }

    #[tokio::test]
    async fn cookie_login_without_marker_fails_and_keeps_cookie() {
        let server = MockServer::start().await;
        helpers::mount_home_page(&server, "<html><a href=\"/signup.php\">Sign up</a></html>")
            .await;

        let mut client = helpers::mock_client(&server, AuthData::from_cookie("expired_tok"));
        let outcome = client.login(None).await.unwrap();

        assert!(!outcome.is_success());
        assert_eq!(outcome.failure.as_deref(), Some(COOKIE_LOGIN_FAILED));
        assert_eq!(client.site_cookies().as_deref(), Some("PHPSESSID=expired_tok"));
        assert_eq!(client.user_id(), None);
    }

    #[tokio::test]
    async fn cookie_login_succeeds_without_user_id() {
        let server = MockServer::start().await;
        helpers::mount_home_page(&server, "<script>pixiv.user.loggedIn = true;</script>").await;

        let mut client = helpers::mock_client(&server, AuthData::from_cookie("123_tok"));
        let outcome = client.login(None).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(client.user_id(), None);
    }

    #[tokio::test]
    async fn script_user_id_wins_over_analytics() {
        let server = MockServer::start().await;
        let body = r#"<script>
pixiv.user.loggedIn = true;
pixiv.user.id = "111";
_gaq.push(['_setCustomVar', 6, 'user_id', "222", 1]);
</script>"#;
        helpers::mount_home_page(&server, body).await;

        let mut client = helpers::mock_client(&server, AuthData::from_cookie("123_tok"));
        client.login(None).await.unwrap();
        assert_eq!(client.user_id(), Some("111"));
    }

    #[tokio::test]
    async fn cookie_login_surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut client = helpers::mock_client(&server, AuthData::from_cookie("123_tok"));
        let result = client.login(None).await;
        assert!(matches!(result, Err(PixivError::Request(_))));
    }

    #[tokio::test]
    async fn form_login_posts_credentials_and_post_key() {
        let server = MockServer::start().await;
        mount_login_page(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(query_param("lang", "en"))
            .and(body_string_contains("pixiv_id=alice"))
            .and(body_string_contains("password=hunter2"))
            .and(body_string_contains("post_key=f3a9c1d2e4b5"))
            .and(body_string_contains("source=accounts"))
            .and(body_string_contains("lang=en"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "PHPSESSID=999_fresh; path=/")
                    .set_body_json(login_ok()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut client =
            helpers::mock_client(&server, AuthData::from_credentials("alice", "hunter2"));
        let outcome = client.login(None).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.method, LoginMethod::Form);
        assert_eq!(client.session_cookie().as_deref(), Some("999_fresh"));
    }

    #[tokio::test]
    async fn form_login_reuses_configured_username() {
        let server = MockServer::start().await;
        mount_login_page(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(body_string_contains("pixiv_id=alice"))
            .and(body_string_contains("password=x"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "PHPSESSID=999_fresh; path=/")
                    .set_body_json(login_ok()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut client = helpers::mock_client(&server, AuthData::from_credentials("alice", "old"));
        let outcome = client
            .login(Some(AuthData {
                password: Some("x".into()),
                ..Default::default()
            }))
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(client.auth_data().username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn form_login_refused_on_captcha() {
        let server = MockServer::start().await;
        mount_login_page(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "PHPSESSID=999_fresh; path=/")
                    .set_body_json(json!({
                        "error": false,
                        "message": "",
                        "body": {"validation_errors": {"captcha": "Complete the reCAPTCHA"}}
                    })),
            )
            .mount(&server)
            .await;

        let mut client =
            helpers::mock_client(&server, AuthData::from_credentials("alice", "hunter2"));
        let outcome = client.login(None).await.unwrap();

        assert!(!outcome.is_success());
        assert!(outcome.failure.unwrap().contains("Complete the reCAPTCHA"));
    }

    #[tokio::test]
    async fn form_login_refused_on_error_flag() {
        let server = MockServer::start().await;
        mount_login_page(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": true,
                "message": "Invalid request",
                "body": []
            })))
            .mount(&server)
            .await;

        let mut client =
            helpers::mock_client(&server, AuthData::from_credentials("alice", "hunter2"));
        let outcome = client.login(None).await.unwrap();
        assert_eq!(outcome.failure.as_deref(), Some("Invalid request"));
    }

    #[tokio::test]
    async fn form_login_without_post_key_leaves_it_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><form><input type="text" name="pixiv_id"></form></body></html>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": true,
                "message": "Invalid request",
                "body": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut client =
            helpers::mock_client(&server, AuthData::from_credentials("alice", "hunter2"));
        let outcome = client.login(None).await.unwrap();
        assert_eq!(outcome.failure.as_deref(), Some("Invalid request"));

        let requests = server.received_requests().await.unwrap();
        let post = requests.iter().find(|r| r.method.as_str() == "POST").unwrap();
        let form = String::from_utf8_lossy(&post.body);
        assert!(form.contains("pixiv_id=alice"));
        assert!(!form.contains("post_key"));
    }

    #[tokio::test]
    async fn options_override_user_agent_and_locale() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .and(header("user-agent", "ua-override"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(header("user-agent", "ua-override"))
            .and(query_param("lang", "ja"))
            .and(body_string_contains("lang=ja"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "PHPSESSID=999_fresh; path=/")
                    .set_body_json(login_ok()),
            )
            .expect(1)
            .mount(&server)
            .await;

        helpers::init_logging();
        let mut client = Client::with_config(
            AuthData::from_credentials("alice", "hunter2"),
            Options {
                user_agent: Some("ua-override".into()),
                locale: Some("ja".into()),
            },
            Endpoints::from_origin(&server.uri()),
            &FixedUserAgent("ignored-agent/1.0".into()),
        )
        .unwrap();
        assert_eq!(client.user_agent(), "ua-override");
        assert_eq!(client.locale(), "ja");

        let outcome = client.login(None).await.unwrap();
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn form_login_needs_session_cookie() {
        let server = MockServer::start().await;
        mount_login_page(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "device_token=abc; path=/")
                    .set_body_json(login_ok()),
            )
            .mount(&server)
            .await;

        let mut client =
            helpers::mock_client(&server, AuthData::from_credentials("alice", "hunter2"));
        let outcome = client.login(None).await.unwrap();

        assert!(!outcome.is_success());
        assert_eq!(client.session_cookie(), None);
        assert!(client.site_cookies().unwrap().contains("device_token=abc"));
    }

    #[tokio::test]
    async fn form_login_ignores_other_cookies() {
        let server = MockServer::start().await;
        mount_login_page(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header("set-cookie", "device_token=abc; path=/")
                    .append_header("set-cookie", "PHPSESSID=999_fresh; path=/")
                    .append_header("set-cookie", "p_ab_id=4; path=/")
                    .set_body_json(login_ok()),
            )
            .mount(&server)
            .await;

        let mut client =
            helpers::mock_client(&server, AuthData::from_credentials("alice", "hunter2"));
        let outcome = client.login(None).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(client.session_cookie().as_deref(), Some("999_fresh"));
    }

    #[tokio::test]
    async fn form_login_without_credentials_skips_network() {
        let server = MockServer::start().await;

        let mut client = helpers::mock_client(&server, AuthData::default());
        let outcome = client.login(None).await.unwrap();

        assert!(!outcome.is_success());
        assert_eq!(outcome.method, LoginMethod::Form);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn captured_session_resumes_in_new_client() {
        let server = MockServer::start().await;
        mount_login_page(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "PHPSESSID=777_round; path=/")
                    .set_body_json(login_ok()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("cookie", "PHPSESSID=777_round"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(helpers::logged_in_home_page("4242")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut first =
            helpers::mock_client(&server, AuthData::from_credentials("alice", "hunter2"));
        assert!(first.login(None).await.unwrap().is_success());
        let token = first.session_cookie().unwrap();

        let mut second = helpers::mock_client(&server, AuthData::from_cookie(&token));
        let outcome = second.login(None).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(second.session_cookie(), Some(token));
        assert_eq!(second.user_id(), Some("4242"));
    }
}
