/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::web::errors::PixivError;
use crate::web::parsers::from_null_to_default;
use crate::web::session::{find_user_id, is_logged_in};
use crate::web::ApiClient;
use log::{debug, info, warn};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

/// Reason reported when the home page does not look like a logged in session
pub const COOKIE_LOGIN_FAILED: &str = "Failed to login using Cookie Authentication";

const POST_KEY_SELECTOR: &str = r#"input[name="post_key"]"#;

/// Credentials used to log in.
///
/// Either a username/password pair for the login form or the value of a `PHPSESSID`
/// cookie from an earlier session. When a cookie is known it always takes precedence.
#[derive(Default, Clone, PartialEq)]
pub struct AuthData {
    pub username: Option<String>,
    pub password: Option<String>,
    pub cookie: Option<String>,
}

impl AuthData {
    pub fn from_credentials(username: &str, password: &str) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            cookie: None,
        }
    }

    pub fn from_cookie(cookie: &str) -> Self {
        Self {
            cookie: Some(cookie.into()),
            ..Default::default()
        }
    }

    /// Overrides only the fields that are set in `other`
    pub fn merge(&mut self, other: AuthData) {
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        if other.cookie.is_some() {
            self.cookie = other.cookie;
        }
    }
}

impl std::fmt::Debug for AuthData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "xxx");
        f.debug_struct("AuthData")
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("cookie", &redact(&self.cookie))
            .finish()
    }
}

/// Which strategy a login attempt used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum LoginMethod {
    #[strum(to_string = "cookie")]
    Cookie,
    #[strum(to_string = "form")]
    Form,
}

/// Result of a login attempt that reached pixiv.
///
/// Network and decoding problems are returned as [`PixivError`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub method: LoginMethod,
    /// Why the login was refused, `None` on success
    pub failure: Option<String>,
}

impl LoginOutcome {
    fn succeeded(method: LoginMethod) -> Self {
        Self {
            method,
            failure: None,
        }
    }

    fn failed(method: LoginMethod, reason: impl Into<String>) -> Self {
        Self {
            method,
            failure: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

// Body of the accounts login POST
#[derive(Serialize)]
struct LoginForm<'a> {
    pixiv_id: &'a str,
    password: &'a str,
    return_to: &'a str,
    lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_key: Option<String>,
    source: &'static str,
    #[serde(rename = "ref")]
    referrer: &'static str,
}

/// Answer of the accounts login API
#[derive(Deserialize, Debug, Default)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "from_null_to_default")]
    pub error: bool,

    #[serde(default, deserialize_with = "from_null_to_default")]
    pub message: String,

    // Shape varies (object on validation errors, sometimes an empty array)
    #[serde(default)]
    pub body: serde_json::Value,
}

impl LoginResponse {
    pub fn validation_errors(&self) -> Option<&serde_json::Value> {
        self.body.get("validation_errors").filter(|v| !v.is_null())
    }

    pub fn captcha_error(&self) -> Option<&str> {
        self.validation_errors()?.get("captcha")?.as_str()
    }

    // Reason to report if this response refuses the login
    fn refusal(&self) -> Option<String> {
        if let Some(captcha) = self.captcha_error() {
            return Some(format!("Captcha validation failed: {captcha}"));
        }
        if self.validation_errors().is_some() {
            return Some(format!("Login validation failed: {}", self.body["validation_errors"]));
        }
        if self.error {
            return Some(if self.message.is_empty() {
                "Login API reported an error".to_string()
            } else {
                self.message.clone()
            });
        }
        None
    }
}

/// Reads the one time `post_key` token out of the login page
pub fn post_key_from_page(page: &str) -> Result<Option<String>, PixivError> {
    let selector =
        Selector::parse(POST_KEY_SELECTOR).map_err(|e| PixivError::HtmlSelector(e.to_string()))?;
    let document = Html::parse_document(page);
    Ok(document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_owned))
}

/// Logs a session in and remembers who it belongs to.
///
/// Calling [`SessionAuthenticator::login`] requires `&mut self`, so one authenticator never
/// runs two logins at once against the same cookie jar.
#[derive(Debug)]
pub struct SessionAuthenticator {
    auth: AuthData,
    locale: String,
    user_id: Option<String>,
}

impl SessionAuthenticator {
    pub fn new(auth: AuthData, locale: &str) -> Self {
        Self {
            auth,
            locale: locale.into(),
            user_id: None,
        }
    }

    pub fn auth_data(&self) -> &AuthData {
        &self.auth
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Numeric id of the logged in user, if the home page gave it away
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Logs in, merging `auth` into the known credentials first.
    ///
    /// A known session cookie selects cookie login, anything else goes through the login
    /// form. There is no fallback from one to the other.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        auth: Option<AuthData>,
    ) -> Result<LoginOutcome, PixivError> {
        if let Some(auth) = auth {
            self.auth.merge(auth);
        }

        let outcome = match self.auth.cookie.clone() {
            Some(token) => self.cookie_login(api, &token).await?,
            None => self.form_login(api).await?,
        };

        match &outcome.failure {
            None => info!("Logged in using {} authentication", outcome.method),
            Some(reason) => warn!("{} login refused: {}", outcome.method, reason),
        }
        Ok(outcome)
    }

    async fn cookie_login(
        &mut self,
        api: &ApiClient,
        token: &str,
    ) -> Result<LoginOutcome, PixivError> {
        debug!("Attempting cookie login");
        api.install_session_cookie(token)?;

        let body = api.get_text(&api.endpoints().site).await?;
        if !is_logged_in(&body) {
            return Ok(LoginOutcome::failed(LoginMethod::Cookie, COOKIE_LOGIN_FAILED));
        }

        // The id only decorates later requests, not finding it is fine
        match find_user_id(&body) {
            Some(id) => self.user_id = Some(id),
            None => debug!("No user id found on the home page"),
        }
        Ok(LoginOutcome::succeeded(LoginMethod::Cookie))
    }

    async fn form_login(&self, api: &ApiClient) -> Result<LoginOutcome, PixivError> {
        debug!("Attempting form login");
        let (Some(username), Some(password)) = (&self.auth.username, &self.auth.password) else {
            return Ok(LoginOutcome::failed(
                LoginMethod::Form,
                "Username and password are required for form login",
            ));
        };

        let endpoints = api.endpoints();
        let login_page = api.get_text(&endpoints.login_page).await?;
        let post_key = post_key_from_page(&login_page)?;
        if post_key.is_none() {
            warn!("Login page did not contain a post_key");
        }

        let form = LoginForm {
            pixiv_id: username,
            password,
            return_to: &endpoints.site,
            lang: &self.locale,
            post_key,
            source: "accounts",
            referrer: "",
        };
        let params = [("lang", self.locale.as_str())];
        let resp = api
            .post_form::<_, LoginResponse>(&endpoints.login_api, &form, &params)
            .await?;

        if let Some(reason) = resp.refusal() {
            return Ok(LoginOutcome::failed(LoginMethod::Form, reason));
        }

        if api.session_cookie().is_some() {
            Ok(LoginOutcome::succeeded(LoginMethod::Form))
        } else {
            Ok(LoginOutcome::failed(
                LoginMethod::Form,
                "No session cookie was set by the login API",
            ))
        }
    }
}
