/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::web::errors::PixivError;
use crate::web::file::FileMetadata;
use crate::web::parsers::{from_api_body, from_null_to_default};
use async_stream::try_stream;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use log::debug;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

// Root pixiv site
pub const SITE_ORIGIN: &str = "https://www.pixiv.net";
pub const LOGIN_PAGE_URL: &str = "https://accounts.pixiv.net/login";
pub const LOGIN_API_URL: &str = "https://accounts.pixiv.net/api/login";
pub const WEB_API_URL: &str = "https://www.pixiv.net/ajax";
pub const COOKIE_DOMAIN: &str = "pixiv.net";

/// Name of the cookie carrying the pixiv session token
pub const SESSION_COOKIE_NAME: &str = "PHPSESSID";

const X_USER_ID: &str = "x-user-id";

/// The set of URLs the client talks to.
///
/// [`Endpoints::default`] points at pixiv itself. [`Endpoints::from_origin`] keeps the same
/// paths but places everything on a single origin, which is what a local proxy or a mock
/// server needs.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Home page, also sent as the `Referer`
    pub site: String,
    pub login_page: String,
    pub login_api: String,
    /// Prefix of the ajax endpoints, without a trailing slash
    pub web_api: String,
    /// `Domain` attribute of the session cookie. `None` makes it a host-only cookie.
    pub cookie_domain: Option<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            site: SITE_ORIGIN.into(),
            login_page: LOGIN_PAGE_URL.into(),
            login_api: LOGIN_API_URL.into(),
            web_api: WEB_API_URL.into(),
            cookie_domain: Some(COOKIE_DOMAIN.into()),
        }
    }
}

impl Endpoints {
    /// Rebases every endpoint on `origin` (e.g. `http://127.0.0.1:8080`)
    pub fn from_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            site: origin.into(),
            login_page: format!("{origin}/login"),
            login_api: format!("{origin}/api/login"),
            web_api: format!("{origin}/ajax"),
            cookie_domain: None,
        }
    }
}

/// Directly communicates with pixiv.
///
/// Owns the cookie jar for one client instance. Every request carries the `User-Agent`
/// and whatever cookies the jar matches for the request URL.
pub struct ApiClient {
    https_client: reqwest::Client,
    cookie_jar: Arc<Jar>,
    user_agent: HeaderValue,
    referer: HeaderValue,
    endpoints: Endpoints,
}

impl ApiClient {
    /// Creates a new transport with an empty cookie jar
    pub fn new(user_agent: &str, endpoints: Endpoints) -> Result<Self, PixivError> {
        let cookie_jar = Arc::new(Jar::default());
        let https_client = reqwest::Client::builder()
            .cookie_provider(cookie_jar.clone())
            .build()?;
        Ok(Self {
            https_client,
            cookie_jar,
            user_agent: HeaderValue::from_str(user_agent)?,
            referer: HeaderValue::from_str(&endpoints.site)?,
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn user_agent(&self) -> &str {
        // Built from a &str so it is always visible ASCII
        self.user_agent.to_str().unwrap_or_default()
    }

    /// Places the `PHPSESSID` cookie for the site origin into the jar
    pub(crate) fn install_session_cookie(&self, token: &str) -> Result<(), PixivError> {
        let site = Url::parse(&self.endpoints.site)?;
        let cookie = match &self.endpoints.cookie_domain {
            Some(domain) => format!("{SESSION_COOKIE_NAME}={token}; Domain={domain}; Path=/"),
            None => format!("{SESSION_COOKIE_NAME}={token}; Path=/"),
        };
        self.cookie_jar.add_cookie_str(&cookie, &site);
        Ok(())
    }

    /// The `Cookie` header the jar would send to the site origin
    pub fn site_cookies(&self) -> Option<String> {
        let site = Url::parse(&self.endpoints.site).ok()?;
        self.cookie_jar
            .cookies(&site)
            .and_then(|v| v.to_str().ok().map(str::to_owned))
    }

    /// Value of the `PHPSESSID` cookie the jar holds for the site origin
    pub fn session_cookie(&self) -> Option<String> {
        let cookies = self.site_cookies()?;
        cookies
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE_NAME)
            .map(|(_, value)| value.to_owned())
    }

    // Request carrying only the User-Agent, used against the login pages
    fn plain_request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.https_client
            .request(method, url)
            .header(USER_AGENT, self.user_agent.clone())
    }

    // Request decorated like the site's own ajax calls
    fn site_request(
        &self,
        method: Method,
        url: Url,
        user_id: Option<&str>,
    ) -> Result<RequestBuilder, PixivError> {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, self.referer.clone());
        if let Some(user_id) = user_id {
            headers.insert(X_USER_ID, HeaderValue::from_str(user_id)?);
        }
        Ok(self.plain_request(method, url).headers(headers))
    }

    /// Fetches a page as text
    pub async fn get_text(&self, url: &str) -> Result<String, PixivError> {
        let req_url = Url::parse(url)?;
        let resp = self
            .plain_request(Method::GET, req_url)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }

    /// Performs a get request against an ajax endpoint and decodes the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        user_id: Option<&str>,
    ) -> Result<T, PixivError> {
        let req_url = Url::parse(url)?;
        let resp = self
            .site_request(Method::GET, req_url, user_id)?
            .send()
            .await?
            .error_for_status()?;
        let body = resp.bytes().await?;
        serde_json::from_slice::<T>(&body).map_err(PixivError::ApiResponseMalformed)
    }

    /// Posts a URL encoded form and decodes the JSON body
    pub async fn post_form<F: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        form: &F,
        params: &ApiParams<'_>,
    ) -> Result<T, PixivError> {
        let req_url = Url::parse(url)?;
        let resp = self
            .plain_request(Method::POST, req_url)
            .query(params)
            .form(form)
            .send()
            .await?
            .error_for_status()?;
        let body = resp.bytes().await?;
        serde_json::from_slice::<T>(&body).map_err(PixivError::ApiResponseMalformed)
    }

    /// Issues a HEAD request for a file
    pub async fn head(&self, url: &str) -> Result<FileMetadata, PixivError> {
        let req_url = Url::parse(url)?;
        let resp = self
            .site_request(Method::HEAD, req_url, None)?
            .send()
            .await?
            .error_for_status()?;
        Ok(FileMetadata::from_headers(resp.status(), resp.headers()))
    }

    /// Downloads a file fully into memory
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes, PixivError> {
        let req_url = Url::parse(url)?;
        let resp = self
            .site_request(Method::GET, req_url, None)?
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.bytes().await?)
    }

    /// Downloads a file as a stream of chunks
    pub fn byte_stream<'a>(
        &'a self,
        url: &'a str,
    ) -> impl Stream<Item = Result<Bytes, PixivError>> + 'a {
        try_stream! {
            let req_url = Url::parse(url)?;
            let resp = self
                .site_request(Method::GET, req_url, None)?
                .send()
                .await?
                .error_for_status()?;
            let mut chunks = resp.bytes_stream();
            while let Some(chunk) = chunks.next().await {
                yield chunk?;
            }
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

/// Query parameters passed along with a request
pub type ApiParams<'a> = [(&'a str, &'a str)];

/// Envelope every ajax endpoint answers with.
///
/// The envelope is handed back as decoded; use [`ApiResponse::into_body`] to turn an
/// `error: true` answer into a [`PixivError`].
#[derive(Deserialize, Debug)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct ApiResponse<T> {
    #[serde(default, deserialize_with = "from_null_to_default")]
    pub error: bool,

    #[serde(default, deserialize_with = "from_null_to_default")]
    pub message: String,

    #[serde(default = "Option::default", deserialize_with = "from_api_body")]
    pub body: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Returns the body, or the error the API reported
    pub fn into_body(self) -> Result<T, PixivError> {
        if self.error {
            return Err(PixivError::ApiResponse(self.message));
        }
        self.body.ok_or(PixivError::ResponseMissing())
    }
}
