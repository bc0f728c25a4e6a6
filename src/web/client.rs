/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use crate::web::errors::PixivError;
use crate::web::user_agent::{DesktopUserAgent, UserAgentProvider};
use crate::web::{
    ApiClient, ApiResponse, AuthData, Endpoints, FileMetadata, IllustDetails, IllustPage,
    LoginOutcome, SessionAuthenticator, UgoiraMetaData,
};
use bytes::Bytes;
use futures::Stream;
use std::fmt::Display;

/// Locale used when [`Options::locale`] is not set
pub const DEFAULT_LOCALE: &str = "en";

/// Client settings, each one defaulted on its own when the client is built
#[derive(Debug, Default, Clone)]
pub struct Options {
    pub user_agent: Option<String>,
    pub locale: Option<String>,
}

/// Entry point for talking to pixiv.
///
/// ```no_run
/// use pixiv_web::web::{AuthData, Client, Options};
///
/// async fn first_page(session: &str) -> Result<String, pixiv_web::web::PixivError> {
///     let mut client = Client::new(AuthData::from_cookie(session), Options::default())?;
///     client.login(None).await?;
///     let pages = client.illust_pages(44298467).await?.into_body()?;
///     Ok(pages[0].urls.original.clone())
/// }
/// ```
#[derive(Debug)]
pub struct Client {
    api_client: ApiClient,
    authenticator: SessionAuthenticator,
}

impl Client {
    /// Creates a client for pixiv with a random desktop user agent (unless one is set).
    ///
    /// A session cookie in `auth` is placed in the cookie jar right away.
    pub fn new(auth: AuthData, options: Options) -> Result<Self, PixivError> {
        Self::with_config(auth, options, Endpoints::default(), &DesktopUserAgent)
    }

    /// Creates a client against custom endpoints and with a custom user agent source
    pub fn with_config(
        auth: AuthData,
        options: Options,
        endpoints: Endpoints,
        user_agents: &dyn UserAgentProvider,
    ) -> Result<Self, PixivError> {
        let user_agent = options
            .user_agent
            .unwrap_or_else(|| user_agents.user_agent());
        let locale = options.locale.unwrap_or_else(|| DEFAULT_LOCALE.into());

        let api_client = ApiClient::new(&user_agent, endpoints)?;
        if let Some(cookie) = &auth.cookie {
            api_client.install_session_cookie(cookie)?;
        }

        Ok(Self {
            api_client,
            authenticator: SessionAuthenticator::new(auth, &locale),
        })
    }

    /// Logs in, see [`SessionAuthenticator::login`]
    pub async fn login(&mut self, auth: Option<AuthData>) -> Result<LoginOutcome, PixivError> {
        self.authenticator.login(&self.api_client, auth).await
    }

    /// Id of the logged in user, found during cookie login
    pub fn user_id(&self) -> Option<&str> {
        self.authenticator.user_id()
    }

    /// Current session token, suitable for [`AuthData::from_cookie`] in a later run
    pub fn session_cookie(&self) -> Option<String> {
        self.api_client.session_cookie()
    }

    /// All cookies that would be sent to the site origin
    pub fn site_cookies(&self) -> Option<String> {
        self.api_client.site_cookies()
    }

    pub fn user_agent(&self) -> &str {
        self.api_client.user_agent()
    }

    pub fn locale(&self) -> &str {
        self.authenticator.locale()
    }

    pub fn auth_data(&self) -> &AuthData {
        self.authenticator.auth_data()
    }

    fn ajax_url(&self, id: impl Display, suffix: &str) -> String {
        let id = id.to_string();
        format!(
            "{}/illust/{}{}",
            self.api_client.endpoints().web_api,
            urlencoding::encode(&id),
            suffix
        )
    }

    /// Returns the details of an illustration, manga or ugoira
    pub async fn illust_details(
        &self,
        id: impl Display,
    ) -> Result<ApiResponse<IllustDetails>, PixivError> {
        let url = self.ajax_url(id, "");
        self.api_client.get_json(&url, self.user_id()).await
    }

    /// Returns the image urls of every page of a work
    pub async fn illust_pages(
        &self,
        id: impl Display,
    ) -> Result<ApiResponse<Vec<IllustPage>>, PixivError> {
        let url = self.ajax_url(id, "/pages");
        self.api_client.get_json(&url, self.user_id()).await
    }

    /// Returns the frame timings and archive urls of an ugoira
    pub async fn ugoira_meta_data(
        &self,
        id: impl Display,
    ) -> Result<ApiResponse<UgoiraMetaData>, PixivError> {
        let url = self.ajax_url(id, "/ugoira_meta");
        self.api_client.get_json(&url, self.user_id()).await
    }

    /// Checks a file without downloading it
    pub async fn poke_file(&self, url: &str) -> Result<FileMetadata, PixivError> {
        self.api_client.head(url).await
    }

    /// Downloads a file into memory
    pub async fn get_file(&self, url: &str) -> Result<Bytes, PixivError> {
        self.api_client.get_bytes(url).await
    }

    /// Downloads a file chunk by chunk
    pub fn stream_file<'a>(
        &'a self,
        url: &'a str,
    ) -> impl Stream<Item = Result<Bytes, PixivError>> + 'a {
        self.api_client.byte_stream(url)
    }
}
