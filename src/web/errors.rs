/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

use thiserror::Error;

/// Error conditions that can be returned
///
/// A rejected login is not an error, see [`crate::web::LoginOutcome`].
#[derive(Error, Debug)]
pub enum PixivError {
    #[error("Request network error")]
    Request(#[from] reqwest::Error),

    #[error("URL Parse error")]
    UrlParsing(#[from] url::ParseError),

    #[error("Invalid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("HTML selector error: {0}")]
    HtmlSelector(String),

    #[error("Expected response missing")]
    ResponseMissing(),

    #[error("API Response was error, msg: {0}")]
    ApiResponse(String),

    #[error("API Response is malformed: {0:?}")]
    ApiResponseMalformed(serde_json::Error),
}
