/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use chrono::{DateTime, FixedOffset};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, LAST_MODIFIED};

/// What a HEAD request revealed about a file (usually an `i.pximg.net` image or ugoira zip)
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    pub status: u16,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub last_modified: Option<DateTime<FixedOffset>>,
}

impl FileMetadata {
    pub(crate) fn from_headers(status: StatusCode, headers: &HeaderMap) -> Self {
        let header_str = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok());
        Self {
            status: status.as_u16(),
            content_length: header_str(CONTENT_LENGTH).and_then(|v| v.parse().ok()),
            content_type: header_str(CONTENT_TYPE).map(str::to_owned),
            // HTTP dates are RFC 2822 compatible ("Wed, 21 Oct 2015 07:28:00 GMT")
            last_modified: header_str(LAST_MODIFIED)
                .and_then(|v| DateTime::parse_from_rfc2822(v).ok()),
        }
    }
}
