/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::web::parsers::{from_empty_str_to_none, from_illust_type};
use chrono::{DateTime, FixedOffset};
use num_enum::TryFromPrimitive;
use serde::Deserialize;
use strum_macros::IntoStaticStr;

/// Kind of work, as the numeric `illustType` code
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoStaticStr)]
#[repr(u8)]
pub enum IllustType {
    Illustration = 0,
    Manga = 1,
    Ugoira = 2,
    Unknown = 255,
}

/// Holds information returned from the `/ajax/illust/{id}` endpoint.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct IllustDetails {
    pub illust_id: String,
    pub illust_title: String,

    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pub illust_comment: Option<String>,

    pub id: String,
    pub title: String,

    #[serde(default, deserialize_with = "from_empty_str_to_none")]
    pub description: Option<String>,

    #[serde(deserialize_with = "from_illust_type")]
    pub illust_type: IllustType,

    pub create_date: DateTime<FixedOffset>,
    pub upload_date: DateTime<FixedOffset>,

    pub urls: IllustUrls,

    pub user_id: String,
    pub user_name: String,
    pub user_account: String,

    pub width: u32,
    pub height: u32,

    #[serde(default)]
    pub page_count: u32,

    #[serde(default)]
    pub like_count: u64,

    #[serde(default)]
    pub view_count: u64,

    #[serde(default)]
    pub is_original: bool,

    // Free form, only `meta` is of interest and its content changes often
    #[serde(default)]
    pub extra_data: serde_json::Value,
}

/// Image urls of the first page. Fields are null for works the session may not view.
#[derive(Deserialize, Debug, Clone)]
pub struct IllustUrls {
    pub mini: Option<String>,
    pub thumb: Option<String>,
    pub small: Option<String>,
    pub regular: Option<String>,
    pub original: Option<String>,
}

/// One entry of the `/ajax/illust/{id}/pages` endpoint
#[derive(Deserialize, Debug, Clone)]
pub struct IllustPage {
    pub urls: PageUrls,
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PageUrls {
    pub thumb_mini: String,
    pub small: String,
    pub regular: String,
    pub original: String,
}
