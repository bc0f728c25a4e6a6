/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::web::IllustType;
use serde::de::{DeserializeOwned, Error};
use serde::Deserialize;

// Parses illust type, unknown codes become IllustType::Unknown
pub fn from_illust_type<'de, D>(deserializer: D) -> Result<IllustType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let code: u8 = Deserialize::deserialize(deserializer)?;
    Ok(IllustType::try_from(code).unwrap_or(IllustType::Unknown))
}

// Parses strings that may be "" and sets to None
pub fn from_empty_str_to_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.is_empty()))
}

// Parses a field that may be null and sets it to its default
pub fn from_null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let v: Option<T> = Deserialize::deserialize(deserializer)?;
    Ok(v.unwrap_or_default())
}

// Parses an ajax `body`. Error answers carry `[]` there, which becomes None.
pub fn from_api_body<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let is_empty_array = value.as_array().is_some_and(Vec::is_empty);
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value::<T>(value) {
        Ok(body) => Ok(Some(body)),
        Err(_) if is_empty_array => Ok(None),
        Err(err) => Err(D::Error::custom(err)),
    }
}
