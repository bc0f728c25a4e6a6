/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! Reading session state out of the pixiv home page.
//!
//! pixiv has no endpoint that answers "who am I" for a browser session, so both the
//! logged in check and the user id come from scanning the markup and inline scripts of
//! the landing page. Older and newer page variants embed the same facts differently,
//! hence several patterns for each.

use log::debug;
use regex::Regex;
use std::sync::LazyLock;

/// Text fragments that only appear on the home page of a logged in session
pub const SESSION_MARKERS: [&str; 4] = [
    "logout.php",
    "pixiv.user.loggedIn = true",
    "_gaq.push(['_setCustomVar', 1, 'login', 'yes'",
    "var dataLayer = [{ login: 'yes',",
];

/// Returns true if the page carries any marker of a logged in session
pub fn is_logged_in(body: &str) -> bool {
    SESSION_MARKERS.iter().any(|marker| body.contains(marker))
}

/// A single way of pulling the user id out of a page
pub type UserIdStrategy = fn(&str) -> Option<String>;

/// Strategies in the order they are tried. The first one to find an id wins.
pub const USER_ID_STRATEGIES: [(&str, UserIdStrategy); 3] = [
    ("inline script", user_id_from_script),
    ("analytics custom var", user_id_from_analytics),
    ("data layer", user_id_from_data_layer),
];

#[allow(clippy::expect_used)]
static SCRIPT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"pixiv\.user\.id = "(?<id>\d+)";"#).expect("script regex is valid")
});

#[allow(clippy::expect_used)]
static ANALYTICS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"_gaq\.push\(\['_setCustomVar', 6, 'user_id', "(?<id>\d+)", 1\]\);"#)
        .expect("analytics regex is valid")
});

// `.` stops at line breaks so the id has to sit on the dataLayer line
#[allow(clippy::expect_used)]
static DATA_LAYER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"var dataLayer = .*user_id: "(?<id>\d+)""#).expect("data layer regex is valid")
});

fn capture_id(pattern: &Regex, body: &str) -> Option<String> {
    pattern
        .captures(body)
        .and_then(|c| c.name("id"))
        .map(|m| m.as_str().to_owned())
}

/// `pixiv.user.id = "123";`
pub fn user_id_from_script(body: &str) -> Option<String> {
    capture_id(&SCRIPT_PATTERN, body)
}

/// `_gaq.push(['_setCustomVar', 6, 'user_id', "123", 1]);`
pub fn user_id_from_analytics(body: &str) -> Option<String> {
    capture_id(&ANALYTICS_PATTERN, body)
}

/// `var dataLayer = [{ ..., user_id: "123", ... }];`
pub fn user_id_from_data_layer(body: &str) -> Option<String> {
    capture_id(&DATA_LAYER_PATTERN, body)
}

/// Runs [`USER_ID_STRATEGIES`] in order and returns the first id found
pub fn find_user_id(body: &str) -> Option<String> {
    USER_ID_STRATEGIES.iter().find_map(|(name, strategy)| {
        let id = strategy(body)?;
        debug!("Found user id using the {name} pattern");
        Some(id)
    })
}
