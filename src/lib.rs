/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

//! # pixiv-web
//!
//! This library talks to the ajax API that the pixiv website itself uses.
//!
//! The API is undocumented and meant for browsers, so the client behaves like one: it
//! keeps a cookie jar, sends a desktop `User-Agent` and `Referer`, and adds the
//! `X-User-Id` header once it knows who is logged in.
//!
//! ## Features
//!
//! - Login
//!     - Resume a session from a `PHPSESSID` cookie
//!     - Log in through the accounts form with username and password
//! - Illustration details
//! - Page image urls of a work
//! - Ugoira (animation) metadata
//! - Probing and downloading image files
//!
//! *Form login is often answered with a captcha challenge. Reusing a session cookie taken
//! from a browser is the reliable way in.*
//!
//! ## Installation
//!
//! ```toml
//! [dependencies]
//! pixiv-web = "0.1.0"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pixiv_web::web::{AuthData, Client, Options};
//!
//!async fn download_first_page(session: &str, illust_id: u64) -> anyhow::Result<Vec<u8>> {
//!    // The session value is the PHPSESSID cookie of a logged in browser
//!    let mut client = Client::new(AuthData::from_cookie(session), Options::default())?;
//!
//!    let outcome = client.login(None).await?;
//!    if let Some(reason) = outcome.failure {
//!        anyhow::bail!(reason);
//!    }
//!
//!    // Details of the work
//!    let details = client.illust_details(illust_id).await?.into_body()?;
//!    println!("{} by {}", details.title, details.user_name);
//!
//!    // Urls of every page, then download the first original
//!    let pages = client.illust_pages(illust_id).await?.into_body()?;
//!    let Some(first) = pages.first() else {
//!        anyhow::bail!("work has no pages");
//!    };
//!    Ok(client.get_file(&first.urls.original).await?.to_vec())
//!}
//! ```
//!
pub mod web;
