/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

extern crate pixiv_web;

use anyhow::Result;
use dotenvy::dotenv;
use pixiv_web::web::{AuthData, Client, Options};
use std::fs;
use std::path::PathBuf;

// Logs in with username/password once and keeps the session token in a file, later runs
// resume from that file instead of posting the login form again.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let cache = PathBuf::from(std::env::var("PIXIV_SESSION_CACHE")?);
    let options = Options {
        locale: Some("ja".into()),
        ..Default::default()
    };

    if let Ok(token) = fs::read_to_string(&cache) {
        let mut client = Client::new(AuthData::from_cookie(token.trim()), options.clone())?;
        let outcome = client.login(None).await?;
        if outcome.is_success() {
            println!("Resumed session for user {:?}", client.user_id());
            return Ok(());
        }
        println!("Cached session rejected: {:?}", outcome.failure);
    }

    let username = std::env::var("PIXIV_USERNAME")?;
    let password = std::env::var("PIXIV_PASSWORD")?;
    let mut client = Client::new(AuthData::from_credentials(&username, &password), options)?;
    let outcome = client.login(None).await?;
    if let Some(reason) = outcome.failure {
        anyhow::bail!(reason);
    }

    if let Some(token) = client.session_cookie() {
        fs::write(&cache, token)?;
        println!("Saved session to {}", cache.display());
    }
    Ok(())
}
