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
use futures::{StreamExt, pin_mut};
use pixiv_web::web::{AuthData, Client, IllustType, Options};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

// Downloads every page of a work into the current directory.
// NOTE: ugoira are saved as their frame zip.
async fn download_pages(client: &Client, illust_id: &str) -> Result<()> {
    let details = client.illust_details(illust_id).await?.into_body()?;
    let kind: &'static str = details.illust_type.into();
    println!(
        "Found {}: {} by {} ({} pages)",
        kind, details.title, details.user_name, details.page_count
    );

    let urls = match details.illust_type {
        IllustType::Ugoira => {
            let meta = client.ugoira_meta_data(illust_id).await?.into_body()?;
            println!(
                "{} frames, {:?} per loop",
                meta.frames.len(),
                meta.total_duration()
            );
            vec![meta.original_src]
        }
        _ => client
            .illust_pages(illust_id)
            .await?
            .into_body()?
            .into_iter()
            .map(|page| page.urls.original)
            .collect(),
    };

    for url in urls {
        let file_name = url.rsplit('/').next().unwrap_or("download").to_string();
        let probe = client.poke_file(&url).await?;
        println!("Downloading {} ({:?} bytes)", file_name, probe.content_length);

        // Stream to disk so large zips are not held in memory
        let mut file = File::create(PathBuf::from(&file_name))?;
        let chunks = client.stream_file(&url);
        pin_mut!(chunks);
        while let Some(chunk) = chunks.next().await {
            file.write_all(&chunk?)?;
        }
    }
    Ok(())
}

// main
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    // The PHPSESSID cookie of a logged in browser session
    let session = std::env::var("PIXIV_SESSION")?;
    let illust_id = std::env::var("PIXIV_ILLUST_ID").unwrap_or_else(|_| "44298467".into());

    let mut client = Client::new(AuthData::from_cookie(&session), Options::default())?;
    let outcome = client.login(None).await?;
    if let Some(reason) = outcome.failure {
        anyhow::bail!(reason);
    }
    println!("Logged in as user {:?}", client.user_id());

    download_pages(&client, &illust_id).await
}
