/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use serde::Deserialize;
use std::time::Duration;

/// Holds information returned from the `/ajax/illust/{id}/ugoira_meta` endpoint.
///
/// `src` and `original_src` point at zip archives holding one image per frame.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UgoiraMetaData {
    pub frames: Vec<UgoiraFrame>,

    #[serde(rename = "mime_type")]
    pub mime_type: String,

    pub original_src: String,
    pub src: String,
}

impl UgoiraMetaData {
    /// Play time of a single loop of the animation
    pub fn total_duration(&self) -> Duration {
        self.frames.iter().map(UgoiraFrame::duration).sum()
    }
}

/// A frame file inside the ugoira zip and how long it stays on screen
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UgoiraFrame {
    pub file: String,

    /// Milliseconds
    pub delay: u64,
}

impl UgoiraFrame {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.delay)
    }
}
