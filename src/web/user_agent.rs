/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use rand::seq::IndexedRandom;

/// Supplies the `User-Agent` used when [`crate::web::Options::user_agent`] is not set.
pub trait UserAgentProvider {
    fn user_agent(&self) -> String;
}

// Current desktop browsers on the three major platforms
const DESKTOP_USER_AGENTS: [&str; 6] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Picks a random desktop browser user agent each time it is asked
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopUserAgent;

impl UserAgentProvider for DesktopUserAgent {
    fn user_agent(&self) -> String {
        DESKTOP_USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(DESKTOP_USER_AGENTS[0])
            .to_owned()
    }
}

/// Always hands out the same user agent
#[derive(Debug, Clone)]
pub struct FixedUserAgent(pub String);

impl UserAgentProvider for FixedUserAgent {
    fn user_agent(&self) -> String {
        self.0.clone()
    }
}
