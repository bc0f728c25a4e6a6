/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

pub mod api;
pub mod auth;
pub mod client;
pub mod errors;
pub mod file;
pub mod illust;
mod parsers;
pub mod session;
pub mod ugoira;
pub mod user_agent;

pub use api::*;
pub use auth::*;
pub use client::*;
pub use errors::*;
pub use file::*;
pub use illust::*;
pub use ugoira::*;
pub use user_agent::*;
