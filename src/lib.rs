//! Tutorial client for a hosted large-language-model API.
//!
//! [`openai::ClientHandle`] wraps the four request operations (chat
//! completion, embedding, image generation, responses). [`session`] drives
//! an interactive chat on top of it and [`demos`] replays the tutorial
//! walkthroughs.

pub mod commands;
pub mod config;
pub mod demos;
pub mod logging;
pub mod openai;
pub mod session;

/// Crate version with the git revision and build time baked in by `build.rs`.
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("OT_GIT_SHA"),
    ", built ",
    env!("OT_BUILD_TS"),
    ")"
);
