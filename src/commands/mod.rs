//! Subcommand implementations shared by the `oaitutor` and `oaichat` binaries.

pub mod ask;
pub mod chat;
pub mod config;
pub mod demo;
pub mod embed;
pub mod image;
pub mod respond;
pub mod shared;
