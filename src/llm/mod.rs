//! Remote language-model access.

pub mod client;

pub use client::{CompletionClient, HttpCompletionClient, TEMPERATURE, TOP_P, parse_chat_response};
