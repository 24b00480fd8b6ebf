//! OpenAI-compatible provider implementation
//!
//! This module provides a client for OpenAI's chat completions API and for
//! any server that speaks the same protocol under a different base URL.

pub mod client;
pub mod mapper;
pub mod types;

// Re-export commonly used types
pub use client::{OpenAiClient, OpenAiConfig, OPENAI_BASE_URL};
