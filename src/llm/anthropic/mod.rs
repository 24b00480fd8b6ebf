//! Anthropic provider implementation
//!
//! This module provides a client for Anthropic Claude models through the
//! Messages API.

pub mod client;
pub mod mapper;
pub mod types;

// Re-export commonly used types
pub use client::{AnthropicClient, AnthropicConfig, ANTHROPIC_BASE_URL};
