//! Core abstractions for the LLM layer

pub mod capability;
pub mod config;
pub mod context;
pub mod error;
pub mod provider;
pub mod types;
