// Runtime configuration for the binary
pub mod settings;

// LLM abstraction layer
pub mod llm;
