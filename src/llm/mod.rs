//! LLM integration module
//!
//! This module provides the provider abstraction used to turn questions into
//! SQL, and the parser for the text that comes back.

pub mod client;
pub mod parser;
pub mod prompt;
pub mod provider;

// Provider implementations
pub mod providers {
    pub mod openai;
}

// Re-exports
pub use parser::{parse_response, ParsedResponse};
pub use provider::{GenerationParams, LLMProvider, LLMResponse, Message, MessageRole};
