// ABOUTME: LLM module - client abstraction for the language model provider.
// ABOUTME: Defines types, the client trait, and the OpenRouter implementation.

mod client;
mod openai;
mod openrouter;
mod types;

pub use client::*;
pub use openai::*;
pub use openrouter::*;
pub use types::*;
