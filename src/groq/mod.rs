// Groq API module.
// Provides the completion client seam and the chat completions wire types.

pub mod client;
pub mod types;

pub use client::{CompletionClient, GroqClient};
