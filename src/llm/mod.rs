pub mod client;
pub mod messages;

pub use client::{GeminiClient, TextGenerationError, TextGenerator};
pub use messages::{GenerateRequest, GenerateResponse};
