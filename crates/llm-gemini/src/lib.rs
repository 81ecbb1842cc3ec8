//! Google Gemini client used by the bot to generate replies.
//!
//! Wraps a single `generateContent` call: system instruction, prior turns,
//! the live user message, sampling parameters and safety thresholds go in,
//! the text of the first candidate comes out.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{ChatRequest, GeminiClient};
pub use config::GeminiConfig;
pub use error::{GeminiError, Result};
pub use types::{GenerationConfig, HarmBlockThreshold, HarmCategory, SafetySetting};
