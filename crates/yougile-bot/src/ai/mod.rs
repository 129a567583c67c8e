//! LLM completion integration.
//!
//! This module provides:
//! - The `CompletionProvider` abstraction
//! - The Yandex GPT implementation

pub mod provider;
pub mod yandex;

pub use provider::{AIMessage, AIResponse, AIRole, CompletionProvider, GenerateOptions, TokenUsage};
pub use yandex::YandexGptProvider;
