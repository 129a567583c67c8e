#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::map_unwrap_or)]

//! # YouGile Bot
//!
//! Turns free-text project requests into YouGile tasks and readable reports
//! with the help of Yandex GPT.
//!
//! This crate provides:
//! - Prompt templates loaded from a JSON file
//! - A Yandex GPT completion client
//! - A YouGile task API client
//! - Lenient extraction of JSON from model output
//! - Sprint, governance, calendar and task-batch reports
//! - A serverless-style entry point, an HTTP server and a CLI
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use yougile_bot::{BotConfig, Dispatcher, PromptStore, Request, RequestType};
//!
//! let config = BotConfig::from_env();
//! let prompts = Arc::new(PromptStore::load(&config.prompts_path)?);
//! let dispatcher = Dispatcher::from_config(&config, prompts)?;
//!
//! let envelope = dispatcher
//!     .run(&Request::new(RequestType::Sprint, "Спринт 12"))
//!     .await;
//! println!("{}", envelope.to_json());
//! ```

// LLM completion integration
pub mod ai;

// Environment configuration
pub mod config;

// Request handling flows
pub mod domain;

// Core entities
pub mod entities;

// Error types
pub mod errors;

// JSON extraction from model output
pub mod extract;

// Serverless entry point
pub mod handler;

// Prompt templates
pub mod prompts;

// Human-readable reports
pub mod report;

// HTTP webhook server
pub mod server;

// Terminal UI helpers
pub mod ui;

// YouGile API client
pub mod yougile;

// Re-export key types for convenience
pub use ai::{AIMessage, AIResponse, CompletionProvider, GenerateOptions, YandexGptProvider};
pub use config::BotConfig;
pub use domain::Dispatcher;
pub use entities::{EnvelopeStatus, Request, RequestType, ResultEnvelope, TaskRecord};
pub use errors::{BotError, BotResult, ErrorKind, Failure};
pub use extract::{extract_json_from_markdown, parse_model_json};
pub use handler::{handle_event, normalize_event, HandlerResponse};
pub use prompts::PromptStore;
pub use report::render_report;
pub use yougile::{NewTask, TaskTracker, YouGileClient};
