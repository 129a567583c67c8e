//! Error types for the bot.

use thiserror::Error;

/// Broad category of a [`BotError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required environment value is absent.
    ConfigurationMissing,
    /// An external API answered with a non-2xx status.
    UpstreamHttp,
    /// The request never got an HTTP answer (connect error, timeout).
    Transport,
    /// An external API answered 2xx with an unexpected payload.
    ResponseShape,
    /// Model output is not JSON even after extraction.
    JsonDecode,
    /// A single task could not be created.
    PerTaskFailure,
    /// The prompt file is missing or malformed.
    PromptConfig,
    /// A report field has a type the renderer cannot default.
    Render,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// Recoverable kinds become envelopes or task records instead of
    /// failing the invocation.
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::JsonDecode | Self::PerTaskFailure)
    }
}

/// Classification of an error for the dispatcher and the entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Reported to the caller as a normal (200) outcome.
    Recoverable(ErrorKind, String),
    /// Escapes the invocation (500 at the entry point).
    Fatal(ErrorKind, String),
}

impl Failure {
    /// Human-readable detail.
    pub fn detail(&self) -> &str {
        match self {
            Self::Recoverable(_, detail) | Self::Fatal(_, detail) => detail,
        }
    }
}

/// Errors produced by the bot.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Missing required configuration: {key}")]
    ConfigurationMissing { key: String },

    #[error("{service} returned HTTP {status}: {body}")]
    UpstreamHttp {
        service: String,
        status: u16,
        body: String,
    },

    #[error("{service} request failed: {reason}")]
    Transport { service: String, reason: String },

    #[error("Unexpected {service} response: {reason}")]
    ResponseShape { service: String, reason: String },

    #[error("{reason}")]
    JsonDecode { reason: String },

    #[error("Task '{title}' was not created: {reason}")]
    TaskCreation { title: String, reason: String },

    #[error("Failed to load prompts from '{path}': {reason}")]
    PromptConfig { path: String, reason: String },

    #[error("Cannot render field '{field}': {reason}")]
    Render { field: String, reason: String },

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl BotError {
    /// Shorthand for [`BotError::ConfigurationMissing`].
    pub fn missing(key: impl Into<String>) -> Self {
        Self::ConfigurationMissing { key: key.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationMissing { .. } => ErrorKind::ConfigurationMissing,
            Self::UpstreamHttp { .. } => ErrorKind::UpstreamHttp,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::ResponseShape { .. } => ErrorKind::ResponseShape,
            Self::JsonDecode { .. } => ErrorKind::JsonDecode,
            Self::TaskCreation { .. } => ErrorKind::PerTaskFailure,
            Self::PromptConfig { .. } => ErrorKind::PromptConfig,
            Self::Render { .. } => ErrorKind::Render,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Classify this error as recoverable or fatal.
    pub fn failure(&self) -> Failure {
        let kind = self.kind();
        let detail = self.to_string();
        if kind.is_recoverable() {
            Failure::Recoverable(kind, detail)
        } else {
            Failure::Fatal(kind, detail)
        }
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for bot operations
pub type BotResult<T> = Result<T, BotError>;
