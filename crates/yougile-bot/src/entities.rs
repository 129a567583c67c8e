//! Core request and result types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of work requested from the bot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// Break a request into epics and tasks, create them in YouGile.
    #[default]
    Analysis,
    /// Calendar synchronisation analysis.
    Calendar,
    /// Governance rules check.
    Governance,
    /// Sprint analytics.
    Sprint,
}

impl RequestType {
    /// Parse a request type tag. Unknown tags fall back to `Analysis`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "calendar" => Self::Calendar,
            "governance" => Self::Governance,
            "sprint" => Self::Sprint,
            _ => Self::Analysis,
        }
    }

    /// Key of the prompt template for this request type.
    pub fn prompt_key(self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Calendar => "calendar_sync",
            Self::Governance => "governance",
            Self::Sprint => "sprint_analytics",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::Calendar => "calendar",
            Self::Governance => "governance",
            Self::Sprint => "sprint",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single invocation's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub request_type: RequestType,
    pub text: String,
}

impl Request {
    pub fn new(request_type: RequestType, text: impl Into<String>) -> Self {
        Self {
            request_type,
            text: text.into(),
        }
    }

    /// Build a request from a loosely-typed JSON object.
    ///
    /// Missing `type` means `analysis`, missing `text` means empty text.
    pub fn from_value(value: &Value) -> Self {
        let request_type = value
            .get("type")
            .and_then(Value::as_str)
            .map(RequestType::from_tag)
            .unwrap_or_default();
        let text = value
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self { request_type, text }
    }
}

/// Outcome of creating one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskRecordStatus {
    Created,
    Failed,
}

/// Result of one task-creation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Id assigned by the model, passed through as-is.
    pub task_id: Value,
    pub title: Option<String>,
    pub status: TaskRecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yougile_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskRecord {
    pub fn created(task_id: Value, title: Option<String>, yougile_id: Value) -> Self {
        Self {
            task_id,
            title,
            status: TaskRecordStatus::Created,
            yougile_id: Some(yougile_id),
            error: None,
        }
    }

    pub fn failed(task_id: Value, title: Option<String>, error: impl Into<String>) -> Self {
        Self {
            task_id,
            title,
            status: TaskRecordStatus::Failed,
            yougile_id: None,
            error: Some(error.into()),
        }
    }

    pub fn is_created(&self) -> bool {
        self.status == TaskRecordStatus::Created
    }
}

/// Overall status of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Warning,
    Error,
}

impl EnvelopeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Maximum number of raw model characters echoed back on a parse error.
pub const RAW_RESPONSE_LIMIT: usize = 500;

/// The bot's only output artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub status: EnvelopeStatus,
    pub request_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks_created: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks_failed: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskRecord>>,
    /// Parsed model output of an `analysis` request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpt_analysis: Option<Value>,
    /// Parsed model output of the other request types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_readable_report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl ResultEnvelope {
    fn with_status(status: EnvelopeStatus, request_type: impl Into<String>) -> Self {
        Self {
            status,
            request_type: request_type.into(),
            message: None,
            tasks_created: None,
            tasks_failed: None,
            tasks: None,
            gpt_analysis: None,
            analysis: None,
            human_readable_report: None,
            raw_response: None,
        }
    }

    /// An `error` envelope with a message.
    pub fn error(request_type: impl Into<String>, message: impl Into<String>) -> Self {
        let mut envelope = Self::with_status(EnvelopeStatus::Error, request_type);
        envelope.message = Some(message.into());
        envelope
    }

    /// An `error` envelope for model output that would not parse.
    ///
    /// Only the first [`RAW_RESPONSE_LIMIT`] characters of `raw` are kept.
    pub fn parse_error(request_type: impl Into<String>, detail: &str, raw: &str) -> Self {
        let mut envelope = Self::error(request_type, format!("Ошибка парсинга: {detail}"));
        envelope.raw_response = Some(raw.chars().take(RAW_RESPONSE_LIMIT).collect());
        envelope
    }

    /// Envelope for an `analysis` request, counts derived from `tasks`.
    pub fn task_batch(status: EnvelopeStatus, tasks: Vec<TaskRecord>, analysis: Value) -> Self {
        let created = tasks.iter().filter(|t| t.is_created()).count();
        let mut envelope = Self::with_status(status, RequestType::Analysis.as_str());
        envelope.tasks_created = Some(created);
        envelope.tasks_failed = Some(tasks.len() - created);
        envelope.tasks = Some(tasks);
        envelope.gpt_analysis = Some(analysis);
        envelope
    }

    /// `success` envelope for the report-only request types.
    pub fn report(
        request_type: impl Into<String>,
        message: impl Into<String>,
        analysis: Value,
        report: String,
    ) -> Self {
        let mut envelope = Self::with_status(EnvelopeStatus::Success, request_type);
        envelope.message = Some(message.into());
        envelope.analysis = Some(analysis);
        envelope.human_readable_report = Some(report);
        envelope
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Serialize as pretty-printed JSON, non-ASCII kept verbatim.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!(r#"{{"status": "error", "message": "serialization failed: {e}"}}"#)
        })
    }
}
