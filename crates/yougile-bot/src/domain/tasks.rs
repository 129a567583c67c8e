//! Task creation flow for `analysis` requests.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::entities::{EnvelopeStatus, RequestType, ResultEnvelope, TaskRecord};
use crate::errors::{BotError, BotResult, Failure};
use crate::extract::parse_model_json;
use crate::report::render_report;
use crate::yougile::{NewTask, TaskTracker};

/// Message of the `warning` envelope produced when no column is configured.
pub const MISSING_COLUMN_MESSAGE: &str =
    "Задачи проанализированы, но не созданы (не указан YOUGILE_COLUMN_ID)";

/// Parse the model's analysis and create every task it lists.
///
/// Tasks are created one at a time, in the order they appear under
/// `epics[].tasks[]`. A failed task is recorded and the batch continues.
/// Without a `column_id` nothing is created and a `warning` envelope is
/// returned.
pub async fn create_tasks(
    tracker: &dyn TaskTracker,
    column_id: Option<&str>,
    raw: &str,
) -> BotResult<ResultEnvelope> {
    let request_type = RequestType::Analysis.as_str();

    let analysis = match parse_model_json(raw) {
        Ok(analysis) => analysis,
        Err(err) => {
            return match err.failure() {
                Failure::Recoverable(_, detail) => {
                    error!(error = %detail, "Failed to parse analysis JSON");
                    Ok(ResultEnvelope::parse_error(request_type, &detail, raw))
                }
                Failure::Fatal(..) => Err(err),
            };
        }
    };
    info!("Analysis JSON extracted");

    let Some(column_id) = column_id else {
        warn!("YOUGILE_COLUMN_ID is not set, tasks will not be created");
        let envelope = ResultEnvelope::task_batch(EnvelopeStatus::Warning, Vec::new(), analysis)
            .with_message(MISSING_COLUMN_MESSAGE);
        return with_report(envelope);
    };

    let mut records = Vec::new();
    for epic in epics(&analysis) {
        for entry in epic_tasks(epic) {
            records.push(create_one(tracker, entry, column_id).await);
        }
    }

    info!(total = records.len(), "Task batch processed");
    with_report(ResultEnvelope::task_batch(
        EnvelopeStatus::Success,
        records,
        analysis,
    ))
}

async fn create_one(tracker: &dyn TaskTracker, entry: &Value, column_id: &str) -> TaskRecord {
    let task_id = entry.get("task_id").cloned().unwrap_or(Value::Null);
    let title = entry
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string);

    let task = NewTask::from_entry(entry, column_id);
    match tracker.create_task(&task).await {
        Ok(created) => TaskRecord::created(task_id, title, created.id),
        Err(err) => {
            let reason = err.to_string();
            let failure = BotError::TaskCreation {
                title: task.title,
                reason: reason.clone(),
            };
            error!("{failure}");
            TaskRecord::failed(task_id, title, reason)
        }
    }
}

fn epics(analysis: &Value) -> &[Value] {
    analysis
        .get("epics")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn epic_tasks(epic: &Value) -> &[Value] {
    epic.get("tasks")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn with_report(mut envelope: ResultEnvelope) -> BotResult<ResultEnvelope> {
    let serialized = serde_json::to_value(&envelope)?;
    envelope.human_readable_report = Some(render_report(
        &serialized,
        RequestType::Analysis.as_str(),
    )?);
    Ok(envelope)
}
