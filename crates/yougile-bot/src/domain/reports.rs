//! Report flow for calendar, governance and sprint requests.

use tracing::{error, info};

use crate::entities::ResultEnvelope;
use crate::errors::{BotResult, Failure};
use crate::extract::parse_model_json;
use crate::report::render_report;

/// Canned success message for a prompt key.
fn success_message(request_type: &str) -> &'static str {
    match request_type {
        "calendar_sync" => "Анализ календарной синхронизации выполнен",
        "governance" => "Проверка governance правил выполнена",
        "sprint_analytics" | "sprint" => "Аналитика спринта выполнена",
        _ => "Запрос обработан",
    }
}

/// Parse the model output and render the report for `request_type`.
pub fn build_report(raw: &str, request_type: &str) -> BotResult<ResultEnvelope> {
    let analysis = match parse_model_json(raw) {
        Ok(analysis) => analysis,
        Err(err) => {
            return match err.failure() {
                Failure::Recoverable(_, detail) => {
                    error!(request_type, error = %detail, "Failed to parse report JSON");
                    Ok(ResultEnvelope::parse_error(request_type, &detail, raw))
                }
                Failure::Fatal(..) => Err(err),
            };
        }
    };
    info!(request_type, "Report JSON extracted");

    let report = render_report(&analysis, request_type)?;
    Ok(ResultEnvelope::report(
        request_type,
        success_message(request_type),
        analysis,
        report,
    ))
}
