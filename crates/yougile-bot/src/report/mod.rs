//! Human-readable reports.
//!
//! [`render_report`] turns a parsed analysis into the text shown to people.
//! Known request types get a decorated layout; anything else is
//! pretty-printed JSON. The exact text (frames, emoji, labels) is a
//! presentation detail, not something callers should parse.

mod analysis;
pub mod fields;
mod sprint;

use std::fmt::Write as _;

use serde_json::Value;

use crate::errors::BotResult;

pub(crate) const FRAME_TOP: &str =
    "╔══════════════════════════════════════════════════════════════╗";
pub(crate) const FRAME_BOTTOM: &str =
    "╚══════════════════════════════════════════════════════════════╝";
pub(crate) const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

const GOVERNANCE_TITLE: &str = "║          🔍 ПРОВЕРКА СООТВЕТСТВИЯ ПРАВИЛАМ                  ║";
const CALENDAR_TITLE: &str = "║          📅 СИНХРОНИЗАЦИЯ С КАЛЕНДАРЁМ                      ║";

/// Render `payload` as a report for `request_type`.
///
/// Fails only when a field has a type that cannot be defaulted, such as a
/// non-numeric `load_ratio` in a sprint report.
pub fn render_report(payload: &Value, request_type: &str) -> BotResult<String> {
    match request_type {
        "sprint_analytics" | "sprint" => sprint::render(payload),
        "analysis" => Ok(analysis::render(payload)),
        "governance" => Ok(render_wrapped(
            payload,
            GOVERNANCE_TITLE,
            "Статус проверки: ВЫПОЛНЕНА",
        )),
        "calendar_sync" | "calendar" => {
            Ok(render_wrapped(payload, CALENDAR_TITLE, "Статус: ВЫПОЛНЕНА"))
        }
        _ => Ok(pretty_json(payload)),
    }
}

/// Indented JSON, input key order preserved.
pub fn pretty_json(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

/// Opening frame with a title line.
pub(crate) fn write_banner(out: &mut String, title: &str) {
    writeln!(out, "{FRAME_TOP}\n{title}\n{FRAME_BOTTOM}").ok();
}

/// Section heading between two rules.
pub(crate) fn write_section(out: &mut String, title: &str) {
    writeln!(out, "{RULE}\n{title}\n{RULE}").ok();
}

/// Frame around the verbatim payload, used by governance and calendar.
fn render_wrapped(payload: &Value, title: &str, status_line: &str) -> String {
    let mut report = String::from("\n");
    write_banner(&mut report, title);
    writeln!(report, "\n{status_line}\n").ok();
    writeln!(report, "{}\n", pretty_json(payload)).ok();
    writeln!(report, "{FRAME_BOTTOM}").ok();
    report
}
