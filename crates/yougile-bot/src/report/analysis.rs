//! Report for a task-creation batch.

use std::fmt::Write as _;

use serde_json::Value;

use super::fields::{list, text};
use super::{write_banner, write_section, FRAME_BOTTOM};

const TITLE: &str = "║          ✅ ЗАДАЧИ СОЗДАНЫ В YOUGILE                        ║";

/// Render a serialized task batch envelope.
///
/// The tasks header is printed even when the batch is empty.
pub(super) fn render(data: &Value) -> String {
    let mut report = String::from("\n");
    write_banner(&mut report, TITLE);
    writeln!(
        report,
        "\n📊 Статус: {}",
        text(data, "status", "не определён").to_uppercase()
    )
    .ok();
    writeln!(report, "✅ Создано задач: {}", text(data, "tasks_created", "0")).ok();
    writeln!(report, "❌ Ошибок: {}\n", text(data, "tasks_failed", "0")).ok();

    write_section(&mut report, "📝 СОЗДАННЫЕ ЗАДАЧИ");
    report.push('\n');

    for (i, task) in list(data, "tasks").iter().enumerate() {
        let created = task.get("status").and_then(Value::as_str) == Some("created");
        let icon = if created { "✅" } else { "❌" };
        writeln!(
            report,
            "{}. {icon} {}",
            i + 1,
            text(task, "title", "Без названия")
        )
        .ok();
        if created {
            writeln!(report, "   🆔 YouGile ID: {}", text(task, "yougile_id", "None")).ok();
        } else {
            writeln!(report, "   ⚠️  Ошибка: {}", text(task, "error", "не указана")).ok();
        }
        report.push('\n');
    }

    writeln!(report, "\n{FRAME_BOTTOM}").ok();
    report
}
