//! Sprint analytics report.

use std::fmt::Write as _;

use serde_json::Value;

use super::fields::{display, list, object, text, NOT_AVAILABLE};
use super::{write_banner, write_section, FRAME_BOTTOM, FRAME_TOP};
use crate::errors::{BotError, BotResult};

const TITLE: &str = "║          📊 ОТЧЁТ ПО СПРИНТУ - ФИТОGUIDE                    ║";
const FOOTER: &str = "║                    КОНЕЦ ОТЧЁТА                             ║";

pub(super) fn render(data: &Value) -> BotResult<String> {
    let summary = object(data, "executive_summary");
    let flow = object(data, "flow_metrics");
    let team = object(data, "team_performance");
    let actions = object(data, "actionable_recommendations");

    let mut report = String::from("\n");
    write_banner(&mut report, TITLE);
    writeln!(
        report,
        "\n📅 Дата анализа: {}",
        text(object(data, "analysis_metadata"), "analysis_date", "не указана")
    )
    .ok();
    writeln!(
        report,
        "🎯 Здоровье спринта: {}/100",
        text(summary, "sprint_health_score", NOT_AVAILABLE)
    )
    .ok();
    writeln!(
        report,
        "📈 Статус: {}\n",
        text(summary, "overall_status", "не определён").to_uppercase()
    )
    .ok();

    write_section(&mut report, "🎉 ДОСТИЖЕНИЯ");
    for achievement in list(summary, "key_achievements") {
        writeln!(report, "  ✓ {}", display(achievement)).ok();
    }

    report.push('\n');
    write_section(&mut report, "⚠️  КРИТИЧЕСКИЕ РИСКИ");
    for risk in list(summary, "critical_risks") {
        writeln!(report, "  ⚡ {}", display(risk)).ok();
    }

    write_metrics(&mut report, flow, team);
    write_workload(&mut report, object(team, "workload_distribution"))?;
    write_bottlenecks(&mut report, object(flow, "cumulative_flow"));
    write_actions(&mut report, actions);
    write_retrospective(&mut report, list(data, "retrospective_topics"));

    writeln!(report, "\n{FRAME_TOP}\n{FOOTER}\n{FRAME_BOTTOM}").ok();
    Ok(report)
}

fn write_metrics(report: &mut String, flow: &Value, team: &Value) {
    let burn_down = object(flow, "burn_down");

    report.push('\n');
    write_section(report, "📊 МЕТРИКИ ВЫПОЛНЕНИЯ");
    writeln!(
        report,
        "  Запланировано:  {} Story Points",
        text(burn_down, "planned_sp", NOT_AVAILABLE)
    )
    .ok();
    writeln!(
        report,
        "  Выполнено:      {} Story Points",
        text(burn_down, "actual_sp", NOT_AVAILABLE)
    )
    .ok();
    writeln!(
        report,
        "  Осталось:       {} Story Points",
        text(burn_down, "remaining_sp", NOT_AVAILABLE)
    )
    .ok();
    writeln!(
        report,
        "  Процент:        {}%\n",
        text(burn_down, "completion_percentage", NOT_AVAILABLE)
    )
    .ok();
    writeln!(
        report,
        "  Производительность команды: {} SP",
        text(object(team, "velocity_analysis"), "current_velocity", NOT_AVAILABLE)
    )
    .ok();
    writeln!(
        report,
        "  Скорость потока: {} задач/день",
        text(object(flow, "cumulative_flow"), "throughput", NOT_AVAILABLE)
    )
    .ok();
    writeln!(
        report,
        "  Среднее время выполнения: {} дней\n",
        text(object(flow, "cycle_time_analysis"), "average_cycle_time", NOT_AVAILABLE)
    )
    .ok();
}

fn write_workload(report: &mut String, workload: &Value) -> BotResult<()> {
    write_section(report, "👥 АНАЛИЗ НАГРУЗКИ КОМАНДЫ");

    let overloaded = list(workload, "overloaded_members");
    if !overloaded.is_empty() {
        report.push_str("\n  🔴 ПЕРЕГРУЖЕНЫ:\n");
        for member in overloaded {
            writeln!(
                report,
                "    • {} ({})",
                text(member, "member", NOT_AVAILABLE),
                text(member, "role", NOT_AVAILABLE)
            )
            .ok();
            writeln!(
                report,
                "      Нагрузка: {} SP (норма: {} SP)",
                text(member, "current_load_sp", NOT_AVAILABLE),
                text(member, "recommended_load_sp", NOT_AVAILABLE)
            )
            .ok();
            writeln!(report, "      Перегрузка: {}%", overload_percent(member)?).ok();
        }
    }

    let underutilized = list(workload, "underutilized_members");
    if !underutilized.is_empty() {
        report.push_str("\n  🟢 ОПТИМАЛЬНАЯ НАГРУЗКА:\n");
        for member in underutilized {
            writeln!(
                report,
                "    • {} ({}) - {} SP",
                text(member, "member", NOT_AVAILABLE),
                text(member, "role", NOT_AVAILABLE),
                text(member, "current_load_sp", NOT_AVAILABLE)
            )
            .ok();
        }
    }

    Ok(())
}

/// `round((load_ratio - 1) * 100)`; a missing ratio counts as 1.
///
/// Non-numeric ratios are an error rather than a silent zero.
fn overload_percent(member: &Value) -> BotResult<i64> {
    let ratio = match member.get("load_ratio") {
        None | Some(Value::Null) => 1.0,
        Some(value) => value.as_f64().ok_or_else(|| BotError::Render {
            field: "load_ratio".to_string(),
            reason: format!("expected a number, got {value}"),
        })?,
    };

    #[allow(clippy::cast_possible_truncation)]
    let percent = ((ratio - 1.0) * 100.0).round() as i64;
    Ok(percent)
}

fn write_bottlenecks(report: &mut String, cumulative_flow: &Value) {
    let bottlenecks = list(cumulative_flow, "bottlenecks");
    if bottlenecks.is_empty() {
        return;
    }

    report.push('\n');
    write_section(report, "🚧 УЗКИЕ МЕСТА В ПРОЦЕССЕ");
    for bottleneck in bottlenecks {
        writeln!(report, "  • Этап: {}", text(bottleneck, "stage", NOT_AVAILABLE)).ok();
        writeln!(
            report,
            "    Среднее время ожидания: {} дней",
            text(bottleneck, "avg_wait_time_days", NOT_AVAILABLE)
        )
        .ok();
        writeln!(
            report,
            "    Задач в работе: {}",
            text(bottleneck, "wip_count", NOT_AVAILABLE)
        )
        .ok();
        writeln!(
            report,
            "    Причина: {}\n",
            text(bottleneck, "evidence", NOT_AVAILABLE)
        )
        .ok();
    }
}

fn write_actions(report: &mut String, actions: &Value) {
    let immediate = list(actions, "immediate_actions");
    if !immediate.is_empty() {
        report.push('\n');
        write_section(report, "🎯 СРОЧНЫЕ ДЕЙСТВИЯ (СДЕЛАТЬ СЕГОДНЯ)");
        for (i, action) in immediate.iter().enumerate() {
            writeln!(report, "  {}. {}", i + 1, text(action, "action", NOT_AVAILABLE)).ok();
            writeln!(
                report,
                "     👤 Ответственный: {}",
                text(action, "owner", NOT_AVAILABLE)
            )
            .ok();
            writeln!(
                report,
                "     📅 Дедлайн: {}",
                text(action, "deadline", NOT_AVAILABLE)
            )
            .ok();
            writeln!(
                report,
                "     💡 Эффект: {}\n",
                text(action, "expected_impact", NOT_AVAILABLE)
            )
            .ok();
        }
    }

    let short_term = list(actions, "short_term_improvements");
    if !short_term.is_empty() {
        report.push('\n');
        write_section(report, "💡 УЛУЧШЕНИЯ НА БЛИЖАЙШИЕ ДНИ");
        for (i, improvement) in short_term.iter().enumerate() {
            writeln!(
                report,
                "  {}. {}",
                i + 1,
                text(improvement, "improvement", NOT_AVAILABLE)
            )
            .ok();
            writeln!(
                report,
                "     ⏱️  Время внедрения: {}",
                text(improvement, "implementation_time", NOT_AVAILABLE)
            )
            .ok();
            writeln!(
                report,
                "     📈 Эффект: {}",
                text(improvement, "impact", NOT_AVAILABLE)
            )
            .ok();
            writeln!(
                report,
                "     💬 Зачем: {}\n",
                text(improvement, "rationale", NOT_AVAILABLE)
            )
            .ok();
        }
    }
}

fn write_retrospective(report: &mut String, topics: &[Value]) {
    if topics.is_empty() {
        return;
    }

    report.push('\n');
    write_section(report, "🗣️  ТЕМЫ ДЛЯ РЕТРОСПЕКТИВЫ");
    for (i, topic) in topics.iter().enumerate() {
        writeln!(report, "  {}. {}", i + 1, text(topic, "topic", NOT_AVAILABLE)).ok();
        writeln!(
            report,
            "     ❓ Почему важно: {}",
            text(topic, "why_important", NOT_AVAILABLE)
        )
        .ok();
        writeln!(
            report,
            "     🎯 Ожидаемый результат: {}\n",
            text(topic, "expected_outcome", NOT_AVAILABLE)
        )
        .ok();
    }
}
