//! Terminal helpers for the command-line entry point.
//!
//! Status lines go to stderr so stdout carries only the result JSON.

#![allow(clippy::disallowed_macros)]

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};

use crate::entities::{EnvelopeStatus, Request, RequestType, ResultEnvelope};

/// Print success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// One status line describing an envelope.
pub fn print_outcome(envelope: &ResultEnvelope) {
    let message = match (&envelope.message, envelope.tasks_created) {
        (Some(message), _) => message.clone(),
        (None, Some(created)) => format!(
            "{created} task(s) created, {} failed",
            envelope.tasks_failed.unwrap_or_default()
        ),
        (None, None) => format!("{} request processed", envelope.request_type),
    };

    match envelope.status {
        EnvelopeStatus::Success => print_success(&message),
        EnvelopeStatus::Warning => print_warning(&message),
        EnvelopeStatus::Error => print_error(&message),
    }
}

/// Ask for the request text, then its type (default `analysis`).
pub fn prompt_request() -> dialoguer::Result<Request> {
    let theme = ColorfulTheme::default();

    let text: String = Input::with_theme(&theme)
        .with_prompt("Текст запроса")
        .allow_empty(true)
        .interact_text()?;

    let tag: String = Input::with_theme(&theme)
        .with_prompt("Тип (analysis/calendar/governance/sprint)")
        .default(RequestType::Analysis.as_str().to_string())
        .interact_text()?;

    Ok(Request::new(RequestType::from_tag(&tag), text))
}
