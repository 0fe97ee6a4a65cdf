//! Terminal rendering of view state

use colored::{ColoredString, Colorize};
use openapi_client::{Job, Printer};

use crate::views::badge::{job_tone, printer_badge, printer_tone, Tone};
use crate::views::notify::{Notification, NotificationKind};

pub fn paint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Positive => text.green(),
        Tone::Negative => text.red(),
        Tone::Informative => text.blue(),
        Tone::Busy => text.yellow(),
        Tone::Neutral => text.normal(),
    }
}

pub fn printer_line(printer: &Printer, testing: bool) -> String {
    let label = printer.status_label();
    let badge = paint(printer_badge(label, testing), printer_tone(label, testing));
    format!(
        "{:<38} {:<24} {:<16} [{}]",
        printer.id, printer.name, printer.model, badge
    )
}

pub fn job_line(job: &Job, selected: bool) -> String {
    let marker = if selected { ">" } else { " " };
    let name = job.name.as_deref().unwrap_or("(unnamed)");
    let mut line = format!(
        "{} {:<38} {:<24} [{}]",
        marker,
        job.id,
        name,
        paint(job.status_label(), job_tone(job.status_label()))
    );
    if let Some(at) = job.pending_schedule() {
        line.push_str(&format!(" scheduled {}", at));
    }
    line
}

/// Print a view's notification, if it has one
pub fn print_notification(notification: Option<Notification>) {
    let Some(notification) = notification else {
        return;
    };
    match notification.kind {
        NotificationKind::Success => println!("[SUCCESS] {}", notification.message.green()),
        NotificationKind::Error => eprintln!("[ERROR] {}", notification.message.red()),
        NotificationKind::Info => println!("[INFO] {}", notification.message),
    }
}
